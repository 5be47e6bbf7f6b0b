//! Data source fetch trait

use alloc::string::String;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Errors a data source fetch can end with
///
/// Every variant is a displayable value that ends up in the state store in
/// place of the source's data until the next successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "detail", rename_all = "snake_case"))]
pub enum FetchError {
    /// Could not reach the upstream service or start the fetcher
    #[error("transport error: {0}")]
    Transport(String),
    /// Upstream answered with something we could not understand
    #[error("bad response: {0}")]
    Parse(String),
    /// Fetcher reported failure through its exit status
    #[error("fetcher exited with status {0}")]
    Status(i32),
    /// Fetch did not finish within its time budget (seconds)
    #[error("timed out after {0} s")]
    Timeout(u32),
    /// Source has nothing to fetch with
    #[error("source not configured: {0}")]
    Unconfigured(String),
}

/// Value produced by a data source
///
/// Only the temperature-tracking source needs to report a temperature;
/// everything else can rely on the default.
pub trait Payload: Clone {
    /// Numeric temperature carried by this value, if any
    fn temperature(&self) -> Option<f32> {
        None
    }
}

/// Trait for data source fetchers
///
/// A fetch may block for as long as the upstream takes (bounded by the
/// implementation's own timeout). It must never panic; all failures come
/// back as a [`FetchError`].
pub trait Fetch<V: Payload> {
    /// Fetch the current value of this source
    fn fetch(&self) -> Result<V, FetchError>;
}

impl<V: Payload, F: Fetch<V> + ?Sized> Fetch<V> for &F {
    fn fetch(&self) -> Result<V, FetchError> {
        (**self).fetch()
    }
}

impl<V: Payload, F: Fetch<V> + ?Sized> Fetch<V> for alloc::boxed::Box<F> {
    fn fetch(&self) -> Result<V, FetchError> {
        (**self).fetch()
    }
}
