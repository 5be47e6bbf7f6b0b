//! JSON frame file

use std::fs;
use std::path::PathBuf;

use super::{Frame, FrameSink, RenderError};

/// Writes the latest frame as JSON, atomically, whenever it changes
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    tmp_path: PathBuf,
    last: Option<String>,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
            last: None,
        }
    }

    fn write(&self, text: &str) -> Result<(), RenderError> {
        let io = |e: std::io::Error| RenderError::Io(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }
        fs::write(&self.tmp_path, text).map_err(io)?;
        fs::rename(&self.tmp_path, &self.path).map_err(io)
    }
}

impl FrameSink for JsonFileSink {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let text =
            serde_json::to_string_pretty(frame).map_err(|e| RenderError::Encode(e.to_string()))?;

        if self.last.as_deref() == Some(text.as_str()) {
            return Ok(());
        }

        self.write(&text)?;
        self.last = Some(text);
        Ok(())
    }
}
