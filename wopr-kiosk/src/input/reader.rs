//! Blocking evdev reader threads

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use super::evdev::{decode_event, EVENT_SIZE};
use crate::channels::INPUT_CHANNEL;

/// Start a thread that reads one input device until it goes away
pub fn spawn_reader(path: &Path) -> io::Result<JoinHandle<()>> {
    let mut device = File::open(path)?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "device".into());
    let display = path.display().to_string();

    thread::Builder::new()
        .name(format!("input-{}", label))
        .spawn(move || {
            info!("Reading input from {}", display);
            let mut record = [0u8; EVENT_SIZE];

            loop {
                if let Err(e) = device.read_exact(&mut record) {
                    warn!("Input device {} closed: {}", display, e);
                    return;
                }

                match decode_event(&record) {
                    Ok(Some(event)) => {
                        debug!("Input {:?} from {}", event, display);
                        if INPUT_CHANNEL.try_send(event).is_err() {
                            warn!("Input queue full, dropping {:?}", event);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{}: {}", display, e),
                }
            }
        })
}
