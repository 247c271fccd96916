//! # Replay Radio
//!
//! A `RadioScanner` that plays back recorded advertisements. Used by the
//! `scan --replay` command and by tests in place of a platform radio.
//!
//! The recording is JSON lines, one advertisement per line, with the
//! delivery offset from scan start in milliseconds:
//!
//! ```text
//! {"at_ms": 0,    "address": "C4:7C:8D:6A:01:02", "rssi": -61}
//! {"at_ms": 1200, "address": "C4:7C:8D:6A:01:02", "rssi": -58, "payload": [2, 1, 6]}
//! ```

use bk_01_scan_session::{AdvertisementSink, RadioError, RadioScanner};
use parking_lot::Mutex;
use serde::Deserialize;
use shared_types::RawAdvertisement;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// One recorded advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayEntry {
    /// Delivery offset from scan start.
    pub at_ms: u64,
    pub address: String,
    pub rssi: i16,
    #[serde(default)]
    pub payload: Vec<u8>,
}

/// Errors reading a recording.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read replay file: {0}")]
    Io(#[from] std::io::Error),

    #[error("replay line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Radio playing back a fixed recording on every scan.
#[derive(Debug, Default)]
pub struct ReplayRadio {
    entries: Vec<ReplayEntry>,
    playback: Mutex<Option<JoinHandle<()>>>,
}

impl ReplayRadio {
    /// Radio that never delivers anything.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn new(mut entries: Vec<ReplayEntry>) -> Self {
        entries.sort_by_key(|entry| entry.at_ms);
        Self {
            entries,
            playback: Mutex::new(None),
        }
    }

    /// Parse a JSON-lines recording. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<Self, ReplayError> {
        let mut entries = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|source| ReplayError::Parse {
                line: index + 1,
                source,
            })?;
            entries.push(entry);
        }
        Ok(Self::new(entries))
    }

    /// Read and parse a recording file.
    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        let radio = Self::parse(&content)?;
        info!(path = %path.display(), entries = radio.len(), "Loaded replay recording");
        Ok(radio)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RadioScanner for ReplayRadio {
    fn start_scan(&self, sink: AdvertisementSink) -> Result<(), RadioError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| RadioError::Unavailable("replay needs a tokio runtime".into()))?;

        let entries = self.entries.clone();
        let task = runtime.spawn(async move {
            let start = tokio::time::Instant::now();
            for entry in entries {
                tokio::time::sleep_until(start + Duration::from_millis(entry.at_ms)).await;
                let advertisement = RawAdvertisement::new(entry.address, entry.rssi, entry.payload);
                if !sink.deliver(advertisement) {
                    return;
                }
            }
            debug!("Replay finished");
        });

        if let Some(previous) = self.playback.lock().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    fn stop_scan(&self) {
        if let Some(task) = self.playback.lock().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recording() {
        let radio = ReplayRadio::parse(
            r#"
            # captured in the hallway
            {"at_ms": 1200, "address": "AA:01", "rssi": -58, "payload": [2, 1, 6]}
            {"at_ms": 0, "address": "AA:01", "rssi": -61}
            "#,
        )
        .unwrap();

        assert_eq!(radio.len(), 2);
        assert_eq!(radio.entries[0].at_ms, 0);
        assert!(radio.entries[0].payload.is_empty());
        assert_eq!(radio.entries[1].payload, vec![2, 1, 6]);
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = ReplayRadio::parse("{\"at_ms\": 0, \"address\": \"AA\", \"rssi\": -1}\nnot json").unwrap_err();
        assert!(err.to_string().starts_with("replay line 2:"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_reaches_session() {
        use bk_01_scan_session::{ScanConfig, ScanSession, ScanSessionApi};
        use std::sync::Arc;

        let radio = Arc::new(
            ReplayRadio::parse(
                "{\"at_ms\": 0, \"address\": \"aa:01\", \"rssi\": -61}\n\
                 {\"at_ms\": 1500, \"address\": \"BB:02\", \"rssi\": -70}",
            )
            .unwrap(),
        );
        let session = ScanSession::builder(radio)
            .config(ScanConfig::with_max_ticks(5))
            .spawn();

        session.start().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        let seen: Vec<String> = session
            .results()
            .await
            .unwrap()
            .iter()
            .map(|r| r.address.to_string())
            .collect();
        assert_eq!(seen, vec!["AA:01", "BB:02"]);
    }
}
