use crate::domain::{ScanError, SessionState};
use shared_types::{RawAdvertisement, ScanResult};
use tokio::sync::oneshot;

/// Everything the session actor reacts to.
#[derive(Debug)]
pub(crate) enum Command {
    Start {
        reply: oneshot::Sender<Result<(), ScanError>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    State {
        reply: oneshot::Sender<SessionState>,
    },
    Ticks {
        reply: oneshot::Sender<u32>,
    },
    Results {
        reply: oneshot::Sender<Vec<ScanResult>>,
    },
    /// Delivered by the radio through an `AdvertisementSink`.
    Advertisement(RawAdvertisement),
    /// Session clock fired. Stale generations are ignored.
    Tick { generation: u64 },
    /// Session clock reached `max_ticks`.
    Timeout { generation: u64 },
    /// Delayed discovery notification is due.
    Notify(ScanResult),
}
