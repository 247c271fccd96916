//! Session clock: the tick timer and the timeout, driven by one task.
//!
//! Both are posted into the command queue from the same task, so the
//! `max`-th tick is always handled before the timeout that follows it.

use super::Command;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Arm the session clock for session `generation`.
///
/// Posts `Tick` every `period`, `max_ticks` times, then a single `Timeout`.
/// The returned handle is aborted when the session stops early.
pub(super) fn arm(
    commands: mpsc::UnboundedSender<Command>,
    generation: u64,
    period: Duration,
    max_ticks: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for _ in 0..max_ticks {
            ticker.tick().await;
            if commands.send(Command::Tick { generation }).is_err() {
                return;
            }
        }
        let _ = commands.send(Command::Timeout { generation });
    })
}

/// Post `Notify(result)` after `delay`. Not cancelled by `stop()`.
pub(super) fn notify_later(
    commands: mpsc::UnboundedSender<Command>,
    delay: Duration,
    result: shared_types::ScanResult,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = commands.send(Command::Notify(result));
    })
}
