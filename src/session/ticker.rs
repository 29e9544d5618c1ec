use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::runner::Event;

/// A repeating scheduled task feeding one fixed event into the session
/// event queue until canceled
///
/// Starting replaces any previous schedule, so restarts never stack two
/// ticks. Dropping the ticker cancels it, which keeps teardown atomic:
/// dropping the runner silences every timer.
pub(crate) struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self { handle: None }
    }

    pub fn start(&mut self, period: Duration, tx: mpsc::Sender<Event>, event: Event) {
        self.cancel();

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A slow handler must not cause a burst of catch-up ticks
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval fires immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                if tx.send(event.clone()).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
