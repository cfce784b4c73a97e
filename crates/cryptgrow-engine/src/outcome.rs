//! Session observer that forwards the end-of-run callback to `main`.

use cryptgrow_core::session::SessionObserver;
use cryptgrow_types::HarvestResult;
use tokio::sync::mpsc;
use tracing::debug;

/// How a growth session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The plant was harvested with this score.
    Harvested(HarvestResult),
    /// The plant died.
    Died,
}

/// Bridges [`SessionObserver`] callbacks onto an mpsc channel.
#[derive(Debug, Clone)]
pub struct OutcomeObserver {
    tx: mpsc::UnboundedSender<RunOutcome>,
}

impl OutcomeObserver {
    /// Create an observer and the receiver `main` waits on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RunOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, outcome: RunOutcome) {
        if self.tx.send(outcome).is_err() {
            debug!(?outcome, "outcome receiver dropped");
        }
    }
}

impl SessionObserver for OutcomeObserver {
    fn on_complete(&self, result: HarvestResult) {
        self.forward(RunOutcome::Harvested(result));
    }

    fn on_plant_died(&self) {
        self.forward(RunOutcome::Died);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn callbacks_arrive_in_order() {
        let (observer, mut rx) = OutcomeObserver::channel();
        let result = HarvestResult {
            potency: 42,
            yield_grams: 120,
        };
        observer.on_complete(result);
        observer.on_plant_died();
        assert_eq!(rx.recv().await.unwrap(), RunOutcome::Harvested(result));
        assert_eq!(rx.recv().await.unwrap(), RunOutcome::Died);
    }

    #[test]
    fn dropped_receiver_is_tolerated() {
        let (observer, rx) = OutcomeObserver::channel();
        drop(rx);
        observer.on_plant_died();
    }
}
