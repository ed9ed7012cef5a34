//! Notification sinks: where draw reports go for presentation.
//!
//! The engine calls the sink exactly once per completed draw, before the
//! settle delay starts. Sink failures are logged and never hold the
//! session lock.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::report::SummonReport;
use crate::error::SinkError;

/// Receives the report of every completed draw.
pub trait NotificationSink: Send + Sync {
    /// Present a draw.
    fn on_summon(&self, report: &SummonReport) -> Result<(), SinkError>;
}

impl<F> NotificationSink for F
where
    F: Fn(&SummonReport) -> Result<(), SinkError> + Send + Sync,
{
    fn on_summon(&self, report: &SummonReport) -> Result<(), SinkError> {
        self(report)
    }
}

/// Sink that only writes `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn on_summon(&self, report: &SummonReport) -> Result<(), SinkError> {
        debug!("{}", report.headline());
        for result in report.notable() {
            info!(
                "notable pull: {} ({})",
                result.card.name, result.card.rarity
            );
        }
        Ok(())
    }
}

/// Sink forwarding reports to an async consumer (a UI task, say).
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SummonReport>,
}

impl ChannelSink {
    /// Create the sink and the receiving end.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SummonReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn on_summon(&self, report: &SummonReport) -> Result<(), SinkError> {
        self.tx
            .send(report.clone())
            .map_err(|_| SinkError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, Rarity};
    use crate::summon::report::SummonResult;
    use smallvec::smallvec;

    fn report() -> SummonReport {
        SummonReport::new(smallvec![SummonResult {
            card: CardDefinition::new("a", "A", Rarity::Legendary),
            notable: true,
            first_copy: false,
        }])
    }

    #[test]
    fn test_log_sink_accepts() {
        assert!(LogSink.on_summon(&report()).is_ok());
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        sink.on_summon(&report()).unwrap();

        let received = rx.try_recv().unwrap();
        assert_eq!(received, report());
    }

    #[test]
    fn test_channel_sink_disconnected() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        assert_eq!(sink.on_summon(&report()), Err(SinkError::Disconnected));
    }

    #[test]
    fn test_closure_sink() {
        let sink = |report: &SummonReport| {
            if report.has_rare_trigger {
                Err(SinkError::Rejected("too shiny".into()))
            } else {
                Ok(())
            }
        };
        assert!(sink.on_summon(&report()).is_err());
    }
}
