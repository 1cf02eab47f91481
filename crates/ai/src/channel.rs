//! Status channel for one run.
//!
//! Writes never block: the channel is unbounded, and a send to a consumer
//! that has gone away is dropped silently while the run carries on.

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;

use cadence_core::checkins::{is_meaningful_update, PartialCheckInAnalysis};

use crate::error::CheckInError;
use crate::types::{CheckInStreamEvent, GenerationStatus};

/// Owns the sending half of the status channel for a run.
///
/// Exactly one terminal event is sent: either through [`StatusChannel::finish`]
/// or, if the run ends without one, by `Drop` as an internal error.
pub(crate) struct StatusChannel {
    tx: Option<UnboundedSender<CheckInStreamEvent>>,
}

impl StatusChannel {
    pub(crate) fn new(tx: UnboundedSender<CheckInStreamEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub(crate) fn status(&self, status: GenerationStatus, message: &str) {
        debug!("Check-in status: {:?}", status);
        self.send(CheckInStreamEvent::progress(status, message));
    }

    /// A relay that writes partials onto this channel.
    pub(crate) fn relay(&self) -> PartialRelay {
        PartialRelay {
            tx: self.tx.clone(),
            last: None,
        }
    }

    /// Sends the terminal event and closes this sender.
    pub(crate) fn finish(mut self, event: CheckInStreamEvent) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(event);
        }
    }

    fn send(&self, event: CheckInStreamEvent) {
        if let Some(tx) = &self.tx {
            // Receiver gone: keep running, nobody is listening.
            let _ = tx.send(event);
        }
    }
}

impl Drop for StatusChannel {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            warn!("Check-in run ended without a terminal event");
            let _ = tx.send(CheckInStreamEvent::error(&CheckInError::internal(
                "check-in generation stopped unexpectedly",
            )));
        }
    }
}

/// Forwards in-progress analyses, suppressing near-duplicates.
///
/// Holds the last forwarded partial for the duration of one run.
pub struct PartialRelay {
    tx: Option<UnboundedSender<CheckInStreamEvent>>,
    last: Option<PartialCheckInAnalysis>,
}

impl PartialRelay {
    /// A relay that only tracks what it would have sent.
    pub fn detached() -> Self {
        Self { tx: None, last: None }
    }

    /// Emits `partial` if it is a meaningful update over the last one sent.
    /// Returns whether an event was emitted.
    pub fn push(&mut self, partial: PartialCheckInAnalysis) -> bool {
        if !is_meaningful_update(self.last.as_ref(), &partial) {
            return false;
        }
        if let Some(tx) = &self.tx {
            let _ = tx.send(CheckInStreamEvent::partial(partial.clone()));
        }
        self.last = Some(partial);
        true
    }

    pub fn last(&self) -> Option<&PartialCheckInAnalysis> {
        self.last.as_ref()
    }
}
