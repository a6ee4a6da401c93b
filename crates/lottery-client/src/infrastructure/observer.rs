//! `tracing`-backed [`SubmitObserver`].

use tracing::{info, warn};

use crate::application::submit_bets::SubmitObserver;

/// Logs submit progress as structured `tracing` events.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    agency: u8,
}

impl TracingObserver {
    pub fn new(agency: u8) -> Self {
        Self { agency }
    }
}

impl SubmitObserver for TracingObserver {
    fn batch_sent(&self, index: usize, bets: usize, bytes: usize) {
        info!(agency = self.agency, batch = index, bets, bytes, "batch sent");
    }

    fn batch_confirmed(&self, index: usize, success: bool) {
        if success {
            info!(agency = self.agency, batch = index, "batch confirmed");
        } else {
            warn!(agency = self.agency, batch = index, "batch rejected by server");
        }
    }

    fn finalized(&self, agency: u8) {
        info!(agency, "finalization sent");
    }

    fn winners_received(&self, agency: u8, winners: &[u32]) {
        info!(
            agency,
            count = winners.len(),
            documents = ?winners,
            "winners received"
        );
    }

    fn cancelled(&self, batches_sent: usize) {
        info!(agency = self.agency, batches_sent, "submission cancelled");
    }
}
