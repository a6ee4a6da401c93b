//! SubmitBetsUseCase: ships an agency's bets and retrieves its winners.
//!
//! One run over one connection:
//!
//! ```text
//! for each sealed batch:   BET_BATCH  ->   <- CONFIRMATION
//! after the last batch:    FINALIZATION ->          (no reply)
//!                          WINNER_QUERY ->   <- WINNERS
//! ```
//!
//! Every exchange completes before the next one starts.  A rejected batch
//! (`CONFIRMATION` with a non-zero status) is counted and reported but does
//! not stop the run.  A source with no bets exchanges no frames at all.

use std::sync::Arc;

use lottery_core::{
    decode_confirmation, decode_winners, encode_finalization, encode_record,
    encode_winner_query, protocol::messages::MAX_COUNT, Batch, BatchBuilder, Bet,
    ConfigurationError, EncodingError, ProtocolError,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::application::frame_channel::{FrameChannel, FrameError, TransportError};

/// Error type for a submit run.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// The record source failed to produce the next bet.
    #[error("record source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<FrameError> for SubmitError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Transport(e) => SubmitError::Transport(e),
            FrameError::Protocol(e) => SubmitError::Protocol(e),
        }
    }
}

/// Parameters of a submit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitConfig {
    /// Agency id sent with the finalization and the winner query.
    pub agency: u8,
    /// Maximum size in bytes of one bet-batch frame.
    pub batch_ceiling: usize,
    /// Maximum number of bets in one batch.
    pub max_batch_records: usize,
}

impl SubmitConfig {
    /// Creates a config with the largest record cap the protocol allows.
    pub fn new(agency: u8, batch_ceiling: usize) -> Self {
        Self {
            agency,
            batch_ceiling,
            max_batch_records: MAX_COUNT,
        }
    }

    /// Checks the limits and returns a fresh builder for them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for an out-of-range ceiling or cap.
    pub fn builder(&self) -> Result<BatchBuilder, ConfigurationError> {
        BatchBuilder::with_max_records(self.batch_ceiling, self.max_batch_records)
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Batches sent and confirmed, successful or not.
    pub batches_sent: usize,
    /// Batches the server confirmed with a failure status.
    pub batches_rejected: usize,
    /// Bets carried by the sent batches.
    pub bets_sent: usize,
    /// Winner documents in the order the server listed them.
    pub winners: Vec<u32>,
    /// `true` if the run stopped at a batch boundary because of cancellation.
    /// Finalization and the winner query are skipped in that case.
    pub cancelled: bool,
}

/// Receives progress notifications from a run.
#[cfg_attr(test, mockall::automock)]
pub trait SubmitObserver: Send + Sync {
    /// A batch frame of `bytes` bytes carrying `bets` bets was written.
    /// `index` starts at 1.
    fn batch_sent(&self, index: usize, bets: usize, bytes: usize);

    /// The server answered batch `index`.
    fn batch_confirmed(&self, index: usize, success: bool);

    /// The finalization notice for `agency` was written.
    fn finalized(&self, agency: u8);

    /// The winners list for `agency` arrived.
    fn winners_received(&self, agency: u8, winners: &[u32]);

    /// The run stopped after `batches_sent` batches because it was cancelled.
    fn cancelled(&self, batches_sent: usize);
}

/// Submits bets in batches, then finalizes and queries the winners.
pub struct SubmitBetsUseCase {
    config: SubmitConfig,
    observer: Arc<dyn SubmitObserver>,
}

impl SubmitBetsUseCase {
    /// Creates a new use case reporting to `observer`.
    pub fn new(config: SubmitConfig, observer: Arc<dyn SubmitObserver>) -> Self {
        Self { config, observer }
    }

    /// Runs the whole sequence over `channel`.
    ///
    /// `records` is consumed lazily; only the open batch is held in memory.
    /// `cancel` is checked before every record is pulled, before every batch
    /// and before finalization, never while a frame is in flight.
    ///
    /// An empty `records` returns a default report without touching
    /// `channel`.  A bet too large for an empty batch first flushes the open
    /// batch, so bets accepted before it are still delivered and confirmed.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Configuration`] for invalid limits (before any I/O) or
    ///   a bet too large for an empty batch.
    /// - [`SubmitError::Encoding`] for a bet the wire format cannot carry.
    /// - [`SubmitError::Source`] when `records` yields an error.
    /// - [`SubmitError::Transport`] / [`SubmitError::Protocol`] for socket
    ///   failures and malformed replies.
    pub async fn run<C, I, E>(
        &self,
        channel: &mut C,
        records: I,
        cancel: &CancellationToken,
    ) -> Result<SubmitReport, SubmitError>
    where
        C: FrameChannel + ?Sized,
        I: IntoIterator<Item = Result<Bet, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut builder = self.config.builder()?;
        let mut report = SubmitReport::default();

        let mut pulled = 0usize;

        for record in records {
            if cancel.is_cancelled() {
                return Ok(self.stop(report));
            }
            let bet = record.map_err(|e| SubmitError::Source(Box::new(e)))?;
            pulled += 1;
            let encoded = encode_record(&bet)?;
            let sealed = match builder.push(&encoded) {
                Ok(sealed) => sealed,
                Err(e) => {
                    self.flush(channel, &mut builder, &mut report, cancel).await?;
                    return Err(e.into());
                }
            };
            if let Some(batch) = sealed {
                if cancel.is_cancelled() {
                    return Ok(self.stop(report));
                }
                self.send_batch(channel, &batch, &mut report).await?;
            }
        }

        if pulled == 0 {
            return Ok(report);
        }

        if let Some(batch) = builder.finish() {
            if cancel.is_cancelled() {
                return Ok(self.stop(report));
            }
            self.send_batch(channel, &batch, &mut report).await?;
        }

        if cancel.is_cancelled() {
            return Ok(self.stop(report));
        }

        let agency = self.config.agency;
        channel.send_frame(&encode_finalization(agency)).await?;
        self.observer.finalized(agency);

        channel.send_frame(&encode_winner_query(agency)).await?;
        let payload = channel.receive_frame().await?;
        report.winners = decode_winners(&payload)?;
        self.observer.winners_received(agency, &report.winners);

        Ok(report)
    }

    /// Sends one batch and waits for its confirmation.
    async fn send_batch<C>(
        &self,
        channel: &mut C,
        batch: &Batch,
        report: &mut SubmitReport,
    ) -> Result<(), SubmitError>
    where
        C: FrameChannel + ?Sized,
    {
        let frame = batch.encode()?;
        channel.send_frame(&frame).await?;
        report.batches_sent += 1;
        report.bets_sent += batch.count();
        let index = report.batches_sent;
        self.observer.batch_sent(index, batch.count(), frame.len());

        let payload = channel.receive_frame().await?;
        let success = decode_confirmation(&payload)?;
        if !success {
            report.batches_rejected += 1;
        }
        self.observer.batch_confirmed(index, success);
        Ok(())
    }

    /// Sends the open batch, if any, unless the run is already cancelled.
    async fn flush<C>(
        &self,
        channel: &mut C,
        builder: &mut BatchBuilder,
        report: &mut SubmitReport,
        cancel: &CancellationToken,
    ) -> Result<(), SubmitError>
    where
        C: FrameChannel + ?Sized,
    {
        if cancel.is_cancelled() {
            return Ok(());
        }
        match builder.finish() {
            Some(batch) => self.send_batch(channel, &batch, report).await,
            None => Ok(()),
        }
    }

    fn stop(&self, mut report: SubmitReport) -> SubmitReport {
        report.cancelled = true;
        self.observer.cancelled(report.batches_sent);
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
