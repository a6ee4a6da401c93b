//! Greedy batch builder.
//!
//! The builder owns one accumulation buffer and one counter.  Each call to
//! [`BatchBuilder::push`] appends an already-encoded bet; when the bet would
//! push the buffer past the usable budget (`ceiling - 4`) or past the record
//! cap, the current contents are sealed into a [`Batch`] and the bet starts a
//! new one.
//!
//! ```text
//! ceiling = 60, budget = 56
//!
//! push 20 B  -> buffer 20
//! push 20 B  -> buffer 40
//! push 20 B  -> 60 > 56: seal [20, 20], buffer 20
//! finish     -> seal [20]
//! ```

use thiserror::Error;
use tracing::trace;

use crate::domain::bet::MIN_ENCODED_BET_LEN;
use crate::protocol::codec::{encode_batch, EncodingError};
use crate::protocol::messages::{BATCH_HEADER_SIZE, MAX_COUNT, MAX_FRAME_LEN};

/// Errors in the batching configuration.
///
/// All variants except [`ConfigurationError::RecordExceedsBudget`] are raised
/// by the constructors, before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The ceiling cannot hold the header plus the smallest possible bet.
    #[error("batch ceiling too small: {ceiling} bytes, minimum is {minimum}")]
    CeilingTooSmall { ceiling: usize, minimum: usize },

    /// The ceiling is larger than the 16-bit frame length field allows.
    #[error("batch ceiling too large: {ceiling} bytes, maximum is 65535")]
    CeilingTooLarge { ceiling: usize },

    /// The per-batch record cap is outside `1..=255`.
    #[error("invalid max batch records: {0}, must be between 1 and 255")]
    InvalidMaxRecords(usize),

    /// A single bet does not fit an empty batch.
    #[error("record of {record_len} bytes exceeds the usable batch budget of {budget} bytes")]
    RecordExceedsBudget { record_len: usize, budget: usize },
}

/// A sealed group of encoded bets, ready to be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    records: Vec<u8>,
    count: usize,
}

impl Batch {
    /// Number of bets in the batch.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Concatenated encoded bets.
    pub fn records(&self) -> &[u8] {
        &self.records
    }

    /// Size of the bet-batch frame this batch encodes to.
    pub fn encoded_len(&self) -> usize {
        BATCH_HEADER_SIZE + self.records.len()
    }

    /// Wraps the batch in its bet-batch frame.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] if the count or frame length overflow; the
    /// builder never produces such a batch.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        encode_batch(&self.records, self.count)
    }
}

/// Accumulates encoded bets into batches that respect a byte ceiling.
///
/// # Examples
///
/// ```rust
/// use lottery_core::{encode_record, Bet, BatchBuilder};
///
/// let bet = Bet {
///     agency: 1,
///     first_name: "Ana".into(),
///     last_name: "Ruiz".into(),
///     document: 1,
///     birthdate: "2000-01-31".into(),
///     number: 2,
/// };
/// let encoded = encode_record(&bet).unwrap();
///
/// // Room for exactly two bets.
/// let mut builder = BatchBuilder::new(4 + 2 * encoded.len()).unwrap();
/// assert!(builder.push(&encoded).unwrap().is_none());
/// assert!(builder.push(&encoded).unwrap().is_none());
/// let full = builder.push(&encoded).unwrap().expect("third bet seals the batch");
/// assert_eq!(full.count(), 2);
/// assert_eq!(builder.finish().unwrap().count(), 1);
/// ```
#[derive(Debug)]
pub struct BatchBuilder {
    ceiling: usize,
    max_records: usize,
    records: Vec<u8>,
    count: usize,
}

impl BatchBuilder {
    /// Smallest ceiling that can carry one bet with empty names.
    pub const MIN_CEILING: usize = BATCH_HEADER_SIZE + MIN_ENCODED_BET_LEN;

    /// Creates a builder with the default record cap of 255 bets per batch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `ceiling` is outside
    /// [`Self::MIN_CEILING`]`..=65535`.
    pub fn new(ceiling: usize) -> Result<Self, ConfigurationError> {
        Self::with_max_records(ceiling, MAX_COUNT)
    }

    /// Creates a builder that also seals a batch once it holds `max_records`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for an out-of-range ceiling or cap.
    pub fn with_max_records(ceiling: usize, max_records: usize) -> Result<Self, ConfigurationError> {
        if ceiling < Self::MIN_CEILING {
            return Err(ConfigurationError::CeilingTooSmall {
                ceiling,
                minimum: Self::MIN_CEILING,
            });
        }
        if ceiling > MAX_FRAME_LEN {
            return Err(ConfigurationError::CeilingTooLarge { ceiling });
        }
        if max_records == 0 || max_records > MAX_COUNT {
            return Err(ConfigurationError::InvalidMaxRecords(max_records));
        }
        Ok(Self {
            ceiling,
            max_records,
            records: Vec::with_capacity(ceiling - BATCH_HEADER_SIZE),
            count: 0,
        })
    }

    /// The configured ceiling for a whole bet-batch frame.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Bytes available for encoded bets once the header is reserved.
    pub fn budget(&self) -> usize {
        self.ceiling - BATCH_HEADER_SIZE
    }

    /// Number of bets in the open batch.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the open batch holds no bets.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Adds an encoded bet.
    ///
    /// Returns the previously open batch if this bet did not fit in it; the
    /// bet itself is always kept in the (new) open batch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::RecordExceedsBudget`] if the bet alone is
    /// larger than [`Self::budget`].  The builder is left unchanged, so the
    /// open batch can still be sealed with [`Self::finish`] and sent before
    /// the error is reported.
    pub fn push(&mut self, encoded: &[u8]) -> Result<Option<Batch>, ConfigurationError> {
        if encoded.len() > self.budget() {
            return Err(ConfigurationError::RecordExceedsBudget {
                record_len: encoded.len(),
                budget: self.budget(),
            });
        }

        let overflows = self.records.len() + encoded.len() > self.budget();
        let sealed = if overflows || self.count == self.max_records {
            self.seal()
        } else {
            None
        };

        self.records.extend_from_slice(encoded);
        self.count += 1;
        Ok(sealed)
    }

    /// Seals whatever is left.  Returns `None` when the open batch is empty.
    pub fn finish(&mut self) -> Option<Batch> {
        self.seal()
    }

    fn seal(&mut self) -> Option<Batch> {
        if self.count == 0 {
            return None;
        }
        let batch = Batch {
            records: std::mem::replace(
                &mut self.records,
                Vec::with_capacity(self.ceiling - BATCH_HEADER_SIZE),
            ),
            count: std::mem::take(&mut self.count),
        };
        trace!(
            "sealed batch of {} bets ({} bytes)",
            batch.count,
            batch.encoded_len()
        );
        Some(batch)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
