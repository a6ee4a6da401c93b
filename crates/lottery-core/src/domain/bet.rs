//! Bet domain entity.
//!
//! A [`Bet`] is created by the record source (the agency's CSV dataset) and is
//! read-only from then on: the codec borrows it to produce bytes and never
//! mutates it.

/// Byte length of an ISO `YYYY-MM-DD` birth date on the wire.
pub const BIRTHDATE_LEN: usize = 10;

/// Encoded size of a bet with empty first and last names:
/// agency(1) + len(1) + len(1) + document(4) + birthdate(10) + number(2).
pub const MIN_ENCODED_BET_LEN: usize = 1 + 1 + 1 + 4 + BIRTHDATE_LEN + 2;

/// One bet placed by one person at one agency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bet {
    /// Numeric identifier of the agency that took the bet.
    pub agency: u8,
    /// Bettor's first name.  At most 255 bytes once UTF-8 encoded.
    pub first_name: String,
    /// Bettor's last name.  At most 255 bytes once UTF-8 encoded.
    pub last_name: String,
    /// National document number of the bettor.
    pub document: u32,
    /// Birth date as `YYYY-MM-DD`.  Only the byte length is checked on encode.
    pub birthdate: String,
    /// The number the bettor played.
    pub number: u16,
}

impl Bet {
    /// Returns the number of bytes this bet occupies inside a bet-batch
    /// message, assuming its fields satisfy the wire constraints.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lottery_core::Bet;
    ///
    /// let bet = Bet {
    ///     agency: 1,
    ///     first_name: "Ana".into(),
    ///     last_name: "Gomez".into(),
    ///     document: 30_904_465,
    ///     birthdate: "1999-03-17".into(),
    ///     number: 7574,
    /// };
    /// assert_eq!(bet.encoded_len(), 19 + 3 + 5);
    /// ```
    pub fn encoded_len(&self) -> usize {
        MIN_ENCODED_BET_LEN + self.first_name.len() + self.last_name.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bet(first: &str, last: &str) -> Bet {
        Bet {
            agency: 3,
            first_name: first.to_string(),
            last_name: last.to_string(),
            document: 12_345_678,
            birthdate: "1985-11-02".to_string(),
            number: 42,
        }
    }

    #[test]
    fn test_encoded_len_of_empty_names_is_minimum() {
        let bet = make_bet("", "");
        assert_eq!(bet.encoded_len(), MIN_ENCODED_BET_LEN);
        assert_eq!(MIN_ENCODED_BET_LEN, 19);
    }

    #[test]
    fn test_encoded_len_counts_bytes_not_chars() {
        // Arrange: "Núñez" is 5 chars but 7 UTF-8 bytes
        let bet = make_bet("José", "Núñez");

        // Act
        let len = bet.encoded_len();

        // Assert
        assert_eq!(len, MIN_ENCODED_BET_LEN + "José".len() + "Núñez".len());
        assert_eq!(len, 19 + 5 + 7);
    }
}
