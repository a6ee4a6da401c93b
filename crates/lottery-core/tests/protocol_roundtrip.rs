//! Integration tests for the lottery-core codec and batch builder.
//!
//! These tests drive the public API end to end: bets are encoded, packed by
//! the builder, framed, and decoded again the way the server would see them.

use lottery_core::{
    decode_bet_batch, decode_confirmation, decode_message, decode_winners, encode_confirmation,
    encode_finalization, encode_message, encode_record, encode_winner_query, encode_winners,
    protocol::messages::LENGTH_FIELD_SIZE, Batch, BatchBuilder, Bet, ConfigurationError,
    Message, ProtocolError,
};

/// Encodes a message and then decodes its payload, the way the stream
/// transport hands it over.
fn roundtrip(msg: Message) -> Message {
    let frame = encode_message(&msg).expect("encode must succeed");
    let declared = u16::from_be_bytes([frame[0], frame[1]]) as usize;
    assert_eq!(declared, frame.len(), "length field must cover the whole frame");
    decode_message(&frame[LENGTH_FIELD_SIZE..]).expect("decode must succeed")
}

fn sample_bets() -> Vec<Bet> {
    vec![
        Bet {
            agency: 3,
            first_name: "Santiago Lionel".to_string(),
            last_name: "Lorca".to_string(),
            document: 30_904_465,
            birthdate: "1999-03-17".to_string(),
            number: 7574,
        },
        Bet {
            agency: 3,
            first_name: "María José".to_string(),
            last_name: "Peña".to_string(),
            document: 25_111_222,
            birthdate: "1987-11-02".to_string(),
            number: 1,
        },
        Bet {
            agency: 3,
            first_name: String::new(),
            last_name: String::new(),
            document: u32::MAX,
            birthdate: "2000-01-01".to_string(),
            number: u16::MAX,
        },
    ]
}

fn pack(bets: &[Bet], ceiling: usize) -> Result<Vec<Batch>, ConfigurationError> {
    let mut builder = BatchBuilder::new(ceiling)?;
    let mut batches = Vec::new();
    for bet in bets {
        let encoded = encode_record(bet).expect("valid bet");
        batches.extend(builder.push(&encoded)?);
    }
    batches.extend(builder.finish());
    Ok(batches)
}

#[test]
fn test_roundtrip_bet_batch_message() {
    let original = Message::BetBatch(sample_bets());
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_empty_bet_batch_message() {
    let original = Message::BetBatch(vec![]);
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_confirmation_messages() {
    for status in [0x00, 0x01, 0xFF] {
        let original = Message::Confirmation { status };
        assert_eq!(original, roundtrip(original.clone()));
    }
}

#[test]
fn test_roundtrip_finalization_and_query_messages() {
    let finalization = Message::Finalization { agency: 5 };
    let query = Message::WinnerQuery { agency: 5 };
    assert_eq!(finalization, roundtrip(finalization.clone()));
    assert_eq!(query, roundtrip(query.clone()));
}

#[test]
fn test_roundtrip_winners_message() {
    let original = Message::Winners((1..=255).collect());
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_each_bet_survives_a_batch_of_one() {
    for bet in sample_bets() {
        // Arrange
        let frame = encode_message(&Message::BetBatch(vec![bet.clone()])).unwrap();

        // Act
        let decoded = decode_bet_batch(&frame[LENGTH_FIELD_SIZE..]).unwrap();

        // Assert
        assert_eq!(decoded, vec![bet]);
    }
}

#[test]
fn test_packed_batches_decode_back_to_source_order() {
    // Arrange: enough bets to force several batches
    let bets: Vec<Bet> = sample_bets().into_iter().cycle().take(50).collect();
    let ceiling = 4 + 3 * bets[0].encoded_len();

    // Act
    let batches = pack(&bets, ceiling).unwrap();

    // Assert
    assert!(batches.len() > 1);
    let mut decoded = Vec::new();
    for batch in &batches {
        let frame = batch.encode().unwrap();
        assert!(frame.len() <= ceiling);
        decoded.extend(decode_bet_batch(&frame[LENGTH_FIELD_SIZE..]).unwrap());
    }
    assert_eq!(decoded, bets);
}

#[test]
fn test_zero_bets_pack_into_zero_batches() {
    assert!(pack(&[], 8192).unwrap().is_empty());
}

#[test]
fn test_ceiling_smaller_than_largest_bet_is_rejected() {
    let bets = sample_bets();
    let err = pack(&bets, 4 + bets[0].encoded_len() - 1).unwrap_err();
    assert!(matches!(err, ConfigurationError::RecordExceedsBudget { .. }));
}

#[test]
fn test_server_replies_decode_with_typed_decoders() {
    // Arrange
    let ok = encode_confirmation(true);
    let rejected = encode_confirmation(false);
    let winners = encode_winners(&[30_904_465, 25_111_222]).unwrap();

    // Act / Assert
    assert_eq!(decode_confirmation(&ok[LENGTH_FIELD_SIZE..]), Ok(true));
    assert_eq!(decode_confirmation(&rejected[LENGTH_FIELD_SIZE..]), Ok(false));
    assert_eq!(
        decode_winners(&winners[LENGTH_FIELD_SIZE..]),
        Ok(vec![30_904_465, 25_111_222])
    );
}

#[test]
fn test_typed_decoder_rejects_other_message_type() {
    let query = encode_winner_query(1);
    assert_eq!(
        decode_confirmation(&query[LENGTH_FIELD_SIZE..]),
        Err(ProtocolError::UnexpectedMessageType {
            expected: 0x02,
            actual: 0x04
        })
    );
}

#[test]
fn test_client_frames_are_four_bytes() {
    assert_eq!(encode_finalization(9).len(), 4);
    assert_eq!(encode_winner_query(9).len(), 4);
}
