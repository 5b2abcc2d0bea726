//! Tests for the bulk record codec
//!
//! These tests verify:
//! - Byte-exact wire layout for STRING and INT64 records
//! - Round-trip of key and textual value
//! - Truncation, corruption and unknown-type rejection
//! - Padding modes

use kvrecord::{decode, encode, Config, PaddingMode, Record, RecordCodec, RecordError, TypeTag};

// =============================================================================
// Helper Functions
// =============================================================================

fn le32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

fn compact_codec() -> RecordCodec<'static> {
    RecordCodec::new(Config::builder().padding(PaddingMode::Compact).build())
}

// =============================================================================
// Wire Layout Tests
// =============================================================================

#[test]
fn test_string_record_layout() {
    let bytes = encode(&Record::string("user:1", "alice")).unwrap();

    assert_eq!(bytes.len(), 24);
    assert_eq!(le32(&bytes, 0), 24);
    assert_eq!(le32(&bytes, 4), 6);
    assert_eq!(&bytes[8..14], b"user:1");
    assert_eq!(bytes[14], 0);
    assert_eq!(le32(&bytes, 15), 5);
    assert_eq!(&bytes[19..24], b"alice");
}

#[test]
fn test_int64_record_layout_preserves_gap() {
    let bytes = encode(&Record::int64("ctr", 42)).unwrap();

    assert_eq!(bytes.len(), 24);
    assert_eq!(le32(&bytes, 0), 24);
    assert_eq!(le32(&bytes, 4), 3);
    assert_eq!(&bytes[8..11], b"ctr");
    assert_eq!(bytes[11], 1);
    assert_eq!(&bytes[12..20], &42i64.to_le_bytes());
    // Reserved length slot, never written
    assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
}

#[test]
fn test_int64_compact_layout() {
    let bytes = compact_codec().encode(&Record::int64("ctr", 42)).unwrap();

    assert_eq!(bytes.len(), 20);
    assert_eq!(le32(&bytes, 0), 20);
    assert_eq!(&bytes[12..20], &42i64.to_le_bytes());
}

#[test]
fn test_negative_int64_is_twos_complement() {
    let bytes = encode(&Record::int64("n", -1)).unwrap();
    assert_eq!(&bytes[10..18], &[0xFF; 8]);
}

#[test]
fn test_string_compact_matches_preserve() {
    let record = Record::string("k", "value");
    assert_eq!(encode(&record).unwrap(), compact_codec().encode(&record).unwrap());
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_string() {
    let record = Record::string("user:1", "alice");
    let decoded = decode(&encode(&record).unwrap()).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_round_trip_int64_extremes() {
    for v in [0, 1, -1, 42, i64::MIN, i64::MAX] {
        let record = Record::int64("ctr", v);
        let decoded = decode(&encode(&record).unwrap()).unwrap();

        assert_eq!(decoded.value_type, TypeTag::INT64);
        assert_eq!(decoded.value.parse::<i64>().unwrap(), v);
    }
}

#[test]
fn test_round_trip_compact_int64() {
    let codec = compact_codec();
    let record = Record::int64("ctr", -9000);
    assert_eq!(codec.decode(&codec.encode(&record).unwrap()).unwrap(), record);
}

#[test]
fn test_preserve_and_compact_readers_interoperate() {
    let record = Record::int64("ctr", 7);
    let padded = encode(&record).unwrap();
    let compact = compact_codec().encode(&record).unwrap();

    assert_eq!(compact_codec().decode(&padded).unwrap(), record);
    assert_eq!(decode(&compact).unwrap(), record);
}

#[test]
fn test_round_trip_empty_key_and_value() {
    let record = Record::string("", "");
    let bytes = encode(&record).unwrap();

    assert_eq!(bytes.len(), 13);
    assert_eq!(decode(&bytes).unwrap(), record);
}

#[test]
fn test_round_trip_unicode() {
    let record = Record::string("ключ", "värde ✓");
    let bytes = encode(&record).unwrap();
    let decoded = decode(&bytes).unwrap();

    assert_eq!(decoded, record);
    // Length field counts bytes, not chars
    assert_eq!(le32(&bytes, 4) as usize, "ключ".len());
    assert_eq!(decoded.value.len(), "värde ✓".len());
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let record = Record::string("a", "b");
    let mut bytes = encode(&record).unwrap();
    bytes.extend_from_slice(&encode(&Record::int64("next", 1)).unwrap());

    assert_eq!(decode(&bytes).unwrap(), record);
}

#[test]
fn test_decode_into_overwrites_target() {
    let mut target = Record::string("old", "value");
    target
        .decode_into(&encode(&Record::int64("new", 5)).unwrap())
        .unwrap();

    assert_eq!(target, Record::int64("new", 5));
}

#[test]
fn test_decode_into_keeps_target_on_error() {
    let mut target = Record::string("old", "value");
    assert!(target.decode_into(&[1, 2, 3]).is_err());
    assert_eq!(target, Record::string("old", "value"));
}

// =============================================================================
// Encoding Error Tests
// =============================================================================

#[test]
fn test_encode_non_numeric_int64() {
    let record = Record::new("ctr", TypeTag::INT64, "forty-two");
    let err = encode(&record).unwrap_err();
    assert!(matches!(err, RecordError::Encoding(_)));
}

#[test]
fn test_encode_out_of_range_int64() {
    let record = Record::new("ctr", TypeTag::INT64, "99999999999999999999");
    assert!(matches!(encode(&record), Err(RecordError::Encoding(_))));
}

#[test]
fn test_encode_unregistered_type() {
    let record = Record::new("k", TypeTag(42), "v");
    assert!(matches!(encode(&record), Err(RecordError::Encoding(_))));
}

#[test]
fn test_encode_respects_size_limits() {
    let codec = RecordCodec::new(Config::builder().max_key_size(4).max_value_size(4).build());

    assert!(matches!(
        codec.encode(&Record::string("long-key", "v")),
        Err(RecordError::Encoding(_))
    ));
    assert!(matches!(
        codec.encode(&Record::string("k", "long value")),
        Err(RecordError::Encoding(_))
    ));
    assert!(codec.encode(&Record::string("k", "ok")).is_ok());
}

#[test]
fn test_decode_respects_value_size_limit() {
    let codec = RecordCodec::new(Config::builder().max_value_size(4).build());
    let long = encode(&Record::string("k", "long value")).unwrap();
    let short = encode(&Record::string("k", "ok")).unwrap();

    assert!(matches!(codec.decode(&long), Err(RecordError::Decoding(_))));
    assert_eq!(codec.decode(&short).unwrap().value, "ok");
    assert_eq!(
        codec.decode(&encode(&Record::int64("n", i64::MAX)).unwrap()).unwrap().value,
        i64::MAX.to_string()
    );
}

#[test]
fn test_type_tag_defaults_to_string() {
    assert_eq!(TypeTag::default(), TypeTag::STRING);
    assert_eq!(Record::default().value_type, TypeTag::STRING);
    assert!(encode(&Record::default()).is_ok());
}

// =============================================================================
// Decoding Error Tests
// =============================================================================

#[test]
fn test_truncated_anywhere_is_an_error() {
    for record in [Record::string("user:1", "alice"), Record::int64("ctr", 42)] {
        let bytes = encode(&record).unwrap();
        for cut in 0..bytes.len() {
            let result = decode(&bytes[..cut]);
            assert!(
                matches!(result, Err(RecordError::Decoding(_))),
                "cut at {} of {:?} decoded: {:?}",
                cut,
                record,
                result
            );
        }
    }
}

#[test]
fn test_unknown_type_tag_rejected() {
    let mut bytes = encode(&Record::string("k", "v")).unwrap();
    bytes[9] = 0x7F;

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, RecordError::Decoding(_)));
}

#[test]
fn test_key_length_past_end() {
    let mut bytes = encode(&Record::string("k", "v")).unwrap();
    bytes[4..8].copy_from_slice(&1000u32.to_le_bytes());

    assert!(matches!(decode(&bytes), Err(RecordError::Decoding(_))));
}

#[test]
fn test_value_length_past_declared_size() {
    let mut bytes = encode(&Record::string("k", "value")).unwrap();
    // value_len lives right after the type tag
    bytes[10..14].copy_from_slice(&6u32.to_le_bytes());
    bytes.push(b'!');

    assert!(matches!(decode(&bytes), Err(RecordError::Decoding(_))));
}

#[test]
fn test_total_size_too_small_for_key() {
    let mut bytes = encode(&Record::string("key", "v")).unwrap();
    bytes[0..4].copy_from_slice(&8u32.to_le_bytes());

    assert!(matches!(decode(&bytes), Err(RecordError::Decoding(_))));
}

#[test]
fn test_invalid_utf8_key() {
    let mut bytes = encode(&Record::string("ab", "v")).unwrap();
    bytes[8] = 0xFF;

    assert!(matches!(decode(&bytes), Err(RecordError::Decoding(_))));
}

#[test]
fn test_invalid_utf8_value() {
    let mut bytes = encode(&Record::string("k", "ab")).unwrap();
    bytes[14] = 0xC0;

    assert!(matches!(decode(&bytes), Err(RecordError::Decoding(_))));
}

#[test]
fn test_encoded_size_matches_formula() {
    let codec = RecordCodec::default();
    let record = Record::string("user:1", "alice");
    assert_eq!(codec.encoded_size(&record).unwrap(), 6 + 1 + 5 + 12);

    let record = Record::int64("ctr", 42);
    assert_eq!(codec.encoded_size(&record).unwrap(), 3 + 1 + 8 + 12);
}
