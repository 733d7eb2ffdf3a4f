//! End-to-end tests through the public encoder API

use pager_encoder::constants::WORD_LENGTH;
use pager_encoder::flex::{
    BIT_SYNC_1, CONTROL_BLOCK, FRAME_SYNC_A1, FRAME_SYNC_A1_INVERTED, FRAME_SYNC_B,
};
use pager_encoder::pocsag::{IDLE_WORD, PREAMBLE_BITS, SYNC_WORD};
use pager_encoder::{
    Codeword, EncodeError, Encoder, EncoderBuilder, EncoderConfig, MessageType, Protocol, Symbol,
};

/// Undo the rate conversion and polar mapping
fn to_bits(symbols: &[Symbol], interpolation: usize) -> Vec<bool> {
    symbols
        .chunks(interpolation)
        .map(|chunk| {
            assert!(chunk.iter().all(|&s| s == chunk[0]));
            chunk[0] == Symbol::Minus
        })
        .collect()
}

fn word_at(bits: &[bool], offset: usize) -> u32 {
    bits[offset..offset + WORD_LENGTH]
        .iter()
        .fold(0u32, |acc, &b| (acc << 1) | b as u32)
}

fn word_bits(word: Codeword) -> Vec<bool> {
    word.bits().collect()
}

#[test]
fn test_pocsag_stream_starts_with_preamble_and_sync() {
    let mut encoder = EncoderBuilder::new().build().unwrap();
    let bits = to_bits(&encoder.drain(), 4);

    for (i, &bit) in bits[..PREAMBLE_BITS].iter().enumerate() {
        assert_eq!(bit, i % 2 == 0, "preamble bit {}", i);
    }
    assert_eq!(word_at(&bits, PREAMBLE_BITS), 0x7CD2_15D8);
}

#[test]
fn test_pocsag_sync_symbols() {
    let mut encoder = EncoderBuilder::new().with_symbol_rate(1600).build().unwrap();
    let symbols = encoder.drain();
    let sync: Vec<i8> = symbols[PREAMBLE_BITS..PREAMBLE_BITS + 8]
        .iter()
        .map(Symbol::as_i8)
        .collect();
    // 0x7C = 0111 1100
    assert_eq!(sync, vec![1, -1, -1, -1, -1, -1, 1, 1]);
}

#[test]
fn test_pocsag_address_in_third_slot() {
    let mut encoder = EncoderBuilder::new().with_symbol_rate(1600).build().unwrap();
    let bits = to_bits(&encoder.drain(), 1);

    let slot = |n: usize| word_at(&bits, PREAMBLE_BITS + WORD_LENGTH * (n + 1));
    assert_eq!(slot(0), IDLE_WORD.value());
    assert_eq!(slot(1), IDLE_WORD.value());
    assert_eq!(slot(2), 0x19F5_BD6D);
    assert_eq!(slot(3), 0x8BA6_6BE0);
    assert_eq!(slot(4), 0xCDFB_0189);
    assert_eq!(slot(5), IDLE_WORD.value());
    assert_eq!(bits.len(), PREAMBLE_BITS + 17 * WORD_LENGTH);
}

#[test]
fn test_pocsag_long_message_resyncs() {
    let text = "The quick brown fox jumps over the lazy dog, twice over.";
    let mut encoder = EncoderBuilder::new()
        .with_symbol_rate(1600)
        .with_capcode(1_234_567)
        .with_message(text)
        .build()
        .unwrap();
    let bits = to_bits(&encoder.drain(), 1);
    let words: Vec<u32> = (PREAMBLE_BITS..bits.len())
        .step_by(WORD_LENGTH)
        .map(|offset| word_at(&bits, offset))
        .collect();

    assert!(words.len() > 17);
    assert_eq!(words.len() % 17, 0);
    for (i, &word) in words.iter().enumerate() {
        assert_eq!(word == SYNC_WORD.value(), i % 17 == 0, "word {}", i);
    }
    // capcode 1234567 & 7 = 7: address in the last frame
    assert_eq!(words[15] & 0x8000_0000, 0);
}

#[test]
fn test_numeric_pocsag_message() {
    let mut encoder = EncoderBuilder::new()
        .with_symbol_rate(1600)
        .with_capcode(8)
        .with_message_type(MessageType::Numeric)
        .with_message("123")
        .build()
        .unwrap();
    let bits = to_bits(&encoder.drain(), 1);
    // capcode 8: frame 0, address bits 1, function bits 0
    assert_eq!(word_at(&bits, PREAMBLE_BITS + WORD_LENGTH), 0x0000_26EC);
    assert_eq!(word_at(&bits, PREAMBLE_BITS + 2 * WORD_LENGTH), 0xC261_9CE1);
}

#[test]
fn test_chunking_invariance() {
    let whole = {
        let mut encoder = EncoderBuilder::new().build().unwrap();
        let total = encoder.remaining();
        encoder.fetch(total).unwrap()
    };

    for sizes in [&[1usize][..], &[7, 1000, 3][..], &[4096][..], &[13, 1, 999_999][..]] {
        let mut encoder = EncoderBuilder::new().build().unwrap();
        let mut joined = Vec::new();
        let mut i = 0;
        while let Some(chunk) = encoder.fetch(sizes[i % sizes.len()]) {
            joined.extend(chunk);
            i += 1;
        }
        assert_eq!(joined, whole);
    }
}

#[test]
fn test_rate_configuration() {
    let encoder = EncoderBuilder::new().with_baud_rate(1600).with_symbol_rate(6400).build();
    assert!(encoder.is_ok());

    let err = EncoderBuilder::new().with_symbol_rate(6401).build().unwrap_err();
    assert!(matches!(err, EncodeError::Configuration(_)));
}

#[test]
fn test_flex_frame_header() {
    let mut encoder = EncoderBuilder::new()
        .with_protocol(Protocol::Flex)
        .with_capcode(1_337_331)
        .with_message_type(MessageType::Numeric)
        .with_message("69  ")
        .build()
        .unwrap();
    assert_eq!(encoder.protocol(), Protocol::Flex);
    let bits = to_bits(&encoder.drain(), 4);

    let mut expected = Vec::new();
    expected.extend_from_slice(&BIT_SYNC_1);
    expected.extend_from_slice(&FRAME_SYNC_A1);
    expected.extend_from_slice(&FRAME_SYNC_B);
    expected.extend_from_slice(&FRAME_SYNC_A1_INVERTED);
    expected.extend(word_bits(Codeword::from_raw(0xF000_0283)));
    expected.extend_from_slice(&CONTROL_BLOCK);
    expected.extend(word_bits(Codeword::from_raw(0xE010_0298)));
    expected.extend(word_bits(Codeword::from_raw(0xCFE6_2E0B)));
    expected.extend(word_bits(Codeword::from_raw(0xCD80_078C)));
    expected.extend(word_bits(Codeword::from_raw(0xDA4C_C480)));
    for _ in 0..4 {
        expected.extend_from_slice(&BIT_SYNC_1);
    }

    assert_eq!(&bits[..expected.len()], &expected[..]);
}

#[test]
fn test_flex_frames_count_up() {
    let config = EncoderConfig {
        protocol: Protocol::Flex,
        symbol_rate: 1600,
        capcode: 1_337_331,
        message_type: MessageType::Numeric,
        message: "69".to_string(),
        ..EncoderConfig::default()
    };
    let mut encoder = Encoder::new(&config).unwrap();
    let bits = to_bits(&encoder.drain(), 1);

    let frame_len = bits.len() / 10;
    let fiw_offset = 32 + 32 + 16 + 32;
    assert_eq!(word_at(&bits, fiw_offset), 0xF000_0283);
    assert_eq!(word_at(&bits, frame_len + fiw_offset), 0x7080_0252);
    assert_eq!(word_at(&bits, 9 * frame_len + fiw_offset), 0x6090_0249);
}

#[test]
fn test_flex_rejects_alpha_and_bad_address() {
    let alpha = EncoderBuilder::new()
        .with_protocol(Protocol::Flex)
        .with_capcode(1_337_331)
        .build();
    assert!(matches!(alpha, Err(EncodeError::UnsupportedType(_))));

    let low = EncoderBuilder::new()
        .with_protocol(Protocol::Flex)
        .with_capcode(32768)
        .with_message_type(MessageType::Numeric)
        .with_message("1")
        .build();
    assert!(matches!(low, Err(EncodeError::Range(_))));
}

#[cfg(feature = "serde")]
#[test]
fn test_config_json_roundtrip() {
    let config = EncoderConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let decoded: EncoderConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, decoded);
}
