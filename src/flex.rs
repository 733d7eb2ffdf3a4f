//! FLEX word builders and batch encoder
//!
//! FLEX data words number their information bits x0..x20 with x0 sent
//! first. The builders pack fields at those positions, add the 4-bit
//! checksum in x0..x3 where the word type has one, reverse the word into
//! transmit order and BCH encode it.

use bitfield::bitfield;
use tracing::{debug, trace};

use crate::core::{Codeword, DataWord};
use crate::encoding::{add_checksum, encode_word, reverse_bits32};
use crate::error::{EncodeError, Result};
use crate::message::{numeric_digit, Message, MessageType, NUMERIC_SPACE};
use crate::queue::BitQueue;

/// Parse a literal `0`/`1` pattern into bits at compile time
const fn bit_pattern<const N: usize>(pattern: &[u8; N]) -> [bool; N] {
    let mut bits = [false; N];
    let mut i = 0;
    while i < N {
        bits[i] = pattern[i] == b'1';
        i += 1;
    }
    bits
}

/// Bit sync 1 (alternating), also used as inter-block filler
pub const BIT_SYNC_1: [bool; 32] = bit_pattern(b"10101010101010101010101010101010");

/// Frame sync A1 (1600 bps, 2-level)
pub const FRAME_SYNC_A1: [bool; 32] = bit_pattern(b"01111000111100110101100100111001");

/// Frame sync B
pub const FRAME_SYNC_B: [bool; 16] = bit_pattern(b"0101010101010101");

/// Bit-inverse of frame sync A1
pub const FRAME_SYNC_A1_INVERTED: [bool; 32] =
    bit_pattern(b"10000111000011001010011011000110");

/// Fixed control block following the frame information word
pub const CONTROL_BLOCK: [bool; 40] =
    bit_pattern(b"1010111011011000010001010001001001111011");

/// Frames queued per batch
pub const FRAMES_PER_BATCH: u32 = 10;

/// Blocks queued per frame
pub const BLOCKS_PER_FRAME: u32 = 11;

/// Bit-sync repetitions queued after every block
pub const BLOCK_FILLER_REPEATS: usize = 4;

/// Lowest short address accepted by [`short_address_word`]
pub const SHORT_ADDRESS_MIN: u32 = 32769;

/// Highest short address accepted by [`short_address_word`]
pub const SHORT_ADDRESS_MAX: u32 = 1_966_080;

/// Vector type code for a numeric message
pub const VECTOR_TYPE_NUMERIC: u32 = 3;

/// Most message words a numeric vector can describe
pub const MAX_NUMERIC_WORDS: usize = 8;

/// Information bits per FLEX word
const WORD_DATA_BITS: u32 = 21;

/// Bits reserved for the message checksum at the start of a numeric message
const NUMERIC_CHECK_BITS: u32 = 2;

/// Word index of the vector word within a block (BIW, address, vector)
const VECTOR_START: u32 = 2;

/// Word index of the first message word within a block
const MESSAGE_START: u32 = 3;

bitfield! {
    /// Frame information word layout
    pub struct FrameInfoFields(u32);
    impl Debug;
    u32;
    pub checksum, set_checksum: 3, 0;
    pub cycle, set_cycle: 7, 4;
    pub frame, set_frame: 14, 8;
    pub roaming, set_roaming: 15;
    pub repeat, set_repeat: 16;
    pub t, set_t: 20, 17;
}

bitfield! {
    /// Block information word 1 layout
    pub struct BlockInfoFields(u32);
    impl Debug;
    u32;
    pub checksum, set_checksum: 3, 0;
    pub priority, set_priority: 7, 4;
    pub end_block, set_end_block: 9, 8;
    pub vector_start, set_vector_start: 15, 10;
    pub carry_on, set_carry_on: 17, 16;
    pub collapse, set_collapse: 20, 18;
}

bitfield! {
    /// Numeric vector word layout
    pub struct NumericVectorFields(u32);
    impl Debug;
    u32;
    pub checksum, set_checksum: 3, 0;
    pub vector_type, set_vector_type: 6, 4;
    pub message_start, set_message_start: 13, 7;
    pub word_count, set_word_count: 16, 14;
    pub message_checksum, set_message_checksum: 20, 17;
}

/// Checksum, reverse and encode a packed data word
fn seal(word: DataWord) -> Codeword {
    encode_word(add_checksum(word).to_transmit_order())
}

/// Recover the 21 information bits of a FLEX codeword in x0-first order
pub fn decode_data_word(word: Codeword) -> DataWord {
    DataWord::new(reverse_bits32(word.data_bits()))
}

/// Build an encoded frame information word
pub fn frame_info_word(cycle: u32, frame: u32, roaming: bool, repeat: bool, t: u32) -> Result<Codeword> {
    let mut fields = FrameInfoFields(0);
    fields.set_cycle(EncodeError::check_width("cycle", cycle, 4)?);
    fields.set_frame(EncodeError::check_width("frame", frame, 7)?);
    fields.set_roaming(roaming);
    fields.set_repeat(repeat);
    fields.set_t(EncodeError::check_width("t", t, 4)?);

    let word = seal(DataWord::new(fields.0));
    trace!(cycle, frame, codeword = %word, "built FIW");
    Ok(word)
}

/// Build an encoded block information word 1
///
/// `end_block` is the raw field value `a`; the block holds `a + 1`
/// block information words.
pub fn block_info_word1(
    priority: u32,
    end_block: u32,
    vector_start: u32,
    carry_on: u32,
    collapse: u32,
) -> Result<Codeword> {
    let mut fields = BlockInfoFields(0);
    fields.set_priority(EncodeError::check_width("priority", priority, 4)?);
    fields.set_end_block(EncodeError::check_width("end block", end_block, 2)?);
    fields.set_vector_start(EncodeError::check_width("vector start", vector_start, 6)?);
    fields.set_carry_on(EncodeError::check_width("carry on", carry_on, 2)?);
    fields.set_collapse(EncodeError::check_width("collapse", collapse, 3)?);

    Ok(seal(DataWord::new(fields.0)))
}

/// Build an encoded short address word
///
/// Short address words carry no checksum; the whole 21 bits are address.
pub fn short_address_word(address: u32) -> Result<Codeword> {
    if !(SHORT_ADDRESS_MIN..=SHORT_ADDRESS_MAX).contains(&address) {
        return Err(EncodeError::range(format!(
            "Short address {} out of range [{}, {}]",
            address, SHORT_ADDRESS_MIN, SHORT_ADDRESS_MAX
        )));
    }
    Ok(encode_word(DataWord::new(address).to_transmit_order()))
}

/// Build an encoded numeric vector word
///
/// `word_count` is the raw field value; the message spans
/// `word_count + 1` words.
pub fn numeric_vector_word(
    vector_type: u32,
    message_start: u32,
    word_count: u32,
    message_checksum: u32,
) -> Result<Codeword> {
    let mut fields = NumericVectorFields(0);
    fields.set_vector_type(EncodeError::check_width("vector type", vector_type, 3)?);
    fields.set_message_start(EncodeError::check_width("message start", message_start, 7)?);
    fields.set_word_count(EncodeError::check_width("word count", word_count, 3)?);
    fields.set_message_checksum(EncodeError::check_width(
        "message checksum",
        message_checksum,
        4,
    )?);

    Ok(seal(DataWord::new(fields.0)))
}

/// A numeric page packed into FLEX message data words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericMessage {
    /// Data words in x0-first order, checksum bits included
    words: Vec<DataWord>,
    /// Low 4 bits of the message checksum, carried by the vector word
    vector_checksum: u32,
}

impl NumericMessage {
    /// Pack numeric text into message words and compute its checksum
    ///
    /// Digits are packed contiguously after the two checksum bits of the
    /// first word. Whole unused digit positions in the last word are
    /// filled with spaces.
    pub fn pack(text: &str) -> Result<Self> {
        let mut raw: Vec<u32> = Vec::new();
        let mut pos = NUMERIC_CHECK_BITS;

        let mut put_digit = |digit: u32, pos: &mut u32| {
            for i in 0..4 {
                let index = (*pos / WORD_DATA_BITS) as usize;
                if index == raw.len() {
                    raw.push(0);
                }
                raw[index] |= ((digit >> i) & 1) << (*pos % WORD_DATA_BITS);
                *pos += 1;
            }
        };

        for c in text.chars() {
            let digit = numeric_digit(c).ok_or_else(|| {
                EncodeError::invalid_message(format!("Character {:?} is not in the numeric set", c))
            })?;
            put_digit(digit, &mut pos);
        }
        while pos % WORD_DATA_BITS != 0 && pos % WORD_DATA_BITS + 4 <= WORD_DATA_BITS {
            put_digit(NUMERIC_SPACE, &mut pos);
        }

        if raw.len() > MAX_NUMERIC_WORDS {
            return Err(EncodeError::invalid_message(format!(
                "Numeric message needs {} words, at most {} fit one vector",
                raw.len(),
                MAX_NUMERIC_WORDS
            )));
        }

        let checksum = numeric_checksum(&raw);
        raw[0] |= (checksum >> 4) & 0x3;

        Ok(NumericMessage {
            words: raw.into_iter().map(DataWord::new).collect(),
            vector_checksum: checksum & 0xF,
        })
    }

    /// Message data words in x0-first order
    pub fn words(&self) -> &[DataWord] {
        &self.words
    }

    /// Checksum nibble for the vector word
    pub fn vector_checksum(&self) -> u32 {
        self.vector_checksum
    }

    /// Raw vector word count field (`words - 1`)
    pub fn word_count_field(&self) -> u32 {
        self.words.len() as u32 - 1
    }

    /// BCH-encoded message words in transmit order
    pub fn codewords(&self) -> Vec<Codeword> {
        self.words
            .iter()
            .map(|&w| encode_word(w.to_transmit_order()))
            .collect()
    }
}

/// Numeric message checksum over words whose checksum bits are still clear
///
/// The 8-bit sum of each word's bit groups 0-7, 8-15 and 16-20 is folded
/// and complemented; bits 5..4 go into the first message word and bits
/// 3..0 into the vector word.
pub fn numeric_checksum(words: &[u32]) -> u32 {
    let binsum = words
        .iter()
        .map(|w| (w & 0xFF) + ((w >> 8) & 0xFF) + ((w >> 16) & 0x1F))
        .sum::<u32>()
        & 0xFF;
    let folded = (binsum & 0x1F) + ((binsum >> 6) & 0x3);
    !folded & 0x3F
}

/// The words of one block, built before anything is queued
struct BlockWords {
    block_info: Codeword,
    address: Codeword,
    vector: Codeword,
    message: Vec<Codeword>,
}

/// Assemble a full FLEX batch into `queue`
///
/// Queues ten frames of cycle 0. Every frame carries the sync sequence,
/// its frame information word, the control block and eleven blocks
/// addressed to the message capcode. All words are built first, so an
/// error leaves `queue` untouched.
pub fn queue_batch(queue: &mut BitQueue, message: &Message) -> Result<()> {
    if message.message_type != MessageType::Numeric {
        return Err(EncodeError::unsupported_type(format!(
            "FLEX batches carry numeric messages only, got {}",
            message.message_type
        )));
    }

    let numeric = NumericMessage::pack(&message.text)?;
    let block = BlockWords {
        block_info: block_info_word1(0, 0, VECTOR_START, 0, 0)?,
        address: short_address_word(message.capcode.value())?,
        vector: numeric_vector_word(
            VECTOR_TYPE_NUMERIC,
            MESSAGE_START,
            numeric.word_count_field(),
            numeric.vector_checksum(),
        )?,
        message: numeric.codewords(),
    };
    let frame_info = (0..FRAMES_PER_BATCH)
        .map(|frame| frame_info_word(0, frame, false, false, 0))
        .collect::<Result<Vec<_>>>()?;

    for (frame, &fiw) in frame_info.iter().enumerate() {
        queue.queue_vector(&BIT_SYNC_1);
        queue.queue_vector(&FRAME_SYNC_A1);
        queue.queue_vector(&FRAME_SYNC_B);
        queue.queue_vector(&FRAME_SYNC_A1_INVERTED);
        queue.queue_word(fiw);
        queue.queue_vector(&CONTROL_BLOCK);

        for _ in 0..BLOCKS_PER_FRAME {
            queue.queue_word(block.block_info);
            queue.queue_word(block.address);
            queue.queue_word(block.vector);
            queue.queue_words(&block.message);
            for _ in 0..BLOCK_FILLER_REPEATS {
                queue.queue_vector(&BIT_SYNC_1);
            }
        }
        debug!(frame, queued = queue.len(), "queued FLEX frame");
    }

    Ok(())
}
