//! POCSAG address word and batch encoder
//!
//! A POCSAG transmission is a preamble followed by batches. Each batch is
//! one sync codeword and 16 codewords arranged as 8 frames of 2. A pager
//! only listens to the frame selected by the low 3 bits of its capcode, so
//! the address codeword must start in that frame.

use tracing::{debug, trace};

use crate::core::{Capcode, Codeword, TransmitWord};
use crate::encoding::encode_word;
use crate::error::{EncodeError, Result};
use crate::message::Message;
use crate::queue::BitQueue;

/// Frame synchronisation codeword opening every batch
pub const SYNC_WORD: Codeword = Codeword::from_raw(0x7CD2_15D8);

/// Idle codeword used to fill unused slots
pub const IDLE_WORD: Codeword = Codeword::from_raw(0x7A89_C197);

/// Preamble length in bits (alternating 1010..., starting with 1)
pub const PREAMBLE_BITS: usize = 576;

/// Codewords per batch, excluding the sync word
pub const WORDS_PER_BATCH: usize = 16;

/// Codewords per frame
pub const WORDS_PER_FRAME: usize = 2;

/// Build the address codeword for a capcode and function bits
///
/// The 18 high capcode bits land in bits 30..13 and the function bits in
/// 12..11; bit 31 is clear to mark an address codeword. The information
/// bits of the result are checked against the input so a faulty encoder
/// aborts the batch instead of sending a corrupt address.
pub fn address_word(capcode: Capcode, function_bits: u32) -> Result<Codeword> {
    let function_bits = EncodeError::check_width("function bits", function_bits, 2)?;
    let data = (capcode.address_bits() << 13) | (function_bits << 11);
    let word = encode_word(TransmitWord::new(data));

    if word.data_bits() != data {
        return Err(EncodeError::internal_consistency(format!(
            "Address codeword {:#010x} does not carry information bits {:#010x}",
            word.value(),
            data
        )));
    }
    trace!(capcode = capcode.value(), codeword = %word, "built address word");
    Ok(word)
}

/// The preamble as a bit pattern
pub fn preamble() -> impl Iterator<Item = bool> {
    (0..PREAMBLE_BITS).map(|i| i % 2 == 0)
}

/// Lay out the codewords following the preamble
///
/// The address goes into slot `2 * frame_offset` of the first batch,
/// preceded by idle frames. Body words follow it, running on into
/// further batches, each opened by a sync word and idle padded at the
/// tail. Body words always end with an idle terminator, so the layout
/// holds at least one word after the address.
pub fn layout(frame_offset: u32, address: Codeword, body: &[Codeword]) -> Vec<Codeword> {
    let first_slot = frame_offset as usize * WORDS_PER_FRAME;
    let mut words = Vec::with_capacity(1 + WORDS_PER_BATCH);
    let mut body = body.iter().copied();

    words.push(SYNC_WORD);
    words.extend(std::iter::repeat(IDLE_WORD).take(first_slot));
    words.push(address);
    for _ in first_slot + 1..WORDS_PER_BATCH {
        words.push(body.next().unwrap_or(IDLE_WORD));
    }

    let mut rest = body.peekable();
    while rest.peek().is_some() {
        words.push(SYNC_WORD);
        for _ in 0..WORDS_PER_BATCH {
            words.push(rest.next().unwrap_or(IDLE_WORD));
        }
    }
    words
}

/// Assemble a full POCSAG transmission for `message` into `queue`
///
/// The body is encoded and the address checked before anything is
/// queued.
pub fn queue_batch(queue: &mut BitQueue, message: &Message) -> Result<()> {
    let mut body = message.pocsag_body()?;
    body.push(IDLE_WORD);

    let address = address_word(message.capcode, message.message_type.function_bits())?;
    let words = layout(message.capcode.frame_offset(), address, &body);

    for bit in preamble() {
        queue.queue_bit(bit);
    }
    queue.queue_words(&words);

    debug!(
        capcode = message.capcode.value(),
        body_words = body.len(),
        batches = words.len() / (WORDS_PER_BATCH + 1),
        queued = queue.len(),
        "queued POCSAG transmission"
    );
    Ok(())
}
