//! Bit queue and baud-to-symbol-rate conversion
//!
//! The queue is filled once by a batch encoder and drained front to back
//! by the output side. Each logical bit is replicated
//! `symbol_rate / baud_rate` times as it is queued.

use std::collections::VecDeque;

use crate::core::Codeword;
use crate::error::{EncodeError, Result};

/// FIFO of oversampled bits
///
/// # Invariants
/// - `interpolation >= 1`
/// - the queue length is always a multiple of `interpolation`
#[derive(Debug, Clone)]
pub struct BitQueue {
    /// Queued symbols-to-be, oldest first
    bits: VecDeque<bool>,
    /// Copies of each logical bit
    interpolation: usize,
}

impl BitQueue {
    /// Create a queue converting `baud_rate` bits/s into `symbol_rate` symbols/s
    ///
    /// Fails with a configuration error if either rate is zero or the
    /// symbol rate is not an exact multiple of the baud rate.
    pub fn new(baud_rate: u32, symbol_rate: u32) -> Result<Self> {
        if baud_rate == 0 || symbol_rate == 0 {
            return Err(EncodeError::configuration(format!(
                "Rates must be non-zero (baud {}, symbol rate {})",
                baud_rate, symbol_rate
            )));
        }
        if symbol_rate % baud_rate != 0 {
            return Err(EncodeError::configuration(format!(
                "Symbol rate {} is not evenly divisible by baud rate {}",
                symbol_rate, baud_rate
            )));
        }

        Ok(BitQueue {
            bits: VecDeque::new(),
            interpolation: (symbol_rate / baud_rate) as usize,
        })
    }

    /// Number of output symbols emitted per logical bit
    pub fn interpolation(&self) -> usize {
        self.interpolation
    }

    /// Queue one logical bit
    pub fn queue_bit(&mut self, bit: bool) {
        self.bits
            .extend(std::iter::repeat(bit).take(self.interpolation));
    }

    /// Queue the 32 bits of a codeword, most significant first
    pub fn queue_word(&mut self, word: Codeword) {
        for bit in word.bits() {
            self.queue_bit(bit);
        }
    }

    /// Queue several codewords in order
    pub fn queue_words(&mut self, words: &[Codeword]) {
        for &word in words {
            self.queue_word(word);
        }
    }

    /// Queue a literal bit pattern in the order given
    pub fn queue_vector(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.queue_bit(bit);
        }
    }

    /// Number of queued (oversampled) bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Number of queued logical bits
    pub fn logical_len(&self) -> usize {
        self.bits.len() / self.interpolation
    }

    /// Check if the queue has been fully drained
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Remove and return the oldest bit
    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop_front()
    }

    /// Remove up to `max` bits from the front
    pub fn drain_front(&mut self, max: usize) -> impl Iterator<Item = bool> + '_ {
        let count = max.min(self.bits.len());
        self.bits.drain(..count)
    }

    /// Look at the queued bits without removing them
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}
