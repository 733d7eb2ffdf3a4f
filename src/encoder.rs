//! Top-level encoder: assemble a batch once, then drain it as symbols

use tracing::debug;

use crate::core::{Capcode, Protocol, Symbol};
use crate::error::Result;
use crate::message::{Message, MessageType};
use crate::queue::BitQueue;
use crate::{constants, flex, pocsag};

/// Parameters for one encoding run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfig {
    /// Protocol to encode
    pub protocol: Protocol,
    /// Logical bit rate in bits per second
    pub baud_rate: u32,
    /// Output symbol rate, an exact multiple of `baud_rate`
    pub symbol_rate: u32,
    /// Destination capcode
    pub capcode: u32,
    /// Content type
    pub message_type: MessageType,
    /// Body text
    pub message: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            protocol: Protocol::Pocsag,
            baud_rate: constants::DEFAULT_BAUD_RATE,
            symbol_rate: constants::DEFAULT_SYMBOL_RATE,
            capcode: constants::DEFAULT_CAPCODE,
            message_type: MessageType::Alpha,
            message: constants::DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// A fully assembled paging transmission
///
/// Construction runs the selected batch encoder to completion. The queue
/// is then only ever drained, through [`Encoder::fetch`], [`Encoder::drain`]
/// or the [`Iterator`] implementation.
#[derive(Debug)]
pub struct Encoder {
    /// Protocol that produced the queue
    protocol: Protocol,
    /// Remaining oversampled bits
    queue: BitQueue,
}

impl Encoder {
    /// Validate `config` and assemble its batch
    ///
    /// Fails without building anything if the rates are incompatible, the
    /// capcode or message is out of range, or the message type is not
    /// supported by the protocol.
    pub fn new(config: &EncoderConfig) -> Result<Self> {
        let mut queue = BitQueue::new(config.baud_rate, config.symbol_rate)?;
        let message = Message::new(
            Capcode::new(config.capcode)?,
            config.message_type,
            config.message.clone(),
        );

        match config.protocol {
            Protocol::Flex => flex::queue_batch(&mut queue, &message)?,
            Protocol::Pocsag => pocsag::queue_batch(&mut queue, &message)?,
        }
        debug!(
            protocol = %config.protocol,
            symbols = queue.len(),
            interpolation = queue.interpolation(),
            "assembled batch"
        );

        Ok(Encoder {
            protocol: config.protocol,
            queue,
        })
    }

    /// Protocol this encoder carries
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Symbols not yet fetched
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Check if the stream has ended
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take up to `max_count` symbols from the front of the stream
    ///
    /// Returns `None` once the stream is exhausted. A returned chunk is
    /// shorter than `max_count` only when it reaches the end of the stream.
    pub fn fetch(&mut self, max_count: usize) -> Option<Vec<Symbol>> {
        if self.queue.is_empty() {
            return None;
        }
        Some(self.queue.drain_front(max_count).map(Symbol::from_bit).collect())
    }

    /// Fill `out` with polar values, returning how many were written
    ///
    /// Returns `None` once the stream is exhausted.
    pub fn fetch_into(&mut self, out: &mut [i8]) -> Option<usize> {
        if self.queue.is_empty() {
            return None;
        }
        let count = out.len();
        let mut written = 0;
        for (slot, bit) in out.iter_mut().zip(self.queue.drain_front(count)) {
            *slot = Symbol::from_bit(bit).as_i8();
            written += 1;
        }
        Some(written)
    }

    /// Take every remaining symbol
    pub fn drain(&mut self) -> Vec<Symbol> {
        self.queue
            .drain_front(usize::MAX)
            .map(Symbol::from_bit)
            .collect()
    }
}

impl Iterator for Encoder {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        self.queue.pop().map(Symbol::from_bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

/// Builder for [`Encoder`]
pub struct EncoderBuilder {
    config: EncoderConfig,
}

impl EncoderBuilder {
    /// Create a new builder with the default POCSAG configuration
    pub fn new() -> Self {
        EncoderBuilder {
            config: EncoderConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: EncoderConfig) -> Self {
        EncoderBuilder { config }
    }

    /// Set the protocol
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    /// Set the logical bit rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.config.baud_rate = baud_rate;
        self
    }

    /// Set the output symbol rate
    pub fn with_symbol_rate(mut self, symbol_rate: u32) -> Self {
        self.config.symbol_rate = symbol_rate;
        self
    }

    /// Set the destination capcode
    pub fn with_capcode(mut self, capcode: u32) -> Self {
        self.config.capcode = capcode;
        self
    }

    /// Set the message type
    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.config.message_type = message_type;
        self
    }

    /// Set the message body
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.config.message = message.into();
        self
    }

    /// The configuration built so far
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Assemble the encoder
    pub fn build(self) -> Result<Encoder> {
        Encoder::new(&self.config)
    }
}

impl Default for EncoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;

    #[test]
    fn test_builder_defaults() {
        let builder = EncoderBuilder::new();
        assert_eq!(builder.config().baud_rate, 1600);
        assert_eq!(builder.config().symbol_rate, 6400);
        assert_eq!(builder.config().capcode, 425321);
        assert_eq!(builder.config().message, "hello");
    }

    #[test]
    fn test_encoder_replicates_bits() {
        let single = EncoderBuilder::new().with_symbol_rate(1600).build().unwrap();
        let quad = EncoderBuilder::new().build().unwrap();
        assert_eq!(quad.remaining(), 4 * single.remaining());
    }

    #[test]
    fn test_encoder_rejects_uneven_rates() {
        let result = EncoderBuilder::new().with_symbol_rate(6401).build();
        assert!(matches!(result, Err(EncodeError::Configuration(_))));
    }

    #[test]
    fn test_encoder_rejects_wide_capcode() {
        let result = EncoderBuilder::new().with_capcode(1 << 21).build();
        assert!(matches!(result, Err(EncodeError::Range(_))));
    }

    #[test]
    fn test_fetch_until_end() {
        let mut encoder = EncoderBuilder::new().build().unwrap();
        let total = encoder.remaining();
        let mut seen = 0;
        while let Some(chunk) = encoder.fetch(1000) {
            assert!(chunk.len() <= 1000);
            seen += chunk.len();
        }
        assert_eq!(seen, total);
        assert!(encoder.is_finished());
        assert_eq!(encoder.fetch(10), None);
    }

    #[test]
    fn test_fetch_into_polar_values() {
        let mut encoder = EncoderBuilder::new().build().unwrap();
        let mut out = [0i8; 8];
        assert_eq!(encoder.fetch_into(&mut out), Some(8));
        // preamble starts 1,0 at four symbols per bit
        assert_eq!(out, [-1, -1, -1, -1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_iterator_matches_drain() {
        let a: Vec<Symbol> = EncoderBuilder::new().build().unwrap().collect();
        let b = EncoderBuilder::new().build().unwrap().drain();
        assert_eq!(a, b);
    }
}
