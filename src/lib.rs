//! # FLEX and POCSAG Paging Encoder
//!
//! Builds the exact on-air bit sequence of the FLEX and POCSAG paging
//! protocols from a capcode, a message type and a message body. The
//! result is an oversampled stream of polar symbols ready for an external
//! FSK modulator.
//!
//! This library provides:
//!
//! - BCH(31,21) codeword encoding and the FLEX word checksum
//! - FLEX frame, block and vector word builders and batch layout
//! - POCSAG address placement, batch and sync word interleaving
//! - Numeric and alphanumeric POCSAG message bodies
//! - Baud to symbol rate conversion by bit replication
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```
//! use pager_encoder::{EncoderBuilder, MessageType, Protocol};
//!
//! let mut encoder = EncoderBuilder::new()
//!     .with_protocol(Protocol::Pocsag)
//!     .with_capcode(425321)
//!     .with_message_type(MessageType::Alpha)
//!     .with_message("hello")
//!     .build()?;
//!
//! while let Some(symbols) = encoder.fetch(4096) {
//!     assert!(!symbols.is_empty());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod encoder;
pub mod encoding;
pub mod error;
pub mod flex;
pub mod message;
pub mod pocsag;
pub mod queue;

pub use crate::core::{Capcode, Codeword, DataWord, Protocol, Symbol, TransmitWord};
pub use encoder::{Encoder, EncoderBuilder, EncoderConfig};
pub use error::{EncodeError, Result};
pub use message::{Message, MessageType};
pub use queue::BitQueue;

/// Paging protocol constants and encoder defaults
pub mod constants {
    /// Default logical bit rate in bits per second
    pub const DEFAULT_BAUD_RATE: u32 = 1600;

    /// Default output symbol rate (four symbols per bit)
    pub const DEFAULT_SYMBOL_RATE: u32 = 6400;

    /// Default destination capcode
    pub const DEFAULT_CAPCODE: u32 = 425321;

    /// Default message body
    pub const DEFAULT_MESSAGE: &str = "hello";

    /// Codeword length in bits
    pub const WORD_LENGTH: usize = 32;

    /// BCH information bits per codeword
    pub const DATA_BITS: usize = 21;
}
