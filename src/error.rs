//! Error types for FLEX and POCSAG encoding

use thiserror::Error;

/// Result type for paging encoder operations
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Error types encountered while assembling a paging batch
///
/// Every variant is raised before anything is queued, so a failed
/// encoder never exposes a partial batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Rate configuration cannot be realised by bit replication
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A field, address or capcode is outside its protocol bounds
    #[error("Range error: {0}")]
    Range(String),

    /// Message type not supported by the selected protocol
    #[error("Unsupported message type: {0}")]
    UnsupportedType(String),

    /// Message body cannot be represented in the selected character set
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The FEC transform or field packing produced an impossible word
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
}

impl EncodeError {
    /// Create a new Configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        EncodeError::Configuration(msg.into())
    }

    /// Create a new Range error
    pub fn range(msg: impl Into<String>) -> Self {
        EncodeError::Range(msg.into())
    }

    /// Create a new UnsupportedType error
    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        EncodeError::UnsupportedType(msg.into())
    }

    /// Create a new InvalidMessage error
    pub fn invalid_message(msg: impl Into<String>) -> Self {
        EncodeError::InvalidMessage(msg.into())
    }

    /// Create a new InternalConsistency error
    pub fn internal_consistency(msg: impl Into<String>) -> Self {
        EncodeError::InternalConsistency(msg.into())
    }

    /// Check that `value` fits in an unsigned field `bits` wide
    pub(crate) fn check_width(field: &str, value: u32, bits: u32) -> Result<u32> {
        if bits < 32 && value >> bits != 0 {
            return Err(EncodeError::range(format!(
                "{} value {} does not fit in {} bits",
                field, value, bits
            )));
        }
        Ok(value)
    }
}
