//! Bit primitives shared by the FLEX and POCSAG word builders
//!
//! Both protocols protect each 32-bit word with the same systematic
//! BCH(31,21) code plus an even overall parity bit:
//!
//! - bits 31..11: 21 information bits
//! - bits 10..1: BCH check bits, generator x^10+x^9+x^8+x^6+x^5+x^3+1
//! - bit 0: even parity over bits 31..1

use crate::core::{Codeword, DataWord, TransmitWord};

/// BCH(31,21) generator polynomial
pub const BCH_GENERATOR: u32 = 0x769;

/// Number of BCH check bits
const BCH_CHECK_BITS: u32 = 10;

/// Compute the FLEX 4-bit checksum of a data word (bits 4..20)
///
/// The checksum is the one's complement of the sum of the four nibbles
/// at bits 4, 8, 12 and 16 plus bit 20.
pub fn flex_checksum(word: u32) -> u32 {
    let sum = ((word >> 4) & 0xF)
        + ((word >> 8) & 0xF)
        + ((word >> 12) & 0xF)
        + ((word >> 16) & 0xF)
        + ((word >> 20) & 1);
    !sum & 0xF
}

/// Set the low 4 bits of a FLEX data word to its checksum
pub fn add_checksum(word: DataWord) -> DataWord {
    let raw = word.value() & !0xF;
    DataWord::new(raw | flex_checksum(raw))
}

/// Reverse the bit order of a 32-bit value (bit 0 <-> bit 31)
pub fn reverse_bits32(x: u32) -> u32 {
    x.reverse_bits()
}

/// Even parity of a 32-bit value (true when the number of ones is odd)
pub fn parity(x: u32) -> bool {
    x.count_ones() % 2 == 1
}

/// Compute the 10 BCH check bits for 21 information bits
fn bch_remainder(data: u32) -> u32 {
    let mut reg = data << BCH_CHECK_BITS;
    for i in (BCH_CHECK_BITS..31).rev() {
        if reg & (1 << i) != 0 {
            reg ^= BCH_GENERATOR << (i - BCH_CHECK_BITS);
        }
    }
    reg & 0x3FF
}

/// Encode the information bits of a word into a BCH(31,21) codeword
///
/// The low 11 bits of the input are ignored. The information bits are
/// left untouched in the result, which is what the POCSAG address
/// sanity check relies on.
pub fn encode_word(word: TransmitWord) -> Codeword {
    let data = word.data_bits();
    let with_check = data | (bch_remainder(data >> 11) << 1);
    Codeword::from_raw(with_check | parity(with_check) as u32)
}

/// Check whether a value is a valid codeword (zero syndrome, even parity)
pub fn is_codeword(value: u32) -> bool {
    encode_word(TransmitWord::new(value)).value() == value
}
