//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! The variable byte integer used for the remaining length
//!
//! Seven bits of payload per byte, least significant group first, with the high bit
//! signalling that another byte follows.

use super::write::WResult;
use super::write::WriteMqttPacket;

/// Largest value representable in the four bytes the protocol allows
pub const VARIABLE_INTEGER_MAX: u32 = 268_435_455;

/// Maximum number of bytes a conformant variable integer occupies
pub const VARIABLE_INTEGER_MAX_BYTES: usize = 4;

const CONTINUATION_BIT: u8 = 0b1000_0000;
const VALUE_BITS: u8 = 0b0111_1111;

#[inline]
pub const fn variable_u32_binary_size(u: u32) -> usize {
    match u {
        0..=127 => 1,
        128..=16383 => 2,
        16384..=2_097_151 => 3,
        2_097_152..=VARIABLE_INTEGER_MAX => 4,
        _ => 5,
    }
}

/// Encode `u` as a variable integer
///
/// At least one byte is always produced. Values above [`VARIABLE_INTEGER_MAX`] spill into a
/// fifth byte; packet writers refuse those lengths before they get here.
pub fn encode_variable_u32(mut u: u32) -> Vec<u8> {
    let mut output = Vec::with_capacity(variable_u32_binary_size(u));

    loop {
        let mut byte = u as u8 & VALUE_BITS;
        u >>= 7;
        if u > 0 {
            byte |= CONTINUATION_BIT;
        }
        output.push(byte);

        if u == 0 {
            return output;
        }
    }
}

pub fn write_variable_u32<W: WriteMqttPacket>(buffer: &mut W, u: u32) -> WResult<W> {
    buffer.write_slice(&encode_variable_u32(u))
}

/// Decode a variable integer from the front of `input`
///
/// Returns the value and the amount of bytes it occupied. At most
/// [`VARIABLE_INTEGER_MAX_BYTES`] are inspected; `None` means that no terminating byte was
/// found in that window, either because `input` ends early or because the encoding is too long.
pub fn decode_variable_u32(input: &[u8]) -> Option<(u32, usize)> {
    let mut output: u32 = 0;

    for (idx, byte) in input.iter().take(VARIABLE_INTEGER_MAX_BYTES).enumerate() {
        output |= u32::from(byte & VALUE_BITS) << (7 * idx);

        if byte & CONTINUATION_BIT == 0 {
            return Some((output, idx + 1));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::decode_variable_u32;
    use super::encode_variable_u32;
    use super::variable_u32_binary_size;
    use super::write_variable_u32;
    use super::VARIABLE_INTEGER_MAX;

    #[test]
    fn check_variable_length_decoding() {
        assert_eq!(decode_variable_u32(&[64]), Some((64, 1)));
        assert_eq!(decode_variable_u32(&[193, 2]), Some((321, 2)));
        assert_eq!(decode_variable_u32(&[0x00, 0xFF]), Some((0, 1)));
    }

    #[test]
    fn check_variable_length_encoding() {
        assert_eq!(encode_variable_u32(0), vec![0x00]);
        assert_eq!(encode_variable_u32(127), vec![0x7F]);
        assert_eq!(encode_variable_u32(128), vec![0x80, 0x01]);
        assert_eq!(encode_variable_u32(321), vec![0xC1, 0x02]);
        assert_eq!(encode_variable_u32(16_383), vec![0xFF, 0x7F]);
        assert_eq!(encode_variable_u32(16_384), vec![0x80, 0x80, 0x01]);
        assert_eq!(
            encode_variable_u32(VARIABLE_INTEGER_MAX),
            vec![0xFF, 0xFF, 0xFF, 0x7F]
        );
    }

    #[test]
    fn oversized_values_spill_into_a_fifth_byte() {
        let encoded = encode_variable_u32(VARIABLE_INTEGER_MAX + 1);
        assert_eq!(encoded, vec![0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(variable_u32_binary_size(VARIABLE_INTEGER_MAX + 1), 5);
        assert_eq!(decode_variable_u32(&encoded), None);
    }

    #[test]
    fn unterminated_input_is_rejected() {
        assert_eq!(decode_variable_u32(&[]), None);
        assert_eq!(decode_variable_u32(&[0x80]), None);
        assert_eq!(decode_variable_u32(&[0x80, 0x80, 0x80]), None);
        assert_eq!(decode_variable_u32(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01]), None);
    }

    #[test]
    fn writer_matches_encoder() {
        let mut buffer = Vec::new();
        write_variable_u32(&mut buffer, 2_097_152).unwrap();
        assert_eq!(buffer, encode_variable_u32(2_097_152));
    }

    proptest! {
        #[test]
        fn variable_integers_roundtrip(n in 0u32..=VARIABLE_INTEGER_MAX) {
            let encoded = encode_variable_u32(n);
            prop_assert_eq!(encoded.len(), variable_u32_binary_size(n));
            prop_assert_eq!(decode_variable_u32(&encoded), Some((n, encoded.len())));
        }

        #[test]
        fn trailing_bytes_are_not_consumed(n in 0u32..=VARIABLE_INTEGER_MAX, tail in proptest::collection::vec(any::<u8>(), 0..8)) {
            let mut encoded = encode_variable_u32(n);
            let len = encoded.len();
            encoded.extend(tail);
            prop_assert_eq!(decode_variable_u32(&encoded), Some((n, len)));
        }
    }
}
