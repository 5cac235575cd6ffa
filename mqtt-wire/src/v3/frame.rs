//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! Locating complete frames in a stream of bytes

use super::header::MFixedHeader;
use super::header::MPacketKind;
use super::integers::decode_variable_u32;
use super::integers::VARIABLE_INTEGER_MAX_BYTES;

/// A fully buffered control packet, borrowed from the input it was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MFrame<'message> {
    header: MFixedHeader,
    payload: &'message [u8],
}

impl<'message> MFrame<'message> {
    pub fn header(&self) -> MFixedHeader {
        self.header
    }

    pub fn kind(&self) -> MPacketKind {
        self.header.kind()
    }

    /// Everything after the fixed header, exactly `remaining_length` bytes
    pub fn payload(&self) -> &'message [u8] {
        self.payload
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MFrameStatus<'message> {
    /// A frame occupying the first `consumed` bytes of the input
    Complete {
        frame: MFrame<'message>,
        consumed: usize,
    },
    /// More bytes are needed before anything can be said
    Incomplete,
    /// The remaining length did not terminate within four bytes
    Malformed,
}

/// Try to cut one frame off the front of `input`
pub fn mframe(input: &[u8]) -> MFrameStatus<'_> {
    let Some((&first_byte, rest)) = input.split_first() else {
        return MFrameStatus::Incomplete;
    };

    let Some((remaining_length, length_bytes)) = decode_variable_u32(rest) else {
        if rest.len() >= VARIABLE_INTEGER_MAX_BYTES {
            return MFrameStatus::Malformed;
        }
        return MFrameStatus::Incomplete;
    };

    let header_len = 1 + length_bytes;
    let consumed = header_len + remaining_length as usize;

    match input.get(header_len..consumed) {
        Some(payload) => MFrameStatus::Complete {
            frame: MFrame {
                header: MFixedHeader::new(first_byte, remaining_length),
                payload,
            },
            consumed,
        },
        None => MFrameStatus::Incomplete,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::mframe;
    use super::MFrameStatus;
    use crate::v3::header::MPacketKind;

    #[test]
    fn complete_frame_is_found() {
        let input = [0x20, 0x02, 0x00, 0x00, 0xFF];

        let MFrameStatus::Complete { frame, consumed } = mframe(&input) else {
            panic!("Expected a complete frame");
        };

        assert_eq!(consumed, 4);
        assert_eq!(frame.kind(), MPacketKind::Connack);
        assert_eq!(frame.payload(), &[0x00, 0x00]);
        assert_eq!(frame.header().remaining_length(), 2);
    }

    #[test]
    fn empty_payloads_are_complete() {
        let MFrameStatus::Complete { frame, consumed } = mframe(&[0xD0, 0x00]) else {
            panic!("Expected a complete frame");
        };

        assert_eq!(consumed, 2);
        assert_eq!(frame.kind(), MPacketKind::Pingresp);
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn partial_frames_are_incomplete() {
        assert_eq!(mframe(&[]), MFrameStatus::Incomplete);
        assert_eq!(mframe(&[0x30]), MFrameStatus::Incomplete);
        assert_eq!(mframe(&[0x30, 0x0A, 0x00, 0x03]), MFrameStatus::Incomplete);
        // remaining length cut short by the end of the input
        assert_eq!(mframe(&[0x30, 0x80, 0x80]), MFrameStatus::Incomplete);
    }

    #[test]
    fn long_remaining_lengths_are_malformed() {
        assert_eq!(mframe(&[0x30, 0xFF, 0xFF, 0xFF, 0xFF]), MFrameStatus::Malformed);
        assert_eq!(
            mframe(&[0x30, 0x80, 0x80, 0x80, 0x80, 0x01, 0x00]),
            MFrameStatus::Malformed
        );
    }

    #[test]
    fn multi_byte_lengths_are_honoured() {
        let mut input = vec![0x30, 0x80, 0x01];
        input.extend(std::iter::repeat(0xAB).take(128));

        let MFrameStatus::Complete { frame, consumed } = mframe(&input) else {
            panic!("Expected a complete frame");
        };
        assert_eq!(consumed, 131);
        assert_eq!(frame.payload().len(), 128);

        assert_eq!(mframe(&input[..130]), MFrameStatus::Incomplete);
    }
}
