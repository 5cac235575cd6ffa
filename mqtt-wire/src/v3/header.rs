//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MPacketKind {
    Connect,
    Connack,
    Publish,
    Puback,
    Pubrec,
    Pubrel,
    Pubcomp,
    Subscribe,
    Suback,
    Unsubscribe,
    Unsuback,
    Pingreq,
    Pingresp,
    Disconnect,
    /// Type codes 0 and 15 are reserved in 3.1.1
    Reserved(u8),
}

impl MPacketKind {
    /// Map the upper nibble of a fixed header to a packet kind
    pub fn from_nibble(nibble: u8) -> MPacketKind {
        match nibble & 0x0F {
            1 => MPacketKind::Connect,
            2 => MPacketKind::Connack,
            3 => MPacketKind::Publish,
            4 => MPacketKind::Puback,
            5 => MPacketKind::Pubrec,
            6 => MPacketKind::Pubrel,
            7 => MPacketKind::Pubcomp,
            8 => MPacketKind::Subscribe,
            9 => MPacketKind::Suback,
            10 => MPacketKind::Unsubscribe,
            11 => MPacketKind::Unsuback,
            12 => MPacketKind::Pingreq,
            13 => MPacketKind::Pingresp,
            14 => MPacketKind::Disconnect,
            reserved => MPacketKind::Reserved(reserved),
        }
    }

    pub fn as_nibble(&self) -> u8 {
        match self {
            MPacketKind::Connect => 1,
            MPacketKind::Connack => 2,
            MPacketKind::Publish => 3,
            MPacketKind::Puback => 4,
            MPacketKind::Pubrec => 5,
            MPacketKind::Pubrel => 6,
            MPacketKind::Pubcomp => 7,
            MPacketKind::Subscribe => 8,
            MPacketKind::Suback => 9,
            MPacketKind::Unsubscribe => 10,
            MPacketKind::Unsuback => 11,
            MPacketKind::Pingreq => 12,
            MPacketKind::Pingresp => 13,
            MPacketKind::Disconnect => 14,
            MPacketKind::Reserved(code) => *code & 0x0F,
        }
    }
}

/// Compose the first byte of a fixed header
#[inline]
pub fn fixed_header_byte(kind: MPacketKind, flags: u8) -> u8 {
    (kind.as_nibble() << 4) | (flags & 0x0F)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MFixedHeader {
    kind: MPacketKind,
    flags: u8,
    remaining_length: u32,
}

impl MFixedHeader {
    pub fn new(first_byte: u8, remaining_length: u32) -> MFixedHeader {
        MFixedHeader {
            kind: MPacketKind::from_nibble(first_byte >> 4),
            flags: first_byte & 0x0F,
            remaining_length,
        }
    }

    #[must_use]
    pub fn kind(&self) -> MPacketKind {
        self.kind
    }

    #[must_use]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    #[must_use]
    pub fn remaining_length(&self) -> u32 {
        self.remaining_length
    }
}
