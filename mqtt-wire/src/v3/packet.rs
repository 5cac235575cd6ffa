//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! The control packets a QoS 0 client sends and receives
//!
//! Outbound packets know their size and can write themselves out in full, fixed header
//! included. Inbound packets are parsed from a frame payload as produced by
//! [`mframe`](super::frame::mframe).

use nom::combinator::all_consuming;
use nom::number::complete::u8 as mu8;
use nom::sequence::tuple;

use super::connect_return::MConnectReturnCode;
use super::errors::MPacketHeaderError;
use super::errors::MPacketWriteError;
use super::header::fixed_header_byte;
use super::header::MPacketKind;
use super::identifier::MPacketIdentifier;
use super::integers::variable_u32_binary_size;
use super::integers::write_variable_u32;
use super::integers::VARIABLE_INTEGER_MAX;
use super::qos::MQualityOfService;
use super::strings::decode_mstring;
use super::strings::mstring_binary_size;
use super::strings::write_mstring;
use super::write::WResult;
use super::write::WriteMqttPacket;

fn write_fixed_header<W: WriteMqttPacket>(
    buffer: &mut W,
    kind: MPacketKind,
    flags: u8,
    remaining_length: usize,
) -> WResult<W> {
    let remaining_length = u32::try_from(remaining_length)
        .ok()
        .filter(|len| *len <= VARIABLE_INTEGER_MAX)
        .ok_or(MPacketWriteError::InvalidSize(remaining_length))?;

    buffer.write_byte(fixed_header_byte(kind, flags))?;
    write_variable_u32(buffer, remaining_length)
}

#[inline]
fn frame_size(remaining_length: usize) -> usize {
    let length_bytes = u32::try_from(remaining_length)
        .map(variable_u32_binary_size)
        .unwrap_or(5);
    1 + length_bytes + remaining_length
}

const CONNECT_FLAG_USERNAME: u8 = 0b1000_0000;
const CONNECT_FLAG_PASSWORD: u8 = 0b0100_0000;
const CONNECT_FLAG_CLEAN_SESSION: u8 = 0b0000_0010;

/// The CONNECT handshake request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MConnect<'message> {
    pub clean_session: bool,
    pub keep_alive: u16,
    pub client_id: &'message str,
    pub username: Option<&'message str>,
    pub password: Option<&'message [u8]>,
}

impl<'message> MConnect<'message> {
    pub const PROTOCOL_NAME: &'static str = "MQTT";
    pub const PROTOCOL_LEVEL: u8 = 4;

    pub fn connect_flags(&self) -> u8 {
        let mut flags = 0;
        if self.clean_session {
            flags |= CONNECT_FLAG_CLEAN_SESSION;
        }
        if self.username.is_some() {
            flags |= CONNECT_FLAG_USERNAME;
        }
        if self.password.is_some() {
            flags |= CONNECT_FLAG_PASSWORD;
        }
        flags
    }

    fn remaining_length(&self) -> usize {
        // protocol name, level, flags and keep alive
        mstring_binary_size(Self::PROTOCOL_NAME.as_bytes())
            + 1
            + 1
            + 2
            + mstring_binary_size(self.client_id.as_bytes())
            + self
                .username
                .map(|u| mstring_binary_size(u.as_bytes()))
                .unwrap_or_default()
            + self.password.map(mstring_binary_size).unwrap_or_default()
    }

    pub fn binary_size(&self) -> usize {
        frame_size(self.remaining_length())
    }

    pub fn write<W: WriteMqttPacket>(&self, buffer: &mut W) -> WResult<W> {
        write_fixed_header(buffer, MPacketKind::Connect, 0, self.remaining_length())?;

        write_mstring(buffer, Self::PROTOCOL_NAME.as_bytes())?;
        buffer.write_byte(Self::PROTOCOL_LEVEL)?;
        buffer.write_byte(self.connect_flags())?;
        buffer.write_u16(self.keep_alive)?;

        write_mstring(buffer, self.client_id.as_bytes())?;
        if let Some(username) = self.username {
            write_mstring(buffer, username.as_bytes())?;
        }
        if let Some(password) = self.password {
            write_mstring(buffer, password)?;
        }

        Ok(())
    }
}

/// A SUBSCRIBE request carrying a single topic filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MSubscribe<'message> {
    pub id: MPacketIdentifier,
    pub topic_filter: &'message str,
    pub qos: MQualityOfService,
}

impl<'message> MSubscribe<'message> {
    // Reserved bits of the SUBSCRIBE fixed header must be 0b0010
    const FLAGS: u8 = 0b0010;

    fn remaining_length(&self) -> usize {
        self.id.binary_size() + mstring_binary_size(self.topic_filter.as_bytes()) + 1
    }

    pub fn binary_size(&self) -> usize {
        frame_size(self.remaining_length())
    }

    pub fn write<W: WriteMqttPacket>(&self, buffer: &mut W) -> WResult<W> {
        write_fixed_header(buffer, MPacketKind::Subscribe, Self::FLAGS, self.remaining_length())?;

        self.id.write(buffer)?;
        write_mstring(buffer, self.topic_filter.as_bytes())?;
        buffer.write_byte(self.qos.as_u8())
    }
}

/// An outgoing QoS 0 PUBLISH
///
/// Without a QoS there is no packet identifier, the body follows the topic directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MPublish<'message> {
    pub retain: bool,
    pub topic_name: &'message str,
    pub payload: &'message [u8],
}

impl<'message> MPublish<'message> {
    fn remaining_length(&self) -> usize {
        mstring_binary_size(self.topic_name.as_bytes()) + self.payload.len()
    }

    pub fn binary_size(&self) -> usize {
        frame_size(self.remaining_length())
    }

    pub fn write<W: WriteMqttPacket>(&self, buffer: &mut W) -> WResult<W> {
        write_fixed_header(
            buffer,
            MPacketKind::Publish,
            u8::from(self.retain),
            self.remaining_length(),
        )?;

        write_mstring(buffer, self.topic_name.as_bytes())?;
        buffer.write_slice(self.payload)
    }
}

/// A CONNACK as seen by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MConnack {
    pub session_present: bool,
    pub return_code: u8,
}

impl MConnack {
    /// Parse a CONNACK payload, which has to be exactly two bytes long
    pub fn parse(payload: &[u8]) -> Option<MConnack> {
        let (_, (flags, return_code)) =
            all_consuming(tuple((mu8::<_, nom::error::Error<&[u8]>>, mu8)))(payload).ok()?;

        Some(MConnack {
            session_present: flags & 0b0000_0001 != 0,
            return_code,
        })
    }

    pub fn connect_return_code(&self) -> Result<MConnectReturnCode, MPacketHeaderError> {
        MConnectReturnCode::try_from(self.return_code)
    }
}

/// An incoming PUBLISH, borrowed from its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MPublishView<'message> {
    pub topic_name: &'message [u8],
    pub payload: &'message [u8],
}

impl<'message> MPublishView<'message> {
    /// Split a QoS 0 PUBLISH payload into topic and body
    ///
    /// Payloads shorter than a length prefix produce nothing. A topic prefix that overruns
    /// the payload reads as an empty topic, the body then starts right after the prefix.
    pub fn parse(payload: &'message [u8]) -> Option<MPublishView<'message>> {
        if payload.len() < 2 {
            return None;
        }

        let topic_name = decode_mstring(payload);
        let body = payload
            .get(mstring_binary_size(topic_name)..)
            .unwrap_or_default();

        Some(MPublishView {
            topic_name,
            payload: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::write_fixed_header;
    use super::MConnack;
    use super::MConnect;
    use super::MPublish;
    use super::MPublishView;
    use super::MSubscribe;
    use crate::v3::connect_return::MConnectReturnCode;
    use crate::v3::errors::MPacketWriteError;
    use crate::v3::header::MPacketKind;
    use crate::v3::identifier::MPacketIdentifier;
    use crate::v3::integers::VARIABLE_INTEGER_MAX;
    use crate::v3::qos::MQualityOfService;

    #[test]
    fn connect_without_credentials() {
        let connect = MConnect {
            clean_session: true,
            keep_alive: 30,
            client_id: "abc",
            username: None,
            password: None,
        };

        let mut buffer = Vec::new();
        connect.write(&mut buffer).unwrap();

        assert_eq!(
            buffer,
            vec![
                0x10, 0x0F, 0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x02, 0x00, 0x1E, 0x00,
                0x03, b'a', b'b', b'c'
            ]
        );
        assert_eq!(buffer.len(), connect.binary_size());
    }

    #[test]
    fn connect_with_credentials() {
        let connect = MConnect {
            clean_session: true,
            keep_alive: 300,
            client_id: "c",
            username: Some("user"),
            password: Some(b"pw"),
        };

        let mut buffer = Vec::new();
        connect.write(&mut buffer).unwrap();

        assert_eq!(connect.connect_flags(), 0xC2);
        assert_eq!(&buffer[..2], &[0x10, 0x17]);
        assert_eq!(&buffer[8..12], &[0x04, 0xC2, 0x01, 0x2C]);
        assert_eq!(&buffer[12..], b"\x00\x01c\x00\x04user\x00\x02pw");
        assert_eq!(buffer.len(), connect.binary_size());
    }

    #[test]
    fn oversized_client_id_is_refused() {
        let client_id = "x".repeat(70_000);
        let connect = MConnect {
            clean_session: true,
            keep_alive: 30,
            client_id: &client_id,
            username: None,
            password: None,
        };

        let mut buffer = Vec::new();
        assert_eq!(
            connect.write(&mut buffer),
            Err(MPacketWriteError::PayloadTooLarge(70_000))
        );
    }

    #[test]
    fn subscribe_layout() {
        let subscribe = MSubscribe {
            id: MPacketIdentifier(1),
            topic_filter: "a/b",
            qos: MQualityOfService::AtMostOnce,
        };

        let mut buffer = Vec::new();
        subscribe.write(&mut buffer).unwrap();

        assert_eq!(
            buffer,
            vec![0x82, 0x08, 0x00, 0x01, 0x00, 0x03, b'a', b'/', b'b', 0x00]
        );
        assert_eq!(buffer.len(), subscribe.binary_size());
    }

    #[test]
    fn publish_layout() {
        let publish = MPublish {
            retain: false,
            topic_name: "a/b",
            payload: b"hello",
        };

        let mut buffer = Vec::new();
        publish.write(&mut buffer).unwrap();

        assert_eq!(&buffer[..2], &[0x30, 0x0A]);
        assert_eq!(&buffer[2..], b"\x00\x03a/bhello");
        assert_eq!(buffer.len(), publish.binary_size());

        let mut retained = Vec::new();
        MPublish {
            retain: true,
            ..publish
        }
        .write(&mut retained)
        .unwrap();
        assert_eq!(retained[0], 0x31);
        assert_eq!(&retained[1..], &buffer[1..]);
    }

    #[test]
    fn publish_with_large_body_uses_longer_length() {
        let body = vec![0u8; 200];
        let publish = MPublish {
            retain: false,
            topic_name: "t",
            payload: &body,
        };

        let mut buffer = Vec::new();
        publish.write(&mut buffer).unwrap();

        // 2 + 1 + 200 = 203 = 0b1_1001011
        assert_eq!(&buffer[..3], &[0x30, 0xCB, 0x01]);
        assert_eq!(buffer.len(), publish.binary_size());
    }

    #[test]
    fn oversized_remaining_length_is_refused() {
        let mut buffer = Vec::new();
        let too_long = VARIABLE_INTEGER_MAX as usize + 1;

        assert_eq!(
            write_fixed_header(&mut buffer, MPacketKind::Publish, 0, too_long),
            Err(MPacketWriteError::InvalidSize(too_long))
        );
        assert!(buffer.is_empty());

        write_fixed_header(&mut buffer, MPacketKind::Publish, 0, too_long - 1).unwrap();
        assert_eq!(buffer, vec![0x30, 0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn connack_parsing() {
        assert_eq!(
            MConnack::parse(&[0x01, 0x00]),
            Some(MConnack {
                session_present: true,
                return_code: 0
            })
        );
        assert_eq!(
            MConnack::parse(&[0x00, 0x05])
                .unwrap()
                .connect_return_code(),
            Ok(MConnectReturnCode::NotAuthorized)
        );
        assert!(MConnack::parse(&[0x00, 0x09])
            .unwrap()
            .connect_return_code()
            .is_err());
        assert_eq!(MConnack::parse(&[0x00]), None);
        assert_eq!(MConnack::parse(&[0x00, 0x00, 0x00]), None);
    }

    #[test]
    fn publish_view_parsing() {
        assert_eq!(
            MPublishView::parse(b"\x00\x03a/bhello"),
            Some(MPublishView {
                topic_name: b"a/b",
                payload: b"hello"
            })
        );
        assert_eq!(
            MPublishView::parse(b"\x00\x03a/b"),
            Some(MPublishView {
                topic_name: b"a/b",
                payload: b""
            })
        );
        assert_eq!(MPublishView::parse(b"\x00"), None);
    }

    #[test]
    fn publish_view_with_overrunning_topic() {
        assert_eq!(
            MPublishView::parse(b"\x00\x09abc"),
            Some(MPublishView {
                topic_name: b"",
                payload: b"abc"
            })
        );
    }
}
