//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use nom::multi::length_data;
use nom::number::complete::be_u16;

use super::errors::MPacketWriteError;
use super::write::WResult;
use super::write::WriteMqttPacket;
use super::MSResult;

/// Longest string that fits behind the two byte length prefix
pub const MSTRING_MAX_LEN: usize = u16::MAX as usize;

#[inline]
pub fn mstring_binary_size(s: &[u8]) -> usize {
    2 + s.len()
}

pub fn write_mstring<W: WriteMqttPacket>(buffer: &mut W, s: &[u8]) -> WResult<W> {
    let Ok(len) = u16::try_from(s.len()) else {
        return Err(MPacketWriteError::PayloadTooLarge(s.len()).into());
    };

    buffer.write_u16(len)?;
    buffer.write_slice(s)
}

/// Length-prefix `s`
pub fn encode_mstring(s: impl AsRef<[u8]>) -> Result<Vec<u8>, MPacketWriteError> {
    let s = s.as_ref();
    let mut buffer = Vec::with_capacity(mstring_binary_size(s));
    write_mstring(&mut buffer, s)?;
    Ok(buffer)
}

/// Parse a length-prefixed byte string, failing on short input
pub fn mstring(input: &[u8]) -> MSResult<'_, &[u8]> {
    length_data(be_u16)(input)
}

/// Read the length-prefixed string at the front of `input`
///
/// A prefix announcing more bytes than `input` holds yields an empty slice instead of an
/// error. Inbound PUBLISH handling relies on this.
pub fn decode_mstring(input: &[u8]) -> &[u8] {
    mstring(input).map(|(_, s)| s).unwrap_or_default()
}
