//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use bytes::BufMut;
use bytes::BytesMut;
use mqtt_wire::v3::errors::MPacketWriteError;
use mqtt_wire::v3::write::WResult;
use mqtt_wire::v3::write::WriteMqttPacket;

pub(crate) struct BytesMutWriter<'b>(pub(crate) &'b mut BytesMut);

impl WriteMqttPacket for BytesMutWriter<'_> {
    type Error = MPacketWriteError;

    fn write_byte(&mut self, u: u8) -> WResult<Self> {
        self.0.put_u8(u);
        Ok(())
    }

    fn write_slice(&mut self, u: &[u8]) -> WResult<Self> {
        self.0.extend_from_slice(u);
        Ok(())
    }

    fn write_u16(&mut self, u: u16) -> WResult<Self> {
        self.0.put_u16(u);
        Ok(())
    }
}

/// Encode a packet into a fresh buffer of exactly `size` bytes
///
/// Nothing is returned unless the whole packet could be written.
pub(crate) fn encode_packet<F>(size: usize, write: F) -> Result<BytesMut, MPacketWriteError>
where
    F: FnOnce(&mut BytesMutWriter<'_>) -> Result<(), MPacketWriteError>,
{
    let mut buffer = BytesMut::with_capacity(size);
    write(&mut BytesMutWriter(&mut buffer))?;
    debug_assert_eq!(buffer.len(), size);
    Ok(buffer)
}
