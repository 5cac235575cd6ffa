//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use super::errors::MPacketWriteError;

pub type WResult<W> = core::result::Result<(), <W as WriteMqttPacket>::Error>;

/// A sink for encoded packet bytes
pub trait WriteMqttPacket {
    type Error: From<MPacketWriteError>;

    fn write_byte(&mut self, u: u8) -> WResult<Self>;
    fn write_slice(&mut self, u: &[u8]) -> WResult<Self>;

    #[inline]
    fn write_u16(&mut self, u: u16) -> WResult<Self> {
        self.write_slice(&u.to_be_bytes())
    }
}

impl WriteMqttPacket for Vec<u8> {
    type Error = MPacketWriteError;

    fn write_byte(&mut self, u: u8) -> WResult<Self> {
        self.push(u);
        Ok(())
    }

    fn write_slice(&mut self, u: &[u8]) -> WResult<Self> {
        self.extend_from_slice(u);
        Ok(())
    }
}
