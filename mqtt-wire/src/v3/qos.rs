//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use super::errors::MPacketHeaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MQualityOfService {
    #[default]
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl MQualityOfService {
    pub fn as_u8(&self) -> u8 {
        match self {
            MQualityOfService::AtMostOnce => 0x0,
            MQualityOfService::AtLeastOnce => 0x1,
            MQualityOfService::ExactlyOnce => 0x2,
        }
    }
}

impl TryFrom<u8> for MQualityOfService {
    type Error = MPacketHeaderError;

    fn try_from(lower: u8) -> Result<Self, Self::Error> {
        match lower {
            0b00 => Ok(MQualityOfService::AtMostOnce),
            0b01 => Ok(MQualityOfService::AtLeastOnce),
            0b10 => Ok(MQualityOfService::ExactlyOnce),
            inv_qos => Err(MPacketHeaderError::InvalidQualityOfService(inv_qos)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MQualityOfService;
    use crate::v3::errors::MPacketHeaderError;

    #[test]
    fn levels_roundtrip() {
        for level in 0..=2u8 {
            assert_eq!(MQualityOfService::try_from(level).unwrap().as_u8(), level);
        }
        assert_eq!(
            MQualityOfService::try_from(3),
            Err(MPacketHeaderError::InvalidQualityOfService(3))
        );
    }
}
