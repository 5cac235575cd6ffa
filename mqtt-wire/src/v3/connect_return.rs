//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use super::errors::MPacketHeaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MConnectReturnCode {
    Accepted,
    ProtocolNotAccepted,
    IdentifierRejected,
    ServerUnavailable,
    BadUsernamePassword,
    NotAuthorized,
}

impl TryFrom<u8> for MConnectReturnCode {
    type Error = MPacketHeaderError;

    fn try_from(return_code: u8) -> Result<Self, Self::Error> {
        Ok(match return_code {
            0 => MConnectReturnCode::Accepted,
            1 => MConnectReturnCode::ProtocolNotAccepted,
            2 => MConnectReturnCode::IdentifierRejected,
            3 => MConnectReturnCode::ServerUnavailable,
            4 => MConnectReturnCode::BadUsernamePassword,
            5 => MConnectReturnCode::NotAuthorized,
            invalid_code => return Err(MPacketHeaderError::InvalidConnectReturnCode(invalid_code)),
        })
    }
}

impl From<MConnectReturnCode> for u8 {
    fn from(code: MConnectReturnCode) -> u8 {
        match code {
            MConnectReturnCode::Accepted => 0,
            MConnectReturnCode::ProtocolNotAccepted => 1,
            MConnectReturnCode::IdentifierRejected => 2,
            MConnectReturnCode::ServerUnavailable => 3,
            MConnectReturnCode::BadUsernamePassword => 4,
            MConnectReturnCode::NotAuthorized => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MConnectReturnCode;
    use crate::v3::errors::MPacketHeaderError;

    #[test]
    fn known_codes_roundtrip() {
        for code in 0..=5u8 {
            let parsed = MConnectReturnCode::try_from(code).unwrap();
            assert_eq!(u8::from(parsed), code);
        }
    }

    #[test]
    fn unknown_codes_are_errors() {
        assert_eq!(
            MConnectReturnCode::try_from(6),
            Err(MPacketHeaderError::InvalidConnectReturnCode(6))
        );
    }
}
