//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use mqtt_wire::v3::connect_return::MConnectReturnCode;

/// Where the client stands in the CONNECT/CONNACK handshake
///
/// The first six variants mirror the CONNACK return codes, the last three are local to the
/// client. Once a session leaves [`ConnectionStatus::Connecting`] it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connected,
    RefusedBadProtocolVersion,
    RefusedIdentifierRejected,
    RefusedServerUnavailable,
    RefusedBadCredentials,
    RefusedNotAuthorized,
    /// The inbound stream could not be framed, or the server broke the protocol
    StreamError,
    /// The CONNACK was malformed or carried an unknown return code
    UnknownError,
    Connecting,
}

impl ConnectionStatus {
    /// Numeric status, CONNACK return codes followed by 253..=255 for the local states
    pub fn code(&self) -> u8 {
        match self {
            ConnectionStatus::Connected => 0,
            ConnectionStatus::RefusedBadProtocolVersion => 1,
            ConnectionStatus::RefusedIdentifierRejected => 2,
            ConnectionStatus::RefusedServerUnavailable => 3,
            ConnectionStatus::RefusedBadCredentials => 4,
            ConnectionStatus::RefusedNotAuthorized => 5,
            ConnectionStatus::StreamError => 253,
            ConnectionStatus::UnknownError => 254,
            ConnectionStatus::Connecting => 255,
        }
    }

    pub fn is_refused(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::RefusedBadProtocolVersion
                | ConnectionStatus::RefusedIdentifierRejected
                | ConnectionStatus::RefusedServerUnavailable
                | ConnectionStatus::RefusedBadCredentials
                | ConnectionStatus::RefusedNotAuthorized
        )
    }
}

impl From<MConnectReturnCode> for ConnectionStatus {
    fn from(code: MConnectReturnCode) -> Self {
        match code {
            MConnectReturnCode::Accepted => ConnectionStatus::Connected,
            MConnectReturnCode::ProtocolNotAccepted => ConnectionStatus::RefusedBadProtocolVersion,
            MConnectReturnCode::IdentifierRejected => ConnectionStatus::RefusedIdentifierRejected,
            MConnectReturnCode::ServerUnavailable => ConnectionStatus::RefusedServerUnavailable,
            MConnectReturnCode::BadUsernamePassword => ConnectionStatus::RefusedBadCredentials,
            MConnectReturnCode::NotAuthorized => ConnectionStatus::RefusedNotAuthorized,
        }
    }
}
