//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use mqtt_wire::v3::errors::MPacketWriteError;

use crate::client::ConnectionStatus;

#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    #[error("An IO Error occurred")]
    Io(#[from] std::io::Error),
    #[error("A packet could not be encoded")]
    Write(#[from] MPacketWriteError),
    #[error("The connection was already closed")]
    ConnectionClosed,
    #[error("The server did not accept the connection: {:?}", .0)]
    ConnectionRejected(ConnectionStatus),
    #[error("The inbound byte stream could not be decoded")]
    StreamError,
}
