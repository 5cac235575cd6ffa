//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MPacketHeaderError {
    #[error("An invalid Quality of Service (Qos) was supplied: {}", .0)]
    InvalidQualityOfService(u8),
    #[error("Received an invalid connect return code in CONNACK: {}", .0)]
    InvalidConnectReturnCode(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MPacketWriteError {
    #[error("A string or binary field of {} bytes does not fit a 16 bit length prefix", .0)]
    PayloadTooLarge(usize),
    #[error("A remaining length of {} bytes cannot be encoded", .0)]
    InvalidSize(usize),
}
