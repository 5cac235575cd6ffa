//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! MQTT 3.1.1 framing
//!
//! Everything in here is pure: writers push bytes into a [`write::WriteMqttPacket`]
//! and parsers only ever look at the slice they are handed.

use nom::IResult;

pub mod connect_return;
pub mod errors;
pub mod frame;
pub mod header;
pub mod identifier;
pub mod integers;
pub mod packet;
pub mod qos;
pub mod strings;
pub mod write;

/// The result of a parsing operation
pub type MSResult<'a, T> = IResult<&'a [u8], T>;
