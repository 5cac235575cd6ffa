//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! A small MQTT 3.1.1 client that does no I/O of its own
//!
//! [`MqttClient`] holds the session: it turns `connect`, `subscribe` and `publish` into
//! bytes for the transport and turns bytes from the transport into connection status
//! updates and received messages. [`MqttConnection`] is an optional tokio driver pumping
//! a client over any async stream.

mod codecs;

pub mod client;
pub mod connection;
pub mod error;
pub mod keep_alive;

pub use client::ConnectionStatus;
pub use client::MqttClient;
pub use client::MqttMessage;
pub use connection::MqttConnection;
pub use error::MqttError;
pub use mqtt_wire::v3::qos::MQualityOfService;
