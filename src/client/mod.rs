//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

pub mod builder;
mod message;
mod state;

use std::collections::VecDeque;

use bytes::Buf;
use bytes::Bytes;
use bytes::BytesMut;
use mqtt_wire::v3::frame::mframe;
use mqtt_wire::v3::frame::MFrame;
use mqtt_wire::v3::frame::MFrameStatus;
use mqtt_wire::v3::header::MPacketKind;
use mqtt_wire::v3::identifier::MPacketIdentifier;
use mqtt_wire::v3::packet::MConnack;
use mqtt_wire::v3::packet::MConnect;
use mqtt_wire::v3::packet::MPublish;
use mqtt_wire::v3::packet::MPublishView;
use mqtt_wire::v3::packet::MSubscribe;
use mqtt_wire::v3::qos::MQualityOfService;
use tracing::debug;
use tracing::trace;
use tracing::warn;

pub use self::builder::MqttClientBuilder;
pub use self::message::MqttMessage;
pub use self::state::ConnectionStatus;
use crate::codecs::encode_packet;
use crate::error::MqttError;
use crate::keep_alive::KeepAlive;

/// Nothing is decoded until this many bytes are buffered
const MIN_FRAME_PROBE: usize = 3;

/// Only one subscription is ever in flight, so its identifier never changes
const SUBSCRIBE_PACKET_IDENTIFIER: MPacketIdentifier = MPacketIdentifier(1);

/// A sans-io MQTT 3.1.1 client session
///
/// The session never touches a socket. Bytes received from the server are handed to
/// [`MqttClient::feed`], bytes that should go to the server are read with
/// [`MqttClient::peek_outbound`] and released with [`MqttClient::commit_outbound`] once
/// they have been written.
///
/// Creating a session queues its CONNECT right away.
#[derive(Debug)]
pub struct MqttClient {
    client_id: String,
    username: Option<String>,
    password: Option<String>,
    keep_alive: KeepAlive,
    status: ConnectionStatus,
    outbound: BytesMut,
    inbound: BytesMut,
    messages: VecDeque<MqttMessage>,
}

/// What a single decoded frame asks of the session
enum FrameEffect {
    Status(ConnectionStatus),
    Message(MqttMessage),
}

impl MqttClient {
    pub fn new(client_id: impl Into<String>) -> Result<MqttClient, MqttError> {
        Self::builder(client_id).build()
    }

    pub fn with_credentials(
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<MqttClient, MqttError> {
        Self::builder(client_id)
            .with_username(username)
            .with_password(password)
            .build()
    }

    pub fn builder(client_id: impl Into<String>) -> MqttClientBuilder {
        MqttClientBuilder::new(client_id.into())
    }

    pub(crate) fn from_parts(
        client_id: String,
        username: Option<String>,
        password: Option<String>,
        keep_alive: KeepAlive,
    ) -> Result<MqttClient, MqttError> {
        let mut client = MqttClient {
            client_id,
            username: username.filter(|u| !u.is_empty()),
            password: password.filter(|p| !p.is_empty()),
            keep_alive,
            status: ConnectionStatus::Connecting,
            outbound: BytesMut::new(),
            inbound: BytesMut::new(),
            messages: VecDeque::new(),
        };

        client.send_connect()?;

        Ok(client)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn keep_alive(&self) -> KeepAlive {
        self.keep_alive
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    fn send_connect(&mut self) -> Result<(), MqttError> {
        let connect = MConnect {
            clean_session: true,
            keep_alive: self.keep_alive.as_u16(),
            client_id: &self.client_id,
            username: self.username.as_deref(),
            password: self.password.as_deref().map(str::as_bytes),
        };

        let packet = encode_packet(connect.binary_size(), |w| connect.write(w))?;
        trace!(len = packet.len(), "Queueing CONNECT");
        self.outbound.unsplit(packet);
        Ok(())
    }

    /// Queue a SUBSCRIBE for `topic_filter`
    ///
    /// The subscription is always requested at QoS 0, whatever `qos` says, since this client
    /// cannot acknowledge anything above it.
    pub fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: MQualityOfService,
    ) -> Result<(), MqttError> {
        if qos != MQualityOfService::AtMostOnce {
            debug!(?qos, "Requesting QoS 0 instead");
        }

        let subscribe = MSubscribe {
            id: SUBSCRIBE_PACKET_IDENTIFIER,
            topic_filter,
            qos: MQualityOfService::AtMostOnce,
        };

        let packet = encode_packet(subscribe.binary_size(), |w| subscribe.write(w))?;
        trace!(topic_filter, len = packet.len(), "Queueing SUBSCRIBE");
        self.outbound.unsplit(packet);
        Ok(())
    }

    /// Queue a QoS 0 PUBLISH
    pub fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), MqttError> {
        let publish = MPublish {
            retain,
            topic_name: topic,
            payload,
        };

        let packet = encode_packet(publish.binary_size(), |w| publish.write(w))?;
        trace!(topic, retain, len = packet.len(), "Queueing PUBLISH");
        self.outbound.unsplit(packet);
        Ok(())
    }

    /// Pop the oldest received message
    pub fn get_message(&mut self) -> Option<MqttMessage> {
        self.messages.pop_front()
    }

    pub fn pending_messages(&self) -> usize {
        self.messages.len()
    }

    pub fn has_output(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// The next bytes to send, at most `max_bytes` of them
    pub fn peek_outbound(&self, max_bytes: usize) -> &[u8] {
        let len = max_bytes.min(self.outbound.len());
        &self.outbound[..len]
    }

    /// Drop `n_bytes` from the front of the outbound buffer after they have been sent
    pub fn commit_outbound(&mut self, n_bytes: usize) {
        let n_bytes = n_bytes.min(self.outbound.len());
        self.outbound.advance(n_bytes);
    }

    /// Amount of received bytes not yet forming a complete frame
    pub fn pending_input(&self) -> usize {
        self.inbound.len()
    }

    /// Hand bytes received from the server to the session
    ///
    /// Every complete frame in the buffer is processed before this returns; a trailing
    /// partial frame stays buffered until more bytes arrive. After a framing error the
    /// stream is considered dead and further input is discarded.
    #[tracing::instrument(skip_all, fields(len = data.len()))]
    pub fn feed(&mut self, data: &[u8]) {
        if self.status == ConnectionStatus::StreamError {
            trace!("Discarding input of a broken stream");
            return;
        }

        self.inbound.extend_from_slice(data);

        while !self.inbound.is_empty() && self.status != ConnectionStatus::StreamError {
            let consumed = self.process();
            if consumed == 0 {
                break;
            }

            self.inbound.advance(consumed);
        }
    }

    /// Decode at most one frame from the front of the inbound buffer
    ///
    /// Returns the amount of bytes the frame occupied, or 0 if no frame could be taken.
    fn process(&mut self) -> usize {
        if self.inbound.len() < MIN_FRAME_PROBE {
            return 0;
        }

        let (effect, consumed) = match mframe(&self.inbound) {
            MFrameStatus::Incomplete => {
                trace!(buffered = self.inbound.len(), "Waiting for more bytes");
                return 0;
            }
            MFrameStatus::Malformed => {
                warn!("Remaining length does not terminate, giving up on the stream");
                self.status = ConnectionStatus::StreamError;
                return 0;
            }
            MFrameStatus::Complete { frame, consumed } => {
                trace!(kind = ?frame.kind(), consumed, "Decoded frame");
                (inspect_frame(self.status, &frame), consumed)
            }
        };

        match effect {
            Some(FrameEffect::Status(status)) => self.set_status(status),
            Some(FrameEffect::Message(message)) => self.messages.push_back(message),
            None => {}
        }

        consumed
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        match status {
            ConnectionStatus::Connected => debug!("Connection accepted"),
            ConnectionStatus::StreamError | ConnectionStatus::UnknownError => {
                warn!(?status, "Connection failed")
            }
            refused => warn!(status = ?refused, "Connection refused"),
        }

        self.status = status;
    }
}

fn inspect_frame(status: ConnectionStatus, frame: &MFrame<'_>) -> Option<FrameEffect> {
    match frame.kind() {
        MPacketKind::Connack => {
            if status == ConnectionStatus::Connected {
                return Some(FrameEffect::Status(ConnectionStatus::StreamError));
            }

            let status = match MConnack::parse(frame.payload()) {
                Some(connack) => connack
                    .connect_return_code()
                    .map(ConnectionStatus::from)
                    .unwrap_or(ConnectionStatus::UnknownError),
                None => ConnectionStatus::UnknownError,
            };

            Some(FrameEffect::Status(status))
        }
        MPacketKind::Publish => {
            let publish = MPublishView::parse(frame.payload())?;

            Some(FrameEffect::Message(MqttMessage::new(
                String::from_utf8_lossy(publish.topic_name),
                Bytes::copy_from_slice(publish.payload),
            )))
        }
        _ => None,
    }
}
