//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use bytes::BytesMut;
use mqtt_wire::v3::qos::MQualityOfService;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::client::ConnectionStatus;
use crate::client::MqttClient;
use crate::client::MqttMessage;
use crate::error::MqttError;

const READ_CHUNK: usize = 1024;
const WRITE_CHUNK: usize = 1024;

/// Drives an [`MqttClient`] over an async byte stream
///
/// This is the event loop the client itself leaves out: outbound bytes are written whenever
/// there are any, inbound bytes are fed as they arrive.
pub struct MqttConnection<S> {
    stream: S,
    client: MqttClient,
    read_buffer: BytesMut,
}

impl<S> MqttConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, client: MqttClient) -> MqttConnection<S> {
        MqttConnection {
            stream,
            client,
            read_buffer: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    pub fn client(&self) -> &MqttClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut MqttClient {
        &mut self.client
    }

    pub fn into_inner(self) -> (S, MqttClient) {
        (self.stream, self.client)
    }

    /// Write out everything the client has queued
    pub async fn flush_outbound(&mut self) -> Result<(), MqttError> {
        while self.client.has_output() {
            let written = self
                .stream
                .write(self.client.peek_outbound(WRITE_CHUNK))
                .await?;
            if written == 0 {
                return Err(MqttError::ConnectionClosed);
            }

            trace!(written, "Sent bytes");
            self.client.commit_outbound(written);
        }

        self.stream.flush().await?;
        Ok(())
    }

    /// Wait for one chunk of input and feed it to the client
    pub async fn read_once(&mut self) -> Result<usize, MqttError> {
        self.read_buffer.clear();
        let read = self.stream.read_buf(&mut self.read_buffer).await?;
        if read == 0 {
            return Err(MqttError::ConnectionClosed);
        }

        trace!(read, "Received bytes");
        self.client.feed(&self.read_buffer);
        Ok(read)
    }

    /// Send the pending CONNECT and wait until the server answered it
    pub async fn wait_for_connack(&mut self) -> Result<(), MqttError> {
        loop {
            self.flush_outbound().await?;

            match self.client.status() {
                ConnectionStatus::Connected => return Ok(()),
                ConnectionStatus::Connecting => {}
                ConnectionStatus::StreamError => return Err(MqttError::StreamError),
                other => return Err(MqttError::ConnectionRejected(other)),
            }

            self.read_once().await?;
        }
    }

    pub async fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: MQualityOfService,
    ) -> Result<(), MqttError> {
        self.client.subscribe(topic_filter, qos)?;
        self.flush_outbound().await
    }

    pub async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        retain: bool,
    ) -> Result<(), MqttError> {
        self.client.publish(topic, payload, retain)?;
        self.flush_outbound().await
    }

    /// Wait for the next message delivered by the server
    pub async fn next_message(&mut self) -> Result<MqttMessage, MqttError> {
        loop {
            if let Some(message) = self.client.get_message() {
                return Ok(message);
            }

            if self.client.status() == ConnectionStatus::StreamError {
                return Err(MqttError::StreamError);
            }

            self.flush_outbound().await?;
            self.read_once().await?;
        }
    }
}
