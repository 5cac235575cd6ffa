//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use bytes::Bytes;

/// A message delivered by the server through PUBLISH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttMessage {
    topic: String,
    payload: Bytes,
}

impl MqttMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> MqttMessage {
        MqttMessage {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_parts(self) -> (String, Bytes) {
        (self.topic, self.payload)
    }
}
