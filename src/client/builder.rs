//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use super::MqttClient;
use crate::error::MqttError;
use crate::keep_alive::KeepAlive;

pub struct MqttClientBuilder {
    client_id: String,
    username: Option<String>,
    password: Option<String>,
    keep_alive: KeepAlive,
}

impl MqttClientBuilder {
    pub(super) fn new(client_id: String) -> Self {
        Self {
            client_id,
            username: None,
            password: None,
            keep_alive: KeepAlive::default(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: KeepAlive) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Create the client, queueing its CONNECT
    pub fn build(self) -> Result<MqttClient, MqttError> {
        MqttClient::from_parts(self.client_id, self.username, self.password, self.keep_alive)
    }
}
