//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use std::process::exit;

use asyncmqtt::MQualityOfService;
use asyncmqtt::MqttClient;
use asyncmqtt::MqttConnection;
use asyncmqtt::MqttError;
use clap::Parser;
use tokio::net::TcpStream;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(long, value_parser)]
    addr: String,
    #[clap(long, value_parser)]
    client_id: Option<String>,
    #[clap(long, value_parser)]
    username: Option<String>,
    #[clap(long, value_parser)]
    password: Option<String>,

    /// Publish a single message to this topic instead of subscribing to `/#`
    #[clap(long, value_parser, requires = "message")]
    topic: Option<String>,
    #[clap(long, value_parser, requires = "topic")]
    message: Option<String>,
    #[clap(long)]
    retain: bool,
}

fn print_error_and_quit(e: MqttError) -> ! {
    eprintln!("{}", e);
    exit(1);
}

#[tokio::main]
async fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let filter_layer = tracing_subscriber::EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        print_error_and_quit(e);
    }
}

async fn run(args: Args) -> Result<(), MqttError> {
    let client_id = args
        .client_id
        .unwrap_or_else(|| format!("cliclient_{}", std::process::id()));

    let mut builder = MqttClient::builder(client_id);
    if let Some(username) = args.username {
        builder = builder.with_username(username);
    }
    if let Some(password) = args.password {
        builder = builder.with_password(password);
    }
    let client = builder.build()?;

    let stream = TcpStream::connect(&args.addr).await?;
    let mut connection = MqttConnection::new(stream, client);

    connection.wait_for_connack().await?;
    tracing::info!(addr = %args.addr, "Connected");

    if let (Some(topic), Some(message)) = (args.topic, args.message) {
        return connection
            .publish(&topic, message.as_bytes(), args.retain)
            .await;
    }

    connection.subscribe("/#", MQualityOfService::AtMostOnce).await?;

    loop {
        let message = connection.next_message().await?;
        println!(
            "{} {}",
            message.topic(),
            String::from_utf8_lossy(message.payload())
        );
    }
}
