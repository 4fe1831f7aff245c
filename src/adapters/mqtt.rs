//! MQTT command bus.
//!
//! The client's event task only enqueues; the frame loop drains:
//!
//! ```text
//! ┌──────────────┐ InboundMessage ┌──────────────┐
//! │  mqtt-rx     │──────────────▶│  frame loop  │
//! │ (event pump) │   INBOUND (8)  │ check_msg()  │
//! └──────────────┘                └──────────────┘
//! ```
//!
//! A full channel or an oversized topic/payload drops the message with a
//! warning. Nothing is ever retried.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::InboundMessage;
use crate::app::ports::CommandSource;

/// Channel depth for inbound notifications.
pub const INBOUND_DEPTH: usize = 8;

pub type InboundChannel = Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_DEPTH>;

/// Inbound notification channel: MQTT event task → frame loop.
pub static INBOUND: InboundChannel = Channel::new();

/// Why a notification did not make it into the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// Topic or payload exceeds the fixed buffers.
    TooLarge,
    /// The frame loop has not drained the backlog.
    Full,
}

/// Copy a received notification into `channel` without blocking.
pub fn enqueue(channel: &InboundChannel, topic: &str, payload: &[u8]) -> Result<(), EnqueueError> {
    let Some(msg) = InboundMessage::new(topic, payload) else {
        warn!(
            "MQTT: dropping oversized message on '{}' ({} bytes)",
            topic,
            payload.len()
        );
        return Err(EnqueueError::TooLarge);
    };
    channel.try_send(msg).map_err(|_| {
        warn!("MQTT: inbound queue full, dropping message on '{}'", topic);
        EnqueueError::Full
    })
}

// ───────────────────────────────────────────────────────────────
// Bus
// ───────────────────────────────────────────────────────────────

/// [`CommandSource`] backed by an inbound channel.
pub struct MqttBus<'a> {
    channel: &'a InboundChannel,
    #[cfg(target_os = "espidf")]
    _client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
}

impl<'a> MqttBus<'a> {
    /// Bus over `channel` with no client attached (messages are injected
    /// with [`enqueue`]).
    pub fn new(channel: &'a InboundChannel) -> Self {
        Self {
            channel,
            #[cfg(target_os = "espidf")]
            _client: None,
        }
    }

    /// Messages waiting for the frame loop.
    pub fn pending(&self) -> usize {
        self.channel.len()
    }
}

impl CommandSource for MqttBus<'_> {
    fn check_msg(&mut self) -> Option<InboundMessage> {
        self.channel.try_receive().ok()
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod client {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
    use log::{info, warn};

    use super::{InboundChannel, MqttBus, enqueue};
    use crate::config::SystemConfig;
    use crate::drivers::task_pin::{self, Core};
    use crate::error::CommsError;

    const PUMP_PRIORITY: u8 = 5;
    const PUMP_STACK_KB: usize = 6;
    const CONNECT_POLL_MS: u32 = 100;

    impl MqttBus<'static> {
        /// Create the client, start the event pump, wait for the broker
        /// session and subscribe to the command topic (QoS 0).
        pub fn connect(
            config: &SystemConfig,
            channel: &'static InboundChannel,
        ) -> Result<Self, CommsError> {
            let url = config.broker_url();
            let conf = MqttClientConfiguration {
                client_id: Some(config.client_id.as_str()),
                ..Default::default()
            };
            let (mut client, mut connection) = EspMqttClient::new(url.as_str(), &conf)
                .map_err(|e| CommsError::MqttClient(e.code()))?;
            info!("MQTT: client '{}' -> {}", config.client_id, url);

            let connected = Arc::new(AtomicBool::new(false));
            let flag = connected.clone();
            task_pin::spawn_on_core(Core::Pro, PUMP_PRIORITY, PUMP_STACK_KB, "mqtt-rx\0", move || {
                while let Ok(event) = connection.next() {
                    match event.payload() {
                        EventPayload::Connected(_) => {
                            info!("MQTT: connected");
                            flag.store(true, Ordering::Release);
                        }
                        EventPayload::Disconnected => {
                            warn!("MQTT: disconnected");
                            flag.store(false, Ordering::Release);
                        }
                        EventPayload::Received { topic, data, .. } => {
                            let _ = enqueue(channel, topic.unwrap_or(""), data);
                        }
                        _ => {}
                    }
                }
                info!("MQTT: connection closed");
            })
            .map_err(|_| CommsError::MqttClient(-1))?;

            while !connected.load(Ordering::Acquire) {
                FreeRtos::delay_ms(CONNECT_POLL_MS);
            }

            client
                .subscribe(config.command_topic.as_str(), QoS::AtMostOnce)
                .map_err(|e| CommsError::MqttSubscribe(e.code()))?;
            info!("MQTT: subscribed to '{}'", config.command_topic);

            Ok(Self {
                channel,
                _client: Some(client),
            })
        }
    }
}
