//! MQTT publish sink.

use crate::sink::{PublishError, PublishSink};
use rumqttc::{AsyncClient, MqttOptions, QoS};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::warn;

/// Publish sink backed by an MQTT broker connection.
pub struct MqttSink {
    client: AsyncClient,
}

impl MqttSink {
    /// Connect to the broker and spawn the connection driver task.
    ///
    /// The driver keeps the event loop polled for acknowledgements and
    /// reconnects; connection errors are logged and retried, never
    /// surfaced through `publish`.
    pub fn connect(broker: &str, port: u16, client_id: &str) -> Self {
        let mut options = MqttOptions::new(client_id, broker, port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut event_loop) = AsyncClient::new(options, 64);
        tokio::spawn(async move {
            loop {
                if let Err(error) = event_loop.poll().await {
                    warn!(%error, "mqtt connection error, retrying");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        });

        MqttSink { client }
    }
}

impl PublishSink for MqttSink {
    fn publish(
        &mut self,
        topic: String,
        payload: String,
        retain: bool,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + '_>> {
        Box::pin(async move {
            self.client
                .publish(topic, QoS::AtMostOnce, retain, payload)
                .await
                .map_err(|e| PublishError::Transport(e.to_string()))
        })
    }
}
