//! rumqttc adapter: owns one client + event-loop pair per connection
//! attempt and pumps broker traffic into the chat loop's event channel.

use std::time::Duration;

use rumqttc::{AsyncClient, ClientError, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::transport::LinkEvent;

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const EVENT_CAPACITY: usize = 64;

/// Handle to one connection attempt. Dropping the handle does not stop the
/// pump task; cancel the token passed to [`MqttLink::open`] for that. The
/// task also ends on its own after reporting a failure, so retry policy
/// stays with the supervisor rather than rumqttc's internal reconnect.
pub struct MqttLink {
    client: AsyncClient,
}

impl MqttLink {
    pub fn open(
        host: &str,
        port: u16,
        client_id: &str,
        events: UnboundedSender<LinkEvent>,
        cancel: CancellationToken,
    ) -> Self {
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(KEEP_ALIVE);
        options.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(options, EVENT_CAPACITY);
        let host = host.to_string();

        tokio::spawn(async move {
            let mut connected = false;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(host = %host, "link task cancelled");
                        break;
                    }
                    polled = eventloop.poll() => match polled {
                        Ok(Event::Incoming(Packet::ConnAck(_))) => {
                            debug!(host = %host, "broker acknowledged connection");
                            connected = true;
                            let _ = events.send(LinkEvent::Connected);
                        }
                        Ok(Event::Incoming(Packet::Publish(publish))) => {
                            let payload =
                                String::from_utf8_lossy(&publish.payload).into_owned();
                            let _ = events.send(LinkEvent::MessageArrived { payload });
                        }
                        Ok(_) => {}
                        Err(e) => {
                            let detail = e.to_string();
                            if connected {
                                warn!(host = %host, error = %detail, "connection lost");
                                let _ = events.send(LinkEvent::ConnectionLost { detail });
                            } else {
                                warn!(host = %host, error = %detail, "connect failed");
                                let _ = events.send(LinkEvent::ConnectFailed { detail });
                            }
                            break;
                        }
                    }
                }
            }
        });

        Self { client }
    }

    pub async fn subscribe(&self, topic: &str) -> Result<(), ClientError> {
        self.client.subscribe(topic, QoS::AtMostOnce).await
    }

    pub async fn publish(&self, topic: &str, payload: String) -> Result<(), ClientError> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
    }

    pub async fn disconnect(&self) {
        let _ = self.client.disconnect().await;
    }
}

/// Per-session client identity. The broker disconnects duplicate ids, so
/// a random suffix matters on a shared public topic.
pub fn random_client_id() -> String {
    let mut buf = [0u8; 4];
    let suffix = match getrandom::fill(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf),
        Err(_) => std::process::id(),
    };
    format!("termchat-client-{suffix:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_carry_the_expected_prefix() {
        let id = random_client_id();
        assert!(id.starts_with("termchat-client-"));
        assert_eq!(id.len(), "termchat-client-".len() + 8);
    }

    #[test]
    fn client_ids_are_not_constant() {
        // Two draws colliding is a 1-in-2^32 event; a stuck generator fails here.
        assert_ne!(random_client_id(), random_client_id());
    }
}
