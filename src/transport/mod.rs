//! Broker transport: the MQTT adapter task and the reconnection
//! supervisor. Everything the transport has to say arrives in the chat
//! loop as a [`LinkEvent`]; nothing here touches `App` directly.

pub mod mqtt;
pub mod supervisor;

pub use mqtt::{random_client_id, MqttLink};
pub use supervisor::{ReconnectSupervisor, RetryPolicy};

/// Events emitted by the transport task and the supervisor's timers,
/// consumed by the chat loop in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A scheduled (or initial) connect attempt should start now.
    ConnectDue,
    /// The broker acknowledged the connection.
    Connected,
    /// A connect attempt failed before the link was ever up.
    ConnectFailed { detail: String },
    /// An established link dropped.
    ConnectionLost { detail: String },
    /// A publish arrived on the subscribed topic.
    MessageArrived { payload: String },
}
