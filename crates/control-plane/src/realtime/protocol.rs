// WebSocket message protocol
//
// Frames are JSON objects `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use taskdeck_core::Notification;
use uuid::Uuid;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join `project:<id>`
    JoinProject(String),
    /// Leave `project:<id>`
    LeaveProject(String),
    /// Keep-alive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Handshake accepted
    Connected { connection_id: Uuid, user_id: Uuid },
    /// Notification for this user
    Notification(Notification),
    /// Notification broadcast to a joined project
    ProjectNotification(Notification),
    /// Reply to ping
    Pong,
    /// Client frame could not be handled
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"joinProject","data":"p-42"}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinProject("p-42".to_string()));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"leaveProject","data":"p-42"}"#).unwrap();
        assert_eq!(msg, ClientMessage::LeaveProject("p-42".to_string()));

        let msg: ClientMessage = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Ping);

        let unknown = r#"{"event":"subscribe","data":"x"}"#;
        assert!(serde_json::from_str::<ClientMessage>(unknown).is_err());
    }

    #[test]
    fn test_server_message_serialization() {
        let json = serde_json::to_value(ServerMessage::Pong).unwrap();
        assert_eq!(json, serde_json::json!({"event": "pong"}));

        let json = serde_json::to_value(ServerMessage::Error {
            message: "bad frame".to_string(),
        })
        .unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["data"]["message"], "bad frame");
    }
}
