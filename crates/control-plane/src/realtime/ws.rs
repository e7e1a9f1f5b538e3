// WebSocket endpoint for real-time notifications
// Decision: Authenticate before upgrading; a bad handshake never becomes a session
// Decision: Token from `?token=` or `Authorization: Bearer`

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::gateway::{ConnectionId, RealtimeGateway};
use super::protocol::{ClientMessage, ServerMessage};
use crate::api::common::ErrorResponse;
use crate::auth::{bearer_token, AuthError, JwtService};

/// State for the WebSocket route
#[derive(Clone)]
pub struct RealtimeState {
    pub gateway: Arc<RealtimeGateway>,
    pub jwt_service: Arc<JwtService>,
}

impl RealtimeState {
    pub fn new(gateway: Arc<RealtimeGateway>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            gateway,
            jwt_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HandshakeQuery {
    pub token: Option<String>,
}

/// Create realtime routes
pub fn routes(state: RealtimeState) -> Router {
    Router::new()
        .route("/v1/realtime/notifications", get(connect))
        .with_state(state)
}

/// Resolve the user id for a handshake
pub fn authenticate_handshake(
    jwt_service: &JwtService,
    query_token: Option<&str>,
    headers: &HeaderMap,
) -> Result<Uuid, AuthError> {
    let token = query_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| bearer_token(headers))
        .ok_or_else(|| AuthError::unauthorized("Authentication required"))?;

    jwt_service
        .authenticate(token)
        .map(|(user_id, _)| user_id)
        .map_err(|e| {
            tracing::debug!(error = %e, "WebSocket handshake rejected");
            AuthError::unauthorized("Invalid or expired token")
        })
}

/// GET /v1/realtime/notifications - WebSocket upgrade
async fn connect(
    State(state): State<RealtimeState>,
    Query(query): Query<HandshakeQuery>,
    headers: HeaderMap,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    let token = query.token.as_deref();
    let user_id = match authenticate_handshake(&state.jwt_service, token, &headers) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let Some(ws) = ws else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "WebSocket upgrade required".to_string(),
            }),
        )
            .into_response();
    };

    let gateway = state.gateway.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, gateway, user_id))
}

/// Connection lifecycle: register, pump frames both ways, unregister
async fn handle_socket(socket: WebSocket, gateway: Arc<RealtimeGateway>, user_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();
    let (connection_id, mut outbound) = gateway.connect(user_id);

    gateway.send_to_connection(
        connection_id,
        ServerMessage::Connected {
            connection_id,
            user_id,
        },
    );

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_client_text(&gateway, connection_id, &text) {
                            gateway.send_to_connection(connection_id, reply);
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        gateway.send_to_connection(
                            connection_id,
                            ServerMessage::Error {
                                message: "Binary frames are not supported".to_string(),
                            },
                        );
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ping/pong frames are answered by the socket itself
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            error = %e,
                            "WebSocket receive error"
                        );
                        break;
                    }
                }
            }
            queued = outbound.recv() => {
                let Some(message) = queued else { break };
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize server message");
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(json)).await {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "WebSocket send failed"
                    );
                    break;
                }
            }
        }
    }

    gateway.disconnect(connection_id);
}

/// Apply one client text frame; returns the direct reply, if any
pub fn handle_client_text(
    gateway: &RealtimeGateway,
    connection_id: ConnectionId,
    text: &str,
) -> Option<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::JoinProject(project_id)) => {
            gateway.join_project(connection_id, &project_id);
            None
        }
        Ok(ClientMessage::LeaveProject(project_id)) => {
            gateway.leave_project(connection_id, &project_id);
            None
        }
        Ok(ClientMessage::Ping) => Some(ServerMessage::Pong),
        Err(e) => Some(ServerMessage::Error {
            message: format!("Invalid message: {}", e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::realtime::gateway::project_room;
    use axum::http::header;

    fn jwt() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "ws-secret".to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_handshake_requires_token() {
        let err = authenticate_handshake(&jwt(), None, &HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let err = authenticate_handshake(&jwt(), Some("  "), &HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_handshake_rejects_invalid_token() {
        let err = authenticate_handshake(&jwt(), Some("garbage"), &HeaderMap::new()).unwrap_err();
        assert_eq!(err.error, "Invalid or expired token");
    }

    #[test]
    fn test_handshake_accepts_query_or_bearer() {
        let service = jwt();
        let user = Uuid::now_v7();
        let token = service
            .generate_access_token(user, "jo@example.com", "Jo", &[])
            .unwrap();

        assert_eq!(
            authenticate_handshake(&service, Some(&token), &HeaderMap::new()).unwrap(),
            user
        );

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        assert_eq!(authenticate_handshake(&service, None, &headers).unwrap(), user);
    }

    #[test]
    fn test_client_frames() {
        let gateway = RealtimeGateway::new();
        let (conn, _rx) = gateway.connect(Uuid::now_v7());

        let join = r#"{"event":"joinProject","data":"p-9"}"#;
        assert!(handle_client_text(&gateway, conn, join).is_none());
        assert_eq!(gateway.room_size(&project_room("p-9")), 1);

        let leave = r#"{"event":"leaveProject","data":"p-9"}"#;
        assert!(handle_client_text(&gateway, conn, leave).is_none());
        assert_eq!(gateway.room_size(&project_room("p-9")), 0);

        assert_eq!(
            handle_client_text(&gateway, conn, r#"{"event":"ping"}"#),
            Some(ServerMessage::Pong)
        );
        assert!(matches!(
            handle_client_text(&gateway, conn, "not json"),
            Some(ServerMessage::Error { .. })
        ));
    }
}
