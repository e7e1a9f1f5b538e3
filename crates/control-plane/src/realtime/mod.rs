// Real-time delivery over WebSocket
//
// - gateway: session registry, rooms, RealtimePublisher implementation
// - protocol: client/server frame types
// - ws: axum upgrade route and per-connection loop

pub mod gateway;
pub mod protocol;
pub mod ws;

pub use gateway::{project_room, user_room, ConnectionId, RealtimeGateway};
pub use protocol::{ClientMessage, ServerMessage};
pub use ws::{routes, RealtimeState};
