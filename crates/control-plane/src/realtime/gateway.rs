// Real-time gateway
// Decision: One in-process registry per instance; no cross-instance fan-out
// Decision: Rooms are plain strings, `user:<uuid>` and `project:<id>`
//
// The gateway owns the session registry. Each session has an unbounded
// channel drained by its socket writer, so sends never block on I/O.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use taskdeck_core::{Notification, RealtimePublisher, Result};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::ServerMessage;

pub type ConnectionId = Uuid;

pub fn user_room(user_id: Uuid) -> String {
    format!("user:{}", user_id)
}

pub fn project_room(project_id: &str) -> String {
    format!("project:{}", project_id)
}

struct Session {
    user_id: Uuid,
    tx: mpsc::UnboundedSender<ServerMessage>,
    rooms: HashSet<String>,
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<ConnectionId, Session>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

impl Registry {
    fn join(&mut self, connection_id: ConnectionId, room: String) -> bool {
        let Some(session) = self.sessions.get_mut(&connection_id) else {
            return false;
        };
        if !session.rooms.insert(room.clone()) {
            return false;
        }
        self.rooms.entry(room).or_default().insert(connection_id);
        true
    }

    fn leave(&mut self, connection_id: ConnectionId, room: &str) -> bool {
        let Some(session) = self.sessions.get_mut(&connection_id) else {
            return false;
        };
        if !session.rooms.remove(room) {
            return false;
        }
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&connection_id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
        true
    }
}

/// Connection registry and room fan-out
#[derive(Default)]
pub struct RealtimeGateway {
    registry: RwLock<Registry>,
}

impl RealtimeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an authenticated session and join it to its user room.
    /// Returns the connection id and the session's outbound queue.
    pub fn connect(&self, user_id: Uuid) -> (ConnectionId, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = Uuid::now_v7();

        let mut registry = self.registry.write();
        registry.sessions.insert(
            connection_id,
            Session {
                user_id,
                tx,
                rooms: HashSet::new(),
            },
        );
        registry.join(connection_id, user_room(user_id));
        drop(registry);

        tracing::info!(user_id = %user_id, connection_id = %connection_id, "Client connected");
        (connection_id, rx)
    }

    /// Remove a session from every room it joined
    pub fn disconnect(&self, connection_id: ConnectionId) {
        let mut registry = self.registry.write();
        let Some(session) = registry.sessions.get(&connection_id) else {
            return;
        };
        let user_id = session.user_id;
        let rooms: Vec<String> = session.rooms.iter().cloned().collect();
        for room in &rooms {
            registry.leave(connection_id, room);
        }
        registry.sessions.remove(&connection_id);
        drop(registry);

        tracing::info!(user_id = %user_id, connection_id = %connection_id, "Client disconnected");
    }

    /// Join a project room. Returns false if already joined.
    pub fn join_project(&self, connection_id: ConnectionId, project_id: &str) -> bool {
        let joined = self
            .registry
            .write()
            .join(connection_id, project_room(project_id));
        tracing::debug!(
            connection_id = %connection_id,
            project_id = %project_id,
            joined,
            "Join project"
        );
        joined
    }

    /// Leave a project room. Returns false if not a member.
    pub fn leave_project(&self, connection_id: ConnectionId, project_id: &str) -> bool {
        let left = self
            .registry
            .write()
            .leave(connection_id, &project_room(project_id));
        tracing::debug!(
            connection_id = %connection_id,
            project_id = %project_id,
            left,
            "Leave project"
        );
        left
    }

    /// Queue a message for one session
    pub fn send_to_connection(&self, connection_id: ConnectionId, message: ServerMessage) -> bool {
        self.registry
            .read()
            .sessions
            .get(&connection_id)
            .map(|s| s.tx.send(message).is_ok())
            .unwrap_or(false)
    }

    /// Queue a message for every session in a room; returns how many were reached
    pub fn send_to_room(&self, room: &str, message: &ServerMessage) -> usize {
        let registry = self.registry.read();
        let Some(members) = registry.rooms.get(room) else {
            return 0;
        };
        members
            .iter()
            .filter_map(|id| registry.sessions.get(id))
            .filter(|s| s.tx.send(message.clone()).is_ok())
            .count()
    }

    pub fn room_size(&self, room: &str) -> usize {
        self.registry
            .read()
            .rooms
            .get(room)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    pub fn session_count(&self) -> usize {
        self.registry.read().sessions.len()
    }

    /// Rooms a session is in, sorted
    #[cfg(test)]
    pub(crate) fn rooms_of(&self, connection_id: ConnectionId) -> Vec<String> {
        let mut rooms: Vec<String> = self
            .registry
            .read()
            .sessions
            .get(&connection_id)
            .map(|s| s.rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }
}

#[async_trait]
impl RealtimePublisher for RealtimeGateway {
    async fn send_notification_to_user(
        &self,
        user_id: Uuid,
        notification: &Notification,
    ) -> Result<usize> {
        let reached = self.send_to_room(
            &user_room(user_id),
            &ServerMessage::Notification(notification.clone()),
        );
        tracing::debug!(
            user_id = %user_id,
            notification_id = %notification.id,
            sessions = reached,
            "Notification pushed to user"
        );
        Ok(reached)
    }

    async fn send_notification_to_project(
        &self,
        project_id: &str,
        notification: &Notification,
    ) -> Result<usize> {
        let reached = self.send_to_room(
            &project_room(project_id),
            &ServerMessage::ProjectNotification(notification.clone()),
        );
        tracing::debug!(
            project_id = %project_id,
            notification_id = %notification.id,
            sessions = reached,
            "Notification pushed to project"
        );
        Ok(reached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::{CreateNotification, NotificationType};

    fn notification(user_id: Uuid) -> Notification {
        Notification::transient(CreateNotification::new(user_id, NotificationType::TaskAssigned))
    }

    #[tokio::test]
    async fn test_user_push_reaches_every_session_of_user() {
        let gateway = RealtimeGateway::new();
        let user = Uuid::now_v7();
        let (_a, mut rx_a) = gateway.connect(user);
        let (_b, mut rx_b) = gateway.connect(user);
        let (_c, mut rx_other) = gateway.connect(Uuid::now_v7());

        let reached = gateway
            .send_notification_to_user(user, &notification(user))
            .await
            .unwrap();

        assert_eq!(reached, 2);
        assert!(matches!(rx_a.try_recv(), Ok(ServerMessage::Notification(_))));
        assert!(matches!(rx_b.try_recv(), Ok(ServerMessage::Notification(_))));
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_push_to_offline_user_is_noop() {
        let gateway = RealtimeGateway::new();
        let user = Uuid::now_v7();

        let reached = gateway
            .send_notification_to_user(user, &notification(user))
            .await
            .unwrap();

        assert_eq!(reached, 0);
    }

    #[tokio::test]
    async fn test_project_broadcast_reaches_only_members() {
        let gateway = RealtimeGateway::new();
        let (member, mut rx_member) = gateway.connect(Uuid::now_v7());
        let (_outsider, mut rx_outsider) = gateway.connect(Uuid::now_v7());
        gateway.join_project(member, "p-1");

        let reached = gateway
            .send_notification_to_project("p-1", &notification(Uuid::now_v7()))
            .await
            .unwrap();

        assert_eq!(reached, 1);
        assert!(matches!(rx_member.try_recv(), Ok(ServerMessage::ProjectNotification(_))));
        assert!(rx_outsider.try_recv().is_err());
    }

    #[test]
    fn test_join_and_leave_are_idempotent() {
        let gateway = RealtimeGateway::new();
        let (conn, _rx) = gateway.connect(Uuid::now_v7());

        assert!(gateway.join_project(conn, "p-1"));
        assert!(!gateway.join_project(conn, "p-1"));
        assert_eq!(gateway.room_size(&project_room("p-1")), 1);

        assert!(gateway.leave_project(conn, "p-1"));
        assert!(!gateway.leave_project(conn, "p-1"));
        assert_eq!(gateway.room_size(&project_room("p-1")), 0);
    }

    #[test]
    fn test_disconnect_leaves_all_rooms() {
        let gateway = RealtimeGateway::new();
        let user = Uuid::now_v7();
        let (conn, _rx) = gateway.connect(user);
        gateway.join_project(conn, "p-1");
        gateway.join_project(conn, "p-2");
        assert_eq!(
            gateway.rooms_of(conn),
            vec!["project:p-1".to_string(), "project:p-2".to_string(), user_room(user)]
        );

        gateway.disconnect(conn);

        assert_eq!(gateway.session_count(), 0);
        assert_eq!(gateway.room_size(&user_room(user)), 0);
        assert_eq!(gateway.room_size(&project_room("p-1")), 0);
        assert!(gateway.rooms_of(conn).is_empty());
        assert!(!gateway.join_project(conn, "p-3"));
    }

    #[test]
    fn test_closed_receiver_is_not_counted() {
        let gateway = RealtimeGateway::new();
        let user = Uuid::now_v7();
        let (_conn, rx) = gateway.connect(user);
        drop(rx);

        assert_eq!(gateway.send_to_room(&user_room(user), &ServerMessage::Pong), 0);
    }
}
