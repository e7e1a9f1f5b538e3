// Application wiring
// Decision: One explicit EventBus per process, created here and handed to every producer
// Decision: Health and Swagger UI are never prefixed; API and WebSocket routes honor API_PREFIX

use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use taskdeck_core::{EventBus, NotificationEventHelper, NotificationStore, UserDirectory};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::auth::{AuthConfig, AuthState};
use crate::config::ServerConfig;
use crate::email::EmailService;
use crate::openapi::ApiDoc;
use crate::realtime::{self, RealtimeGateway, RealtimeState};
use crate::services::{ActivityNotifier, NotificationListener, NotificationService};
use crate::storage::StorageBackend;

/// Long-lived components shared by routes and producers
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<StorageBackend>,
    pub bus: EventBus,
    pub gateway: Arc<RealtimeGateway>,
    pub email: Arc<EmailService>,
    pub auth: AuthState,
    pub notifications: Arc<NotificationService>,
    pub listener: Arc<NotificationListener>,
}

impl AppContext {
    /// Wire the pipeline: the listener is subscribed to the bus before anything can publish
    pub fn new(
        storage: Arc<StorageBackend>,
        email: EmailService,
        auth_config: AuthConfig,
        default_list_limit: usize,
    ) -> Self {
        let bus = EventBus::new();
        let gateway = Arc::new(RealtimeGateway::new());
        let email = Arc::new(email);
        let store: Arc<dyn NotificationStore> = storage.clone();

        let listener = Arc::new(NotificationListener::new(
            store.clone(),
            gateway.clone(),
            email.clone(),
        ));
        listener.register(&bus);

        let notifications =
            Arc::new(NotificationService::new(store).with_default_limit(default_list_limit));

        Self {
            storage,
            bus,
            gateway,
            email,
            auth: AuthState::new(auth_config),
            notifications,
            listener,
        }
    }

    /// Helper for domain code that emits notification events
    pub fn event_helper(&self) -> NotificationEventHelper {
        NotificationEventHelper::new(self.bus.clone())
    }

    /// Notifier for task, comment and project actions
    pub fn activity_notifier(&self) -> ActivityNotifier {
        let users: Arc<dyn UserDirectory> = self.storage.clone();
        ActivityNotifier::new(self.event_helper(), users)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    auth_mode: String,
    storage: &'static str,
    realtime_sessions: usize,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    auth_mode: String,
    storage: &'static str,
    gateway: Arc<RealtimeGateway>,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.auth_mode.clone(),
        storage: state.storage,
        realtime_sessions: state.gateway.session_count(),
    })
}

/// Build the full HTTP application
pub fn build_app(ctx: &AppContext, config: &ServerConfig) -> Router {
    let notifications_state = api::notifications::NotificationsState {
        service: ctx.notifications.clone(),
        auth: ctx.auth.clone(),
    };
    let events_state = api::events::EventsState {
        bus: ctx.bus.clone(),
        auth: ctx.auth.clone(),
    };
    let realtime_state = RealtimeState::new(ctx.gateway.clone(), ctx.auth.jwt_service.clone());
    let health_state = HealthState {
        auth_mode: format!("{:?}", ctx.auth.config.mode),
        storage: if ctx.storage.is_dev_mode() {
            "memory"
        } else {
            "postgres"
        },
        gateway: ctx.gateway.clone(),
    };

    let api_routes = Router::new()
        .merge(api::notifications::routes(notifications_state))
        .merge(api::events::routes(events_state))
        .merge(realtime::routes(realtime_state));

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix (extracted for testing)
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use taskdeck_core::events;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/v1/test", get(|| async { "ok" }))
    }

    fn context() -> AppContext {
        AppContext::new(
            Arc::new(StorageBackend::in_memory()),
            EmailService::new(Arc::new(crate::email::LogMailer)),
            AuthConfig::default(),
            50,
        )
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_context_subscribes_listener_to_every_event() {
        let ctx = context();
        for name in events::ALL_EVENT_NAMES {
            assert_eq!(ctx.bus.subscriber_count(name), 1);
        }
    }

    #[tokio::test]
    async fn test_health_is_not_prefixed() {
        let ctx = context();
        let config = ServerConfig {
            api_prefix: "/api".to_string(),
            ..ServerConfig::default()
        };
        let app = build_app(&ctx, &config);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["storage"], "memory");
        assert_eq!(json["realtime_sessions"], 0);
    }
}
