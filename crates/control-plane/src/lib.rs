// Taskdeck Notification Server Library
// Decision: Shared library for binaries (API server, OpenAPI export) and integration tests

// Router and component wiring
pub mod app;
pub use app::{build_app, AppContext};

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Environment configuration
pub mod config;

// Email rendering and transports
pub mod email;

// WebSocket gateway
pub mod realtime;

// Services layer
pub mod services;
pub use services::{NotificationListener, NotificationService};

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;
