pub mod app_config;
pub mod chat;
pub mod guards;
pub mod kv;
pub mod session;

pub use app_config::AppConfig;
pub use chat::{ChatConversation, ChatHistory, ChatMessage};
pub use guards::{agency_auth_redirect, client_route_guard, Redirect};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use session::SessionStore;
