pub mod agency;
pub mod chatbot;
pub mod client;
pub mod reservations;
pub mod search;
pub mod tickets;
pub mod users;

pub use chatbot::{ChatLanguage, ChatbotClient};
pub use client::ApiClient;
