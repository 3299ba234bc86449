mod chat;
mod movie;

pub use chat::{ChatMessage, ChatResponse, HistoryItem, HistoryRole, Role};
pub use movie::Movie;
