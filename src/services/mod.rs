pub mod chat;
pub mod filter;
pub mod gateway;
pub mod prompt;

pub use chat::ChatService;
pub use gateway::{HuggingFaceGateway, ModelGateway};
