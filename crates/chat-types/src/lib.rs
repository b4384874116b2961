pub mod message;
pub mod conversation;
pub mod event;
pub mod route;
pub mod library;
pub mod config;
pub mod error;


pub use error::ChatError;
pub type Result<T> = std::result::Result<T, ChatError>;
