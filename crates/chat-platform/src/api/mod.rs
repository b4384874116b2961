pub mod event_source;
pub mod http;

pub use http::HttpBackend;
