pub mod config;
pub mod events;
pub mod http;

pub use config::ClientConfig;
pub use http::HttpApi;
