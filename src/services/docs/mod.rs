pub mod auth;
pub mod publisher;

pub use auth::{GoogleAuthorizer, StoredToken};
pub use publisher::GoogleDocsPublisher;
