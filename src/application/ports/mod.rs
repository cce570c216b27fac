pub mod auth_gateway;
pub mod change_feed;
pub mod repositories;

pub use auth_gateway::AuthGateway;
pub use change_feed::{ChangeFeed, StoreChange, StoreCollection};
