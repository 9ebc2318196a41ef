pub mod account_manager;
pub mod auth;
pub mod error;
pub mod message_manager;
pub mod messages;
pub mod routes;

pub use account_manager::AccountManager;
pub use auth::{AppState, AppStateInner};
pub use error::{ApiError, ServiceError};
pub use message_manager::MessageManager;
pub use routes::router;
