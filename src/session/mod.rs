pub mod auth;
pub mod store;
pub mod user;

pub use auth::AuthSession;
pub use store::SessionStore;
pub use user::{Plan, UserPatch, UserRecord, USER_KEY};
