//! Server-side sessions.
//!
//! A session is an immutable [`SessionRecord`](crate::models::session::SessionRecord)
//! kept in a [`store::SessionStore`] under an opaque token. The client only ever
//! holds the token, in the `session_id` cookie. [`SessionManager`] is the
//! single place that touches both the store and the cookie.

mod manager;
#[cfg(test)]
pub mod memory_store;
mod redis_store;
mod store;

pub use manager::SessionManager;
pub use redis_store::RedisSessionStore;
