//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod single_flight;

pub use handlers::access::{WorkspaceAccess, WorkspaceSelector};
pub use single_flight::KeyedLock;
