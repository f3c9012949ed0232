// Authkeeper - session re-authentication coordinator
//
// Watches the credentials, reauthentication and session channels of a shared
// keyed state store and reacts by bootstrapping a login credential on first
// sign-in and by triggering token refresh when the backend reports an
// expired session.

pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod store;
pub mod collaborators;
pub mod coordinator;
pub mod utils;

pub use coordinator::ReauthCoordinator;
pub use store::{MemoryStore, StateStore};
