//! Forgejo integration node.
//!
//! Maps a `(resource, operation)` selection plus per-item parameters onto
//! Forgejo REST calls, executes them with an authenticated client and
//! normalizes each response into output items.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod node;
pub mod params;
pub mod schema;
pub mod server;
pub mod types;

pub use error::{Error, Result};
