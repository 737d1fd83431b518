//! Configuration for emote extraction
//!
//! Provides types and loading for the `emotecss.toml` configuration file.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
