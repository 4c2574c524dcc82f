//! Common utilities and shared types for agora.
//!
//! This crate provides foundational components used across all agora crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Slugs**: URL-safe identifiers derived from names via [`derive_slug`]
//!
//! # Example
//!
//! ```no_run
//! use agora_common::{Config, IdGenerator, AppResult, derive_slug};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     let slug = derive_slug("General Discussion");
//!     println!("{id} {slug}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod slug;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use slug::derive_slug;
