//! Data-driven content for the defense simulation.
//!
//! This crate loads the static data the engine is configured with:
//! - Actor templates (RON): hit points, traits, immunities, special rules,
//!   death hooks
//! - Engine configuration (TOML): sturdy share, resist and vamp ratios,
//!   transcendent range bonus
//!
//! Content is read once at startup and handed to the world by value; it never
//! appears in simulation state by reference.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActorLoader, ConfigLoader, ContentFactory, LoadResult, TemplateCatalog};
