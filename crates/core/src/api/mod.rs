//! High-level API module.
//!
//! # Example
//!
//! ```ignore
//! use boxcat_core::api::{concatenate_json, ConcatOptions};
//!
//! let input = std::fs::read_to_string("input.mmif")?;
//! let output = concatenate_json(&input, None)?;
//! ```

pub mod builder;
pub mod high_level;

// Re-export for convenience
pub use builder::ConcatBuilder;
pub use high_level::{
    ConcatOptions, ConcatSummary, concatenate, concatenate_json, concatenate_to_writer,
};
