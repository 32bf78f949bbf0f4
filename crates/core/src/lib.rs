//! boxcat - concatenates the bounding boxes aligned to each time point of an
//! MMIF annotation graph into one enclosing box.
//!
//! The pipeline runs in four stages:
//! 1. `index` - identifier -> record lookup over the graph
//! 2. `grouping` - boxes grouped by the value of the time point they align to
//! 3. `merge` - each group reduced to its enclosing box
//! 4. `emit` - merged boxes written back as fresh time point, box and
//!    alignment records

pub mod api;
pub mod emit;
pub mod error;
pub mod geometry;
pub mod grouping;
pub mod index;
pub mod merge;
pub mod metadata;
pub mod model;
pub mod params;

pub use api::{ConcatBuilder, ConcatOptions, ConcatSummary, concatenate, concatenate_json};
pub use error::{BoxcatError, Result};
pub use params::{ConcatParams, TimeUnit};
