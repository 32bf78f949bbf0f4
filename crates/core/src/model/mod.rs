//! Annotation graph model.
//!
//! - `document` - serde mirrors of MMIF documents, views and annotations,
//!   plus the `AnnotationGraph` and `AnnotationSink` seams
//! - `record` - typed records validated at construction
//! - `vocabulary` - annotation type URIs

pub mod document;
pub mod record;
pub mod vocabulary;

pub use document::{
    AlignmentPartition, Annotation, AnnotationGraph, AnnotationRef, AnnotationSink, Document,
    View, ViewMetadata, qualify_id,
};
pub use record::{Alignment, BoundingBox, Record, TimePoint};
pub use vocabulary::AnnotationType;
