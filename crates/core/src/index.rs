//! Identifier index over the records an alignment graph can reference.
//!
//! Alignment edges name their endpoints by identifier only. The index maps
//! every qualified identifier to its validated record and is built in two
//! layers:
//!
//! 1. `Layer::Derived` - every record of every view that carries alignments.
//! 2. `Layer::Authoritative` - every bounding box and time point in the
//!    document.
//!
//! An authoritative entry always replaces a derived one with the same
//! identifier, whichever is inserted first. A derived entry never replaces
//! an authoritative one.
//!
//! Building never fails. A record that does not validate is kept as a
//! rejection and only reported when an alignment resolves its identifier.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{BoxcatError, Result};
use crate::model::{AnnotationGraph, AnnotationRef, Record};

/// Precedence of an index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    /// Seen only through a view that holds alignments.
    Derived,
    /// Enumerated directly as a bounding box or time point.
    Authoritative,
}

/// Why an annotation could not become a record.
#[derive(Debug, Clone, PartialEq)]
struct Rejection {
    property: &'static str,
    msg: String,
}

#[derive(Debug, Clone)]
struct Entry {
    record: std::result::Result<Record, Rejection>,
    layer: Layer,
}

/// Identifier -> record lookup.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    entries: FxHashMap<String, Entry>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from both layers of `graph`.
    pub fn build<G: AnnotationGraph + ?Sized>(graph: &G) -> Self {
        let mut index = Self::new();
        for partition in graph.alignment_partitions() {
            index.insert_all(Layer::Derived, partition.records());
        }
        index.insert_all(Layer::Authoritative, graph.bounding_boxes());
        index.insert_all(Layer::Authoritative, graph.time_points());
        debug!(records = index.len(), "built annotation index");
        index
    }

    fn insert_all<'a, I>(&mut self, layer: Layer, refs: I)
    where
        I: IntoIterator<Item = AnnotationRef<'a>>,
    {
        for r in refs {
            let Some(id) = r.qualified_id() else {
                // Nothing can reference it.
                trace!(view = %r.view.id, "skipping annotation without id");
                continue;
            };
            let record = match Record::try_from(r) {
                Ok(record) => Ok(record),
                Err(BoxcatError::InvalidAnnotation { property, msg, .. }) => {
                    trace!(id = %id, property, "indexing invalid annotation");
                    Err(Rejection { property, msg })
                }
                Err(e) => {
                    trace!(id = %id, error = %e, "skipping unreadable annotation");
                    continue;
                }
            };
            self.insert_entry(id, Entry { record, layer });
        }
    }

    /// Inserts a record at `layer`.
    ///
    /// Returns false if an entry of higher precedence already holds the
    /// identifier and the record was dropped.
    pub fn insert(&mut self, layer: Layer, record: Record) -> bool {
        let id = record.id().to_string();
        self.insert_entry(
            id,
            Entry {
                record: Ok(record),
                layer,
            },
        )
    }

    fn insert_entry(&mut self, id: String, entry: Entry) -> bool {
        match self.entries.get(&id) {
            Some(existing) if existing.layer > entry.layer => false,
            _ => {
                self.entries.insert(id, entry);
                true
            }
        }
    }

    /// The valid record held under `id`, if any.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.entries.get(id).and_then(|e| e.record.as_ref().ok())
    }

    /// The layer an identifier was last accepted at.
    pub fn layer(&self, id: &str) -> Option<Layer> {
        self.entries.get(id).map(|e| e.layer)
    }

    /// Like `get`, but an absent identifier is `MissingAnnotation` and an
    /// identifier whose annotation failed validation is `InvalidAnnotation`.
    pub fn resolve(&self, id: &str) -> Result<&Record> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| BoxcatError::MissingAnnotation(id.to_string()))?;
        entry.record.as_ref().map_err(|rejection| {
            BoxcatError::invalid_annotation(id, rejection.property, rejection.msg.clone())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
