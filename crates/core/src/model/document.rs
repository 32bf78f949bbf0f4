//! MMIF document, view and annotation containers.
//!
//! These are thin serde mirrors of the JSON layout. Unknown keys are kept so
//! that a document survives a read/annotate/write cycle intact.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::vocabulary::{AnnotationType, MMIF_VERSION};
use crate::error::Result;

/// Separator between a view id and a local annotation id.
pub const ID_SEPARATOR: char = ':';

/// Qualifies a local identifier with its view id, leaving already-qualified
/// identifiers alone.
pub fn qualify_id(view_id: &str, id: &str) -> String {
    if id.contains(ID_SEPARATOR) {
        id.to_string()
    } else {
        format!("{}{}{}", view_id, ID_SEPARATOR, id)
    }
}

/// A whole MMIF document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Source media documents; carried through untouched.
    #[serde(default)]
    pub documents: Vec<Value>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Document {
    /// Creates an empty document stamped with the current MMIF version.
    pub fn new() -> Self {
        let mut metadata = Map::new();
        metadata.insert("mmif".to_string(), Value::String(MMIF_VERSION.to_string()));
        Self {
            metadata,
            documents: Vec::new(),
            views: Vec::new(),
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let s = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(s)
    }

    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Returns `v_<n>` for the smallest `n` not already taken.
    pub fn next_view_id(&self) -> String {
        (0..)
            .map(|n| format!("v_{}", n))
            .find(|candidate| self.view(candidate).is_none())
            .unwrap_or_default()
    }

    /// Appends a finished view.
    pub fn push_view(&mut self, view: View) {
        self.views.push(view);
    }
}

/// Metadata block of a view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Type URI -> properties shared by every annotation of that type.
    #[serde(default)]
    pub contains: IndexMap<String, Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewMetadata {
    /// View-wide properties declared for `ty`, whatever version its URI names.
    pub fn contains_properties(&self, ty: &AnnotationType) -> Option<&Map<String, Value>> {
        self.contains
            .iter()
            .find(|(uri, _)| AnnotationType::from_uri(uri) == *ty)
            .map(|(_, props)| props)
    }

    pub fn declares(&self, ty: &AnnotationType) -> bool {
        self.contains_properties(ty).is_some()
    }
}

/// A single annotation: a type URI and a property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "@type")]
    pub at_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Annotation {
    pub fn new(at_type: &AnnotationType, id: &str) -> Self {
        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::String(id.to_string()));
        Self {
            at_type: at_type.uri(),
            properties,
        }
    }

    /// Local identifier, if the annotation carries one.
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(Value::as_str)
    }

    pub fn annotation_type(&self) -> AnnotationType {
        AnnotationType::from_uri(&self.at_type)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A view: one app's contribution to the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub metadata: ViewMetadata,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    ids: IdMinter,
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.metadata == other.metadata
            && self.annotations == other.annotations
    }
}

/// Generated identifier state of a view.
///
/// `taken` holds the local ids of `annotations[..scanned]`, so each
/// annotation is looked at once no matter how many ids are minted.
#[derive(Debug, Clone, Default)]
struct IdMinter {
    counters: FxHashMap<&'static str, usize>,
    taken: FxHashSet<String>,
    scanned: usize,
}

impl View {
    pub fn new(id: impl Into<String>, metadata: ViewMetadata) -> Self {
        Self {
            id: id.into(),
            metadata,
            annotations: Vec::new(),
            ids: IdMinter::default(),
        }
    }

    /// Looks up an annotation by local or qualified identifier.
    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        let local = id
            .strip_prefix(self.id.as_str())
            .and_then(|rest| rest.strip_prefix(ID_SEPARATOR))
            .unwrap_or(id);
        self.annotations.iter().find(|a| a.id() == Some(local))
    }

    pub fn annotations_of(&self, ty: AnnotationType) -> impl Iterator<Item = AnnotationRef<'_>> {
        self.annotations
            .iter()
            .filter(move |a| a.annotation_type() == ty)
            .map(move |annotation| AnnotationRef {
                view: self,
                annotation,
            })
    }

    fn mint_id(&mut self, ty: &AnnotationType) -> String {
        let ids = &mut self.ids;
        if ids.scanned > self.annotations.len() {
            // Annotations were removed behind our back.
            ids.taken.clear();
            ids.scanned = 0;
        }
        for annotation in &self.annotations[ids.scanned..] {
            if let Some(id) = annotation.id() {
                let local = id
                    .strip_prefix(self.id.as_str())
                    .and_then(|rest| rest.strip_prefix(ID_SEPARATOR))
                    .unwrap_or(id);
                ids.taken.insert(local.to_string());
            }
        }
        ids.scanned = self.annotations.len();

        let prefix = ty.id_prefix();
        let counter = ids.counters.entry(prefix).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}_{}", prefix, counter);
            if ids.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// An annotation together with the view that holds it.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationRef<'a> {
    pub view: &'a View,
    pub annotation: &'a Annotation,
}

impl<'a> AnnotationRef<'a> {
    pub fn annotation_type(&self) -> AnnotationType {
        self.annotation.annotation_type()
    }

    /// Identifier qualified with the view id, or None if the annotation has
    /// no `id` property.
    pub fn qualified_id(&self) -> Option<String> {
        self.annotation.id().map(|id| qualify_id(&self.view.id, id))
    }

    /// Reads a property, falling back to the view-wide default declared for
    /// this annotation's type.
    pub fn property(&self, name: &str) -> Option<&'a Value> {
        self.annotation.property(name).or_else(|| {
            self.view
                .metadata
                .contains_properties(&self.annotation_type())
                .and_then(|props| props.get(name))
        })
    }
}

/// All candidate alignment edges of one view, plus the view itself so its
/// other records can be indexed alongside.
#[derive(Debug, Clone)]
pub struct AlignmentPartition<'a> {
    pub view: &'a View,
    pub edges: Vec<&'a Annotation>,
}

impl<'a> AlignmentPartition<'a> {
    pub fn edges(&self) -> impl Iterator<Item = AnnotationRef<'a>> + '_ {
        let view = self.view;
        self.edges
            .iter()
            .map(move |&annotation| AnnotationRef { view, annotation })
    }

    /// Every record of the partition's view.
    pub fn records(&self) -> impl Iterator<Item = AnnotationRef<'a>> + '_ {
        let view = self.view;
        view.annotations
            .iter()
            .map(move |annotation| AnnotationRef { view, annotation })
    }
}

/// Read access to an annotation graph.
pub trait AnnotationGraph {
    /// Alignment edges grouped by the view that holds them.
    fn alignment_partitions(&self) -> Vec<AlignmentPartition<'_>>;

    fn bounding_boxes(&self) -> Vec<AnnotationRef<'_>>;

    fn time_points(&self) -> Vec<AnnotationRef<'_>>;
}

/// Write access to an output container.
pub trait AnnotationSink {
    /// Creates a record of type `at_type` with `properties` and returns its
    /// generated local identifier.
    fn add_annotation(&mut self, at_type: AnnotationType, properties: Map<String, Value>)
    -> String;
}

impl AnnotationSink for View {
    fn add_annotation(
        &mut self,
        at_type: AnnotationType,
        properties: Map<String, Value>,
    ) -> String {
        let id = self.mint_id(&at_type);
        let mut annotation = Annotation::new(&at_type, &id);
        annotation.properties.extend(properties);
        // The minted id is authoritative even if the caller passed one.
        annotation
            .properties
            .insert("id".to_string(), Value::String(id.clone()));
        self.annotations.push(annotation);
        id
    }
}

/// Whether an alignment view admits TimePoint/BoundingBox edges, judging by
/// the source/target types it declares.
fn admits_box_alignments(view: &View) -> bool {
    let Some(props) = view.metadata.contains_properties(&AnnotationType::Alignment) else {
        return true;
    };
    ["sourceType", "targetType"].iter().all(|key| {
        props
            .get(*key)
            .and_then(Value::as_str)
            .map(AnnotationType::from_uri)
            .is_none_or(|ty| {
                matches!(ty, AnnotationType::TimePoint | AnnotationType::BoundingBox)
            })
    })
}

impl AnnotationGraph for Document {
    fn alignment_partitions(&self) -> Vec<AlignmentPartition<'_>> {
        self.views
            .iter()
            .filter(|view| admits_box_alignments(view))
            .filter_map(|view| {
                let edges: Vec<&Annotation> = view
                    .annotations
                    .iter()
                    .filter(|a| a.annotation_type() == AnnotationType::Alignment)
                    .collect();
                (!edges.is_empty()).then_some(AlignmentPartition { view, edges })
            })
            .collect()
    }

    fn bounding_boxes(&self) -> Vec<AnnotationRef<'_>> {
        self.views
            .iter()
            .flat_map(|view| view.annotations_of(AnnotationType::BoundingBox))
            .collect()
    }

    fn time_points(&self) -> Vec<AnnotationRef<'_>> {
        self.views
            .iter()
            .flat_map(|view| view.annotations_of(AnnotationType::TimePoint))
            .collect()
    }
}
