//! Grouping of aligned boxes by time point value.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::Point;
use crate::index::AnnotationIndex;
use crate::model::{Alignment, AnnotationGraph, BoundingBox, Record, TimePoint};

/// Grouping key: the time point value. Two time point records with equal
/// values land in the same group.
pub type TimeKey = OrderedFloat<f64>;

/// Time value -> coordinate lists of every matching box aligned to it, in
/// first-seen order. Groups are never empty.
pub type BoxGroups<'a> = IndexMap<TimeKey, Vec<&'a [Point]>>;

/// Collects every candidate alignment edge of `graph`, in document order.
pub fn alignments<G: AnnotationGraph + ?Sized>(graph: &G) -> Result<Vec<Alignment>> {
    let mut edges = Vec::new();
    for partition in graph.alignment_partitions() {
        for r in partition.edges() {
            if let Record::Alignment(al) = Record::try_from(r)? {
                edges.push(al);
            }
        }
    }
    Ok(edges)
}

/// Resolves both endpoints of an edge into a (time point, box) pair.
///
/// Edges are read in either direction. Returns None when the endpoints are
/// not one time point and one box.
fn resolve_edge<'a>(
    edge: &Alignment,
    index: &'a AnnotationIndex,
) -> Result<Option<(&'a TimePoint, &'a BoundingBox)>> {
    let source = index.resolve(&edge.source)?;
    let target = index.resolve(&edge.target)?;
    Ok(match (source, target) {
        (Record::TimePoint(tp), Record::BoundingBox(bb))
        | (Record::BoundingBox(bb), Record::TimePoint(tp)) => Some((tp, bb)),
        _ => None,
    })
}

/// Groups the coordinates of every box of category `box_type` by the value
/// of the time point it is aligned to.
///
/// Fails with `MissingAnnotation` if an edge names an identifier the index
/// does not hold, or `InvalidAnnotation` if it names one that did not
/// validate.
pub fn group_boxes<'a, 'e, I>(
    edges: I,
    index: &'a AnnotationIndex,
    box_type: &str,
) -> Result<BoxGroups<'a>>
where
    I: IntoIterator<Item = &'e Alignment>,
{
    let mut groups = BoxGroups::new();
    let mut filtered = 0usize;
    let mut unrelated = 0usize;

    for edge in edges {
        let Some((tp, bb)) = resolve_edge(edge, index)? else {
            trace!(edge = %edge.id, "edge does not join a time point and a box");
            unrelated += 1;
            continue;
        };
        if !bb.matches(box_type) {
            trace!(edge = %edge.id, box_type = ?bb.box_type, "box filtered out");
            filtered += 1;
            continue;
        }
        groups
            .entry(OrderedFloat(tp.value))
            .or_default()
            .push(bb.coordinates.as_slice());
    }

    debug!(
        groups = groups.len(),
        filtered, unrelated, "grouped aligned boxes"
    );
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxcatError;
    use crate::index::Layer;

    fn tp(id: &str, value: f64) -> Record {
        Record::TimePoint(TimePoint {
            id: id.to_string(),
            value,
            unit: None,
        })
    }

    fn bb(id: &str, x: f64, box_type: &str) -> Record {
        Record::BoundingBox(BoundingBox {
            id: id.to_string(),
            coordinates: vec![(x, 0.0), (x + 1.0, 0.0), (x, 1.0), (x + 1.0, 1.0)],
            box_type: Some(box_type.to_string()),
        })
    }

    fn edge(source: &str, target: &str) -> Alignment {
        Alignment {
            id: format!("{}->{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    fn index_of(records: Vec<Record>) -> AnnotationIndex {
        let mut index = AnnotationIndex::new();
        for r in records {
            index.insert(Layer::Authoritative, r);
        }
        index
    }

    #[test]
    fn test_equal_values_share_a_group() {
        let index = index_of(vec![
            tp("tp_1", 5.0),
            tp("tp_2", 5.0),
            bb("bb_1", 0.0, "text"),
            bb("bb_2", 3.0, "text"),
        ]);
        let edges = [edge("tp_1", "bb_1"), edge("tp_2", "bb_2")];
        let groups = group_boxes(&edges, &index, "text").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&OrderedFloat(5.0)].len(), 2);
    }

    #[test]
    fn test_reversed_edge_is_accepted() {
        let index = index_of(vec![tp("tp_1", 2.0), bb("bb_1", 0.0, "text")]);
        let edges = [edge("bb_1", "tp_1")];
        let groups = group_boxes(&edges, &index, "text").unwrap();
        assert_eq!(groups[&OrderedFloat(2.0)].len(), 1);
    }

    #[test]
    fn test_filtered_box_creates_no_group() {
        let index = index_of(vec![tp("tp_1", 2.0), bb("bb_1", 0.0, "face")]);
        let edges = [edge("tp_1", "bb_1")];
        let groups = group_boxes(&edges, &index, "text").unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_missing_endpoint_fails() {
        let index = index_of(vec![bb("bb_1", 0.0, "text")]);
        let edges = [edge("tp_9", "bb_1")];
        let err = group_boxes(&edges, &index, "text").unwrap_err();
        assert!(matches!(err, BoxcatError::MissingAnnotation(ref id) if id == "tp_9"));
    }

    #[test]
    fn test_unrelated_edge_is_skipped() {
        let index = index_of(vec![tp("tp_1", 1.0), tp("tp_2", 2.0)]);
        let edges = [edge("tp_1", "tp_2")];
        assert!(group_boxes(&edges, &index, "text").unwrap().is_empty());
    }
}
