//! Unit tests for the in-memory graph primitives.

use std::collections::{BTreeMap, BTreeSet};

use rstest::rstest;

use super::*;

fn marker_vertices(ids: &[VertexId]) -> BTreeMap<VertexId, bool> {
    ids.iter().map(|&id| (id, true)).collect()
}

#[test]
fn from_parts_rejects_dangling_edges() {
    let err = PropertyGraph::from_parts(marker_vertices(&[1, 2]), vec![Edge::new(1, 7)])
        .expect_err("edge to missing vertex must be rejected");
    assert_eq!(
        err,
        GraphError::DanglingEdge {
            source_vertex: 1,
            target_vertex: 7,
            missing: 7,
        }
    );
    assert_eq!(err.code().as_str(), "DANGLING_EDGE");
}

#[test]
fn from_edge_list_derives_vertices_and_keeps_edge_order() {
    let graph = PropertyGraph::from_edge_list(&[(3, 1), (1, 2), (3, 2)]);
    assert_eq!(graph.vertex_ids(), vec![1, 2, 3]);
    assert_eq!(graph.max_vertex_id(), Some(3));
    assert_eq!(graph.out_neighbors(3), vec![1, 2]);
}

#[test]
fn join_vertices_is_total_and_ignores_unknown_update_keys() {
    let graph = PropertyGraph::from_edge_list(&[(1, 2)]).map_vertices(|_, _| 0_u32);
    let updates: BTreeMap<VertexId, u32> = [(2, 5), (99, 7)].into_iter().collect();
    let joined = graph.join_vertices(&updates, |_, old, update| {
        old + update.copied().unwrap_or(1)
    });
    assert_eq!(joined.vertex_attr(1), Some(&1));
    assert_eq!(joined.vertex_attr(2), Some(&5));
    assert_eq!(joined.vertex_attr(99), None);
}

#[rstest]
#[case::out(EdgeDirection::Out, vec![(2, 1_u32)])]
#[case::incoming(EdgeDirection::In, vec![(3, 1_u32)])]
fn map_reduce_respects_direction_and_active_set(
    #[case] direction: EdgeDirection,
    #[case] expected: Vec<(VertexId, u32)>,
) {
    // Edges 1 -> 2 and 3 -> 4; only vertex 1's side of the active set fires
    // a message for Out, only vertex 4's side for In.
    let graph = PropertyGraph::from_edge_list(&[(1, 2), (3, 4)]);
    let active: BTreeSet<VertexId> = [1, 4].into_iter().collect();
    let messages = graph
        .map_reduce_triplets(
            direction,
            &active,
            |triplet| {
                let recipient = match direction {
                    EdgeDirection::Out => triplet.target,
                    EdgeDirection::In => triplet.source,
                };
                vec![(recipient, 1_u32)]
            },
            |left, right| left + right,
        )
        .expect("endpoints resolve");
    let flattened: Vec<(VertexId, u32)> = messages.into_iter().collect();
    assert_eq!(flattened, expected);
}

#[test]
fn map_reduce_combines_colliding_messages() {
    // Two active sources feed the shared target 9.
    let graph = PropertyGraph::from_edge_list(&[(1, 9), (2, 9)]);
    let active: BTreeSet<VertexId> = [1, 2].into_iter().collect();
    let messages = graph
        .map_reduce_triplets(
            EdgeDirection::Out,
            &active,
            |triplet| vec![(triplet.target, 1_u32)],
            |left, right| left + right,
        )
        .expect("endpoints resolve");
    assert_eq!(messages.get(&9), Some(&2));
}

#[test]
fn aggregate_by_vertex_folds_repeated_keys() {
    let pairs = vec![(4_u64, 1_u32), (4, 2), (4, 4), (6, 10)];
    let merged = aggregate_by_vertex(pairs, |left, right| left + right);
    assert_eq!(merged.get(&4), Some(&7));
    assert_eq!(merged.get(&6), Some(&10));
    assert_eq!(merged.len(), 2);
}

#[test]
fn map_vertices_rewrites_attributes_in_place() {
    let graph = PropertyGraph::from_edge_list(&[(1, 2)]).map_vertices(|id, _| id * 10);
    assert_eq!(graph.vertex_attr(1), Some(&10));
    assert_eq!(graph.vertex_attr(2), Some(&20));
    assert_eq!(graph.edge_count(), 1);
}
