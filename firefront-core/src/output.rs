//! Adjacency-list serialization of evolved graphs.
//!
//! Produces one text record per vertex in ascending id order:
//! `"<vertexId> <outNeighbor1> <outNeighbor2> ..."`, space separated, with
//! neighbours in the order the graph's adjacency listing returns them
//! (edge-list order).

use std::collections::BTreeMap;
use std::io;

use crate::graph::{PropertyGraph, VertexId};

/// Renders the adjacency records of `graph`, one string per vertex.
///
/// # Examples
/// ```
/// use firefront_core::{PropertyGraph, adjacency_records};
///
/// let graph = PropertyGraph::from_edge_list(&[(1, 2), (1, 3)]);
/// let records = adjacency_records(&graph);
/// assert_eq!(records.first().map(String::as_str), Some("1 2 3"));
/// ```
#[must_use]
pub fn adjacency_records<V>(graph: &PropertyGraph<V>) -> Vec<String> {
    let mut adjacency: BTreeMap<VertexId, Vec<VertexId>> = graph
        .vertex_ids()
        .into_iter()
        .map(|vertex| (vertex, Vec::new()))
        .collect();
    for edge in graph.edges() {
        if let Some(neighbors) = adjacency.get_mut(&edge.source()) {
            neighbors.push(edge.target());
        }
    }
    adjacency
        .into_iter()
        .map(|(vertex, neighbors)| {
            let mut record = vertex.to_string();
            for neighbor in neighbors {
                record.push(' ');
                record.push_str(&neighbor.to_string());
            }
            record
        })
        .collect()
}

/// Writes the adjacency records of `graph` to `writer`, one per line.
///
/// # Errors
/// Returns any [`io::Error`] surfaced by the writer.
pub fn write_adjacency<V>(graph: &PropertyGraph<V>, mut writer: impl io::Write) -> io::Result<()> {
    for record in adjacency_records(graph) {
        writeln!(writer, "{record}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_list_neighbors_in_edge_order() {
        let graph = PropertyGraph::from_edge_list(&[(1, 3), (1, 2), (2, 3)]);
        let records = adjacency_records(&graph);
        assert_eq!(records, vec!["1 3 2", "2 3", "3"]);
    }

    #[test]
    fn isolated_vertices_serialize_as_bare_ids() {
        let graph = PropertyGraph::from_edge_list(&[(4, 4)]);
        assert_eq!(adjacency_records(&graph), vec!["4 4"]);
    }

    #[test]
    fn write_adjacency_emits_one_line_per_vertex() {
        let graph = PropertyGraph::from_edge_list(&[(1, 2), (1, 3)]);
        let mut buffer = Vec::new();
        write_adjacency(&graph, &mut buffer).expect("writing to a Vec cannot fail");
        assert_eq!(String::from_utf8(buffer).expect("ascii"), "1 2 3\n2\n3\n");
    }
}
