//! Integration tests for strongly connected components

use std::collections::HashMap;

use schemata_foundation::strongly_connected_components;

fn components(edges: &[(&'static str, &'static str)]) -> Vec<Vec<&'static str>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut nodes = Vec::new();
    for (from, to) in edges {
        adjacency.entry(*from).or_default().push(*to);
        nodes.push(*from);
    }
    let mut found = strongly_connected_components(nodes, |node: &&str| adjacency.get(node).cloned().unwrap_or_default());
    for component in &mut found {
        component.sort_unstable();
    }
    found.sort();
    found
}

#[test]
fn acyclic_graphs_have_no_components() {
    assert!(components(&[("a", "b"), ("b", "c"), ("a", "c")]).is_empty());
}

#[test]
fn self_edges_form_single_node_components() {
    assert_eq!(components(&[("a", "a"), ("a", "b")]), vec![vec!["a"]]);
}

#[test]
fn separate_cycles_are_reported_separately() {
    let found = components(&[("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "c")]);
    assert_eq!(found, vec![vec!["a", "b"], vec!["c", "d", "e"]]);
}

#[test]
fn long_chains_do_not_overflow_the_stack() {
    let n = 100_000u32;
    let found = strongly_connected_components(0..n, |&i: &u32| if i + 1 < n { vec![i + 1] } else { vec![0] });
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].len(), n as usize);
}
