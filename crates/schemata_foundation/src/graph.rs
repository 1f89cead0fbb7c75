//! Strongly connected components over arbitrary directed graphs.
//!
//! An iterative Tarjan traversal: discovery indices, low-links, and stack
//! membership live in a side table keyed by a dense node id, so the caller's
//! node type stays immutable and deep graphs do not exhaust the call stack.

use std::collections::HashMap;
use std::hash::Hash;

/// Returns the non-trivial strongly connected components of a graph.
///
/// A component is non-trivial when it has more than one member or is a single
/// node with an edge to itself. An empty result means the graph is acyclic.
/// Nodes reachable through `edges` but missing from `nodes` are visited too.
///
/// Members of each component are listed in discovery order; components are
/// listed in the order they complete.
pub fn strongly_connected_components<N, I, F, E>(nodes: I, edges: F) -> Vec<Vec<N>>
where
    N: Clone + Eq + Hash,
    I: IntoIterator<Item = N>,
    F: FnMut(&N) -> E,
    E: IntoIterator<Item = N>,
{
    let mut tarjan = Tarjan::new(edges);
    for node in nodes {
        let id = tarjan.intern(node);
        if tarjan.states[id].index.is_none() {
            tarjan.visit(id);
        }
    }
    tarjan.components
}

#[derive(Clone, Default)]
struct NodeState {
    index: Option<usize>,
    low_link: usize,
    on_stack: bool,
    self_edge: bool,
    successors: Vec<usize>,
}

struct Tarjan<N, F> {
    edges: F,
    ids: HashMap<N, usize>,
    nodes: Vec<N>,
    states: Vec<NodeState>,
    next_index: usize,
    stack: Vec<usize>,
    components: Vec<Vec<N>>,
}

impl<N, F, E> Tarjan<N, F>
where
    N: Clone + Eq + Hash,
    F: FnMut(&N) -> E,
    E: IntoIterator<Item = N>,
{
    fn new(edges: F) -> Self {
        Self {
            edges,
            ids: HashMap::new(),
            nodes: Vec::new(),
            states: Vec::new(),
            next_index: 0,
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn intern(&mut self, node: N) -> usize {
        if let Some(&id) = self.ids.get(&node) {
            return id;
        }
        let id = self.nodes.len();
        self.ids.insert(node.clone(), id);
        self.nodes.push(node);
        self.states.push(NodeState::default());
        id
    }

    /// Assigns a discovery index and loads the node's successors.
    fn discover(&mut self, id: usize) {
        let targets: Vec<N> = (self.edges)(&self.nodes[id]).into_iter().collect();
        let successors: Vec<usize> = targets.into_iter().map(|t| self.intern(t)).collect();

        let state = &mut self.states[id];
        state.index = Some(self.next_index);
        state.low_link = self.next_index;
        state.on_stack = true;
        state.self_edge = successors.contains(&id);
        state.successors = successors;

        self.next_index += 1;
        self.stack.push(id);
    }

    fn visit(&mut self, root: usize) {
        // (node, position of the next successor to examine)
        let mut work: Vec<(usize, usize)> = vec![(root, 0)];
        self.discover(root);

        while let Some(&(v, position)) = work.last() {
            if let Some(&w) = self.states[v].successors.get(position) {
                if let Some(frame) = work.last_mut() {
                    frame.1 += 1;
                }
                match self.states[w].index {
                    None => {
                        self.discover(w);
                        work.push((w, 0));
                    }
                    Some(w_index) if self.states[w].on_stack => {
                        let state = &mut self.states[v];
                        state.low_link = state.low_link.min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            let low_link = self.states[v].low_link;
            if let Some(&(parent, _)) = work.last() {
                let state = &mut self.states[parent];
                state.low_link = state.low_link.min(low_link);
            }
            if Some(low_link) == self.states[v].index {
                self.pop_component(v);
            }
        }
    }

    fn pop_component(&mut self, root: usize) {
        let mut members = Vec::new();
        while let Some(id) = self.stack.pop() {
            self.states[id].on_stack = false;
            members.push(id);
            if id == root {
                break;
            }
        }
        if members.len() > 1 || self.states[root].self_edge {
            members.reverse();
            self.components
                .push(members.into_iter().map(|id| self.nodes[id].clone()).collect());
        }
    }
}
