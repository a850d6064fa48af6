//! Module algebra against a [`Graph`]: connectivity, boundaries, merge, split.
//!
//! Connectivity is always measured on the graph's element adjacency (see
//! [`Graph::element_graph`]), so the same code serves both element
//! indexing modes. Traversals see only the module's own elements through a
//! `NodeFiltered` view of that adjacency.

use super::types::Module;
use crate::graph::{EdgeId, Element, Graph, VertexId};
use petgraph::graph::NodeIndex;
use petgraph::visit::{depth_first_search, Dfs, DfsEvent, NodeFiltered, Walker};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap, HashSet};

/// True when the module's vertex members include `v`.
pub fn holds_vertex(module: &Module, graph: &Graph, v: VertexId) -> bool {
    graph
        .element_of_vertex(v)
        .is_some_and(|el| module.contains(el))
}

/// Vertices among the module's elements.
pub fn vertices_of(module: &Module, graph: &Graph) -> Vec<VertexId> {
    module.iter().filter_map(|i| graph.element_vertex(i)).collect()
}

/// A module is isolated when it is empty or holds a single vertex with no
/// participating edge.
pub fn is_isolated(module: &Module, graph: &Graph) -> bool {
    match module.indices() {
        [] => true,
        [only] => graph.is_isolated_element(*only),
        _ => false,
    }
}

/// Checks that the module induces a connected structure.
///
/// Modules with at most one element are trivially connected. Beyond the
/// reachability test, every indexed edge in the module must touch one of
/// the module's vertices.
pub fn check_connectivity(module: &Module, graph: &Graph) -> bool {
    if module.len() <= 1 {
        return true;
    }

    if reachable_within(module, graph, module.indices()[0]).len() != module.len() {
        return false;
    }

    module.iter().all(|i| match graph.element(i) {
        Element::Vertex(_) => true,
        Element::Edge(e) => {
            let edge = graph.edge(e);
            holds_vertex(module, graph, edge.source) || holds_vertex(module, graph, edge.target)
        }
    })
}

/// Elements of `module` reachable from `start` without leaving the module.
fn reachable_within(module: &Module, graph: &Graph, start: usize) -> Vec<usize> {
    let restricted =
        NodeFiltered::from_fn(graph.element_graph(), |n: NodeIndex| module.contains(n.index()));
    Dfs::new(&restricted, NodeIndex::new(start))
        .iter(&restricted)
        .map(|n| n.index())
        .collect()
}

/// Distinct participating edges touching at least one vertex of the module.
pub fn incident_edges(module: &Module, graph: &Graph) -> BTreeSet<EdgeId> {
    vertices_of(module, graph)
        .into_iter()
        .flat_map(|v| graph.edges_incident_to_vertex(v).iter().copied())
        .collect()
}

/// Edges with exactly one endpoint among the module's vertices.
pub fn boundary_edges(module: &Module, graph: &Graph) -> BTreeSet<EdgeId> {
    incident_edges(module, graph)
        .into_iter()
        .filter(|&e| {
            let edge = graph.edge(e);
            holds_vertex(module, graph, edge.source) ^ holds_vertex(module, graph, edge.target)
        })
        .collect()
}

/// Ordered merge of two modules.
pub fn merge_modules(a: &Module, b: &Module) -> Module {
    let (xs, ys) = (a.indices(), b.indices());
    let mut merged = Vec::with_capacity(xs.len() + ys.len());
    let (mut i, mut j) = (0, 0);
    while i < xs.len() && j < ys.len() {
        if xs[i] < ys[j] {
            merged.push(xs[i]);
            i += 1;
        } else {
            merged.push(ys[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&xs[i..]);
    merged.extend_from_slice(&ys[j..]);
    Module::from_indices(merged)
}

/// Splits a module into its connected pieces, ordered by smallest index.
pub fn connected_pieces(module: &Module, graph: &Graph) -> Vec<Module> {
    let mut assigned: HashSet<usize> = HashSet::with_capacity(module.len());
    let mut pieces = Vec::new();

    for start in module.iter() {
        if assigned.contains(&start) {
            continue;
        }
        let reached = reachable_within(module, graph, start);
        assigned.extend(reached.iter().copied());
        pieces.push(Module::from_indices(reached));
    }
    pieces
}

/// Partitions a module into connected pieces by repeated random walks.
///
/// Each walk starts at a random seed of the unassigned remainder and grows
/// along adjacency restricted to that remainder until it reaches half the
/// module's size or runs out of reachable elements. Every piece is
/// connected; a connected module with two or more elements always yields at
/// least two pieces.
pub fn split_module_random_walk<R: Rng>(module: &Module, graph: &Graph, rng: &mut R) -> Vec<Module> {
    match module.len() {
        0 | 1 => return vec![module.clone()],
        2 => return module.iter().map(Module::singleton).collect(),
        _ => {}
    }

    let target = module.len() / 2;
    let mut remainder: Vec<usize> = module.indices().to_vec();
    let mut remaining: HashSet<usize> = remainder.iter().copied().collect();
    let mut pieces = Vec::new();

    while !remainder.is_empty() {
        let seed = remainder[rng.random_range(0..remainder.len())];
        let piece = walk_piece(seed, target, graph, &remaining, rng);
        for i in piece.iter() {
            remaining.remove(&i);
        }
        remainder.retain(|i| remaining.contains(i));
        pieces.push(piece);
    }
    pieces
}

fn walk_piece<R: Rng>(
    seed: usize,
    target: usize,
    graph: &Graph,
    remaining: &HashSet<usize>,
    rng: &mut R,
) -> Module {
    let mut piece = Module::new();
    let mut stack = vec![seed];
    while let Some(current) = stack.pop() {
        if piece.len() >= target {
            break;
        }
        if !piece.add_index(current) {
            continue;
        }
        let mut next: Vec<usize> = graph
            .element_neighbors(current)
            .filter(|&j| remaining.contains(&j) && !piece.contains(j))
            .collect();
        next.shuffle(rng);
        stack.extend(next);
    }
    piece
}

/// Cuts a connected module into two connected halves of at least three
/// elements each.
///
/// Builds a depth-first spanning tree from a random root and detaches the subtree
/// whose size is closest to half the module. Removing a subtree leaves the
/// rest of a spanning tree connected, so both halves stay connected.
/// Returns `None` when the module is disconnected, has fewer than six
/// elements, or no subtree has an admissible size (e.g. a star).
pub fn bisect_module<R: Rng>(module: &Module, graph: &Graph, rng: &mut R) -> Option<(Module, Module)> {
    let n = module.len();
    if n < 6 || !check_connectivity(module, graph) {
        return None;
    }

    let root = module.indices()[rng.random_range(0..n)];
    let restricted =
        NodeFiltered::from_fn(graph.element_graph(), |n: NodeIndex| module.contains(n.index()));
    let mut parent: HashMap<usize, usize> = HashMap::from([(root, root)]);
    let mut order = Vec::with_capacity(n);
    depth_first_search(&restricted, Some(NodeIndex::new(root)), |event| match event {
        DfsEvent::Discover(node, _) => order.push(node.index()),
        DfsEvent::TreeEdge(from, to) => {
            parent.insert(to.index(), from.index());
        }
        _ => {}
    });

    let mut size: HashMap<usize, usize> = order.iter().map(|&i| (i, 1)).collect();
    for &i in order.iter().rev() {
        if i == root {
            continue;
        }
        let s = size[&i];
        if let Some(ps) = size.get_mut(&parent[&i]) {
            *ps += s;
        }
    }

    let half = n / 2;
    let cut = order
        .iter()
        .copied()
        .filter(|&i| i != root && size[&i] >= 3 && n - size[&i] >= 3)
        .min_by_key(|&i| size[&i].abs_diff(half))?;

    let mut subtree = Module::singleton(cut);
    for &i in &order {
        if i != cut && subtree.contains(parent[&i]) {
            subtree.add_index(i);
        }
    }
    let rest = Module::from_indices(module.iter().filter(|&i| !subtree.contains(i)));
    Some((subtree, rest))
}
