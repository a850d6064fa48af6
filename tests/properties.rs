//! Property-based tests for the linear linkage encoding and its operators.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use u_modular::encoding::{decode, fix, LinearLinkageEncoding};
use u_modular::graph::{ElementIndexing, Graph, GraphBuilder, RelationKind};
use u_modular::greedy::GreedyPartitioner;
use u_modular::module::{check_connectivity, split_module_random_walk, Module};
use u_modular::operators::{GraftMutator, GroupCrossover, MutationWeights};

/// `count` paths of `len` functions, path `p` on vertices `p*len..(p+1)*len`.
fn paths(count: usize, len: usize, indexing: ElementIndexing) -> Arc<Graph> {
    let mut b = GraphBuilder::new().with_indexing(indexing);
    for i in 0..count * len {
        b.add_function(&format!("f{i}")).unwrap();
    }
    for p in 0..count {
        for j in 1..len {
            let (s, t) = (p * len + j - 1, p * len + j);
            b.add_relation(RelationKind::Conjunction, &format!("f{s}"), &format!("f{t}"))
                .unwrap();
        }
    }
    Arc::new(b.build().unwrap())
}

/// Two 4-cliques joined by a bridge (`f3 - f4`), plus a separate 6-cycle
/// on `f8..f13`.
fn cliques_and_cycle(indexing: ElementIndexing) -> Arc<Graph> {
    let mut b = GraphBuilder::new().with_indexing(indexing);
    for i in 0..14 {
        b.add_function(&format!("f{i}")).unwrap();
    }
    let mut relate = |s: usize, t: usize, kind: RelationKind| {
        b.add_relation(kind, &format!("f{s}"), &format!("f{t}")).unwrap();
    };
    for base in [0, 4] {
        for s in base..base + 4 {
            for t in s + 1..base + 4 {
                relate(s, t, RelationKind::Conjunction);
            }
        }
    }
    relate(3, 4, RelationKind::Read);
    for i in 0..6 {
        relate(8 + i, 8 + (i + 1) % 6, RelationKind::Update);
    }
    Arc::new(b.build().unwrap())
}

/// Functions `f0..fn` with the given relations (self-loops skipped).
fn random_graph(n: usize, relations: &[(usize, usize, u8)]) -> Graph {
    let mut b = GraphBuilder::new().with_indexing(ElementIndexing::VerticesOnly);
    for i in 0..n {
        b.add_function(&format!("f{i}")).unwrap();
    }
    let kinds = [
        RelationKind::Conjunction,
        RelationKind::Disjunction,
        RelationKind::Create,
        RelationKind::Read,
        RelationKind::Update,
    ];
    for &(s, t, k) in relations {
        let (s, t) = (s % n, t % n);
        if s != t {
            let kind = kinds[k as usize % kinds.len()];
            b.add_relation(kind, &format!("f{s}"), &format!("f{t}")).unwrap();
        }
    }
    b.build().unwrap()
}

fn genome(n: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..n, n)
}

fn index_sets(modules: &[Module]) -> BTreeSet<Vec<usize>> {
    modules.iter().map(|m| m.indices().to_vec()).collect()
}

fn is_partition(modules: &[Module], n: usize) -> bool {
    let mut all: Vec<usize> = modules.iter().flat_map(|m| m.iter()).collect();
    all.sort_unstable();
    all == (0..n).collect::<Vec<_>>()
}

fn check_repair(graph: Arc<Graph>, genes: Vec<usize>, seed: u64) -> Result<(), TestCaseError> {
    let n = graph.element_count();
    let mut enc = LinearLinkageEncoding::from_genes(graph, genes).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    fix(&mut enc, &mut rng);
    prop_assert!(enc.is_valid(), "{:?}", enc.validity());
    prop_assert!(is_partition(enc.modules(), n));
    Ok(())
}

fn check_crossover(
    graph: Arc<Graph>,
    a: Vec<usize>,
    b: Vec<usize>,
    seed: u64,
) -> Result<(), TestCaseError> {
    let n = graph.element_count();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut p1 = LinearLinkageEncoding::from_genes(graph.clone(), a).unwrap();
    let mut p2 = LinearLinkageEncoding::from_genes(graph, b).unwrap();
    fix(&mut p1, &mut rng);
    fix(&mut p2, &mut rng);
    prop_assume!(p1.is_valid() && p2.is_valid());

    let (c1, c2) = GroupCrossover::new().crossover(&p1, &p2, &mut rng);
    for child in [&c1, &c2] {
        prop_assert_eq!(child.len(), n);
        prop_assert!(is_partition(child.modules(), n));
        prop_assert!(child.is_valid(), "{:?}", child.validity());
    }
    Ok(())
}

fn check_mutation(graph: Arc<Graph>, genes: Vec<usize>, seed: u64) -> Result<(), TestCaseError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut parent = LinearLinkageEncoding::from_genes(graph, genes).unwrap();
    fix(&mut parent, &mut rng);
    let snapshot = parent.to_genes();

    let mutator = GraftMutator::new(1.0, MutationWeights::default()).unwrap();
    let child = mutator.mutate(&parent, &mut rng);
    prop_assert_eq!(parent.genes(), snapshot.as_slice());
    prop_assert!(child.is_valid(), "{:?}", child.validity());
    Ok(())
}

proptest! {
    /// Re-encoding decoded modules and decoding again yields the same partition.
    #[test]
    fn prop_decode_idempotent(genes in genome(24)) {
        let graph = paths(4, 6, ElementIndexing::VerticesOnly);
        let modules = decode(&genes);
        prop_assert!(is_partition(&modules, 24));

        let enc = LinearLinkageEncoding::from_modules(graph, &modules).unwrap();
        prop_assert_eq!(index_sets(&decode(enc.genes())), index_sets(&modules));
        prop_assert_eq!(decode(&genes), modules);
    }

    /// Rewriting a module canonically leaves the partition unchanged.
    #[test]
    fn prop_update_module_round_trip(genes in genome(20), pick in any::<prop::sample::Index>()) {
        let graph = paths(4, 5, ElementIndexing::VerticesOnly);
        let mut enc = LinearLinkageEncoding::from_genes(graph, genes).unwrap();
        let before = index_sets(enc.modules());
        let module = enc.module(pick.index(enc.module_count())).clone();

        enc.update_module(&module);
        prop_assert_eq!(index_sets(enc.modules()), before);
        let last = module.ending_node().unwrap();
        prop_assert_eq!(enc.genes()[last], last);
    }

    /// Repair turns any genome over a partitionable graph into a valid one.
    #[test]
    fn prop_repair_converges(genes in genome(20), seed in any::<u64>()) {
        check_repair(paths(4, 5, ElementIndexing::VerticesOnly), genes, seed)?;
    }

    /// 20 vertices and 16 indexed edges.
    #[test]
    fn prop_repair_converges_with_edge_elements(genes in genome(36), seed in any::<u64>()) {
        check_repair(paths(4, 5, ElementIndexing::VerticesAndEdges), genes, seed)?;
    }

    #[test]
    fn prop_repair_converges_on_cliques(genes in genome(14), seed in any::<u64>()) {
        check_repair(cliques_and_cycle(ElementIndexing::VerticesOnly), genes, seed)?;
    }

    /// 14 vertices and 19 indexed edges.
    #[test]
    fn prop_repair_converges_on_cliques_with_edge_elements(
        genes in genome(33),
        seed in any::<u64>(),
    ) {
        check_repair(cliques_and_cycle(ElementIndexing::VerticesAndEdges), genes, seed)?;
    }

    /// Random-walk split pieces are connected and cover the module exactly.
    #[test]
    fn prop_split_connectivity(len in 1usize..30, seed in any::<u64>()) {
        let graph = paths(1, len, ElementIndexing::VerticesOnly);
        let module = Module::from_indices(0..len);
        prop_assert!(check_connectivity(&module, &graph));

        let mut rng = StdRng::seed_from_u64(seed);
        let pieces = split_module_random_walk(&module, &graph, &mut rng);
        prop_assert!(is_partition(&pieces, len));
        for piece in &pieces {
            prop_assert!(!piece.is_empty());
            prop_assert!(check_connectivity(piece, &graph), "{:?}", piece);
        }
        if len > 1 {
            prop_assert!(pieces.len() >= 2);
        }
    }

    /// Offspring of valid parents are valid partitions of the same graph.
    #[test]
    fn prop_crossover_closure(a in genome(24), b in genome(24), seed in any::<u64>()) {
        check_crossover(paths(3, 8, ElementIndexing::VerticesOnly), a, b, seed)?;
    }

    /// 24 vertices and 21 indexed edges.
    #[test]
    fn prop_crossover_closure_with_edge_elements(
        a in genome(45),
        b in genome(45),
        seed in any::<u64>(),
    ) {
        check_crossover(paths(3, 8, ElementIndexing::VerticesAndEdges), a, b, seed)?;
    }

    #[test]
    fn prop_crossover_closure_on_cliques_with_edge_elements(
        a in genome(33),
        b in genome(33),
        seed in any::<u64>(),
    ) {
        check_crossover(cliques_and_cycle(ElementIndexing::VerticesAndEdges), a, b, seed)?;
    }

    /// Mutation never touches its input and always returns a valid encoding.
    #[test]
    fn prop_mutation_closure(genes in genome(20), seed in any::<u64>()) {
        check_mutation(paths(4, 5, ElementIndexing::VerticesOnly), genes, seed)?;
    }

    #[test]
    fn prop_mutation_closure_with_edge_elements(genes in genome(36), seed in any::<u64>()) {
        check_mutation(paths(4, 5, ElementIndexing::VerticesAndEdges), genes, seed)?;
    }

    #[test]
    fn prop_mutation_closure_on_cliques_with_edge_elements(
        genes in genome(33),
        seed in any::<u64>(),
    ) {
        check_mutation(cliques_and_cycle(ElementIndexing::VerticesAndEdges), genes, seed)?;
    }

    /// The greedy partition depends on the graph alone.
    #[test]
    fn prop_greedy_deterministic(
        n in 2usize..16,
        relations in prop::collection::vec((0usize..16, 0usize..16, 0u8..5), 1..40),
    ) {
        let graph = random_graph(n, &relations);
        prop_assume!(!graph.participating_edges().is_empty());

        let first = GreedyPartitioner::new(&graph).partition().unwrap();
        let second = GreedyPartitioner::new(&graph).partition().unwrap();
        prop_assert_eq!(&first, &second);

        let rebuilt = random_graph(n, &relations);
        prop_assert_eq!(GreedyPartitioner::new(&rebuilt).partition().unwrap(), first);
    }
}
