//! Pareto ranking for multi-objective runs.
//!
//! Objective vectors are oriented for **minimization**. A modularization
//! run, for instance, ranks `[-cohesion, coupling]`.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: fast non-dominated sorting
//! - [`crowding_distance`]: spread of a front in objective space
//! - [`rank_population`]: both, giving every solution its front and crowding
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm:
//!   NSGA-II", IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Fronts of a non-dominated sort.
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Front index of each solution; 0 is the Pareto front.
    pub ranks: Vec<usize>,

    /// Solution indices per front, best front first.
    pub fronts: Vec<Vec<usize>>,
}

/// Pareto dominance between two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// The first vector dominates the second.
    Dominates,
    /// The second vector dominates the first.
    DominatedBy,
    /// Neither dominates; equal vectors fall here too.
    Incomparable,
}

/// Compares `a` and `b` under minimization.
pub fn dominance(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_wins = false;
    let mut b_wins = false;
    for (&x, &y) in a.iter().zip(b) {
        if x < y {
            a_wins = true;
        } else if y < x {
            b_wins = true;
        }
        if a_wins && b_wins {
            return Dominance::Incomparable;
        }
    }
    match (a_wins, b_wins) {
        (true, false) => Dominance::Dominates,
        (false, true) => Dominance::DominatedBy,
        _ => Dominance::Incomparable,
    }
}

/// Fast non-dominated sorting.
///
/// # Algorithm (Deb et al., 2002)
///
/// Counts, for every solution, how many others dominate it and records whom
/// it dominates. Solutions with count 0 form front 0; peeling a front
/// decrements the counts of what it dominates, exposing the next front.
///
/// # Complexity
/// O(m·n²) for n solutions with m objectives.
///
/// # Panics
/// Panics if `objectives` is empty.
///
/// # Example
///
/// ```
/// use u_modular::ga::multi_objective::non_dominated_sort;
///
/// // [-cohesion, coupling]
/// let objectives = vec![
///     vec![-12.0, 4.0],
///     vec![-9.0, 1.0],
///     vec![-8.0, 3.0], // dominated by the second
/// ];
/// let sorted = non_dominated_sort(&objectives);
/// assert_eq!(sorted.ranks, vec![0, 0, 1]);
/// assert_eq!(sorted.fronts, vec![vec![0, 1], vec![2]]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    assert!(n > 0, "objectives must not be empty");
    debug_assert!(
        objectives.iter().all(|o| o.len() == objectives[0].len()),
        "all objective vectors must have the same length"
    );

    let mut dominated_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(&objectives[i], &objectives[j]) {
                Dominance::Dominates => {
                    dominates[i].push(j);
                    dominated_count[j] += 1;
                }
                Dominance::DominatedBy => {
                    dominates[j].push(i);
                    dominated_count[i] += 1;
                }
                Dominance::Incomparable => {}
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| dominated_count[i] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            ranks[i] = fronts.len();
            for &j in &dominates[i] {
                dominated_count[j] -= 1;
                if dominated_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        next.sort_unstable();
        fronts.push(current);
        current = next;
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance of each solution within one front.
///
/// Extremes of every objective get `f64::INFINITY`; interior solutions sum
/// the normalised gap between their neighbours over all objectives. An
/// objective with zero range contributes nothing.
///
/// ```
/// use u_modular::ga::multi_objective::crowding_distance;
///
/// let front = vec![vec![-12.0, 4.0], vec![-10.0, 2.0], vec![-9.0, 1.0]];
/// let d = crowding_distance(&front);
/// assert!(d[0].is_infinite() && d[2].is_infinite());
/// assert!((d[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distance = vec![0.0f64; n];
    let mut order: Vec<usize> = (0..n).collect();
    for k in 0..m {
        order.sort_by(|&a, &b| {
            objectives[a][k]
                .partial_cmp(&objectives[b][k])
                .unwrap_or(Ordering::Equal)
        });
        let (first, last) = (order[0], order[n - 1]);
        distance[first] = f64::INFINITY;
        distance[last] = f64::INFINITY;

        let range = objectives[last][k] - objectives[first][k];
        if range <= 0.0 {
            continue;
        }
        for w in order.windows(3) {
            let gap = objectives[w[2]][k] - objectives[w[0]][k];
            distance[w[1]] += gap / range;
        }
    }
    distance
}

/// Front index and crowding distance for every solution.
#[derive(Debug, Clone)]
pub struct ParetoRanking {
    pub fronts: Vec<Vec<usize>>,
    pub rank: Vec<usize>,
    pub crowding: Vec<f64>,
}

impl ParetoRanking {
    /// Indices of the non-dominated solutions.
    pub fn first_front(&self) -> &[usize] {
        self.fronts.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Sorts `objectives` into fronts and computes crowding within each front.
///
/// # Panics
/// Panics if `objectives` is empty.
pub fn rank_population(objectives: &[Vec<f64>]) -> ParetoRanking {
    let sorted = non_dominated_sort(objectives);
    let mut crowding = vec![0.0f64; objectives.len()];
    for front in &sorted.fronts {
        let members: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&members)) {
            crowding[i] = d;
        }
    }
    ParetoRanking {
        fronts: sorted.fronts,
        rank: sorted.ranks,
        crowding,
    }
}

/// Crowded comparison of `(front, crowding)` pairs.
///
/// `Greater` means `a` is preferred: a lower front, or the same front and a
/// larger crowding distance.
pub fn crowded_cmp(a: (usize, f64), b: (usize, f64)) -> Ordering {
    b.0.cmp(&a.0)
        .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}
