//! Search core benchmarks.
//!
//! Run with: `cargo bench -p wayfarer-agent`
//!
//! These benchmarks measure:
//! - Graph search strategies on open grids of growing size
//! - Minimax against alpha-beta on a uniform game tree

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wayfarer_agent::{
    a_star_search, breadth_first_search, depth_first_search, uniform_cost_search,
    AdversarialSearch, AlphaBeta, Minimax,
};
use wayfarer_core::{Direction, GameState, SearchProblem, Successor, TreeSearchConfig};

/// Open `size x size` grid from one corner to the other
struct OpenGrid {
    size: i64,
}

impl SearchProblem for OpenGrid {
    type State = (i64, i64);
    type Action = Direction;

    fn starting_state(&self) -> Option<(i64, i64)> {
        Some((0, 0))
    }

    fn is_goal(&self, state: &(i64, i64)) -> bool {
        *state == (self.size - 1, self.size - 1)
    }

    fn successor_states(&self, &(x, y): &(i64, i64)) -> Vec<Successor<(i64, i64), Direction>> {
        Direction::CARDINAL
            .iter()
            .filter_map(|&direction| {
                let (dx, dy) = direction.vector();
                let next = (x + dx, y + dy);
                let inside = (0..self.size).contains(&next.0) && (0..self.size).contains(&next.1);
                inside.then(|| Successor::new(next, direction, 1.0))
            })
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn manhattan(&(x, y): &(i64, i64), problem: &OpenGrid) -> f64 {
    ((problem.size - 1 - x).abs() + (problem.size - 1 - y).abs()) as f64
}

fn bench_graph_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_search");

    for size in [10, 30, 60] {
        let problem = OpenGrid { size };
        group.bench_with_input(BenchmarkId::new("dfs", size), &problem, |b, problem| {
            b.iter(|| depth_first_search(black_box(problem)));
        });
        group.bench_with_input(BenchmarkId::new("bfs", size), &problem, |b, problem| {
            b.iter(|| breadth_first_search(black_box(problem)));
        });
        group.bench_with_input(BenchmarkId::new("ucs", size), &problem, |b, problem| {
            b.iter(|| uniform_cost_search(black_box(problem)));
        });
        group.bench_with_input(BenchmarkId::new("astar", size), &problem, |b, problem| {
            b.iter(|| a_star_search(black_box(problem), manhattan));
        });
    }

    group.finish();
}

/// Uniform tree of `branching` moves per turn; leaves score by path
#[derive(Clone)]
struct SyntheticGame {
    path: u64,
    branching: u64,
}

impl GameState for SyntheticGame {
    type Action = usize;

    fn legal_actions(&self, _agent: usize) -> Vec<usize> {
        (0..self.branching as usize).collect()
    }

    fn generate_successor(&self, _agent: usize, action: &usize) -> Self {
        Self {
            path: self.path.wrapping_mul(31).wrapping_add(*action as u64 + 7),
            branching: self.branching,
        }
    }

    fn is_win(&self) -> bool {
        false
    }

    fn is_lose(&self) -> bool {
        false
    }

    fn num_agents(&self) -> usize {
        2
    }
}

#[allow(clippy::cast_precision_loss)]
fn hashed_score(game: &SyntheticGame) -> f64 {
    (game.path % 1000) as f64
}

fn bench_adversarial(c: &mut Criterion) {
    let mut group = c.benchmark_group("adversarial");
    let game = SyntheticGame {
        path: 1,
        branching: 5,
    };

    for depth in [1, 2, 3] {
        let config = TreeSearchConfig { depth };
        let minimax = Minimax::new(&config, hashed_score);
        let alpha_beta = AlphaBeta::new(&config, hashed_score);

        group.bench_with_input(BenchmarkId::new("minimax", depth), &game, |b, game| {
            b.iter(|| minimax.decide(black_box(game)));
        });
        group.bench_with_input(BenchmarkId::new("alpha_beta", depth), &game, |b, game| {
            b.iter(|| alpha_beta.decide(black_box(game)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_graph_search, bench_adversarial);
criterion_main!(benches);
