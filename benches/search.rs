use criterion::{Criterion, black_box, criterion_group, criterion_main};
use search_engines::minimax::{GameAlgorithm, select_move};
use search_engines::puzzle::{PuzzleState, random_walk};
use search_engines::search::{Algorithm, SearchConfig, solve};
use search_engines::tictactoe::{GameBoard, Player};

fn puzzle_search(c: &mut Criterion) {
    let goal = PuzzleState::solved();
    let start = random_walk(&goal, 20, &mut fastrand::Rng::with_seed(1));
    let config = SearchConfig::default().with_max_depth(20);

    let mut group = c.benchmark_group("8-puzzle");
    for algorithm in Algorithm::ALL {
        group.bench_function(algorithm.name(), |b| {
            b.iter(|| solve(black_box(&start), &goal, algorithm, &config))
        });
    }
    group.finish();
}

fn move_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("empty board");
    group.sample_size(10);

    group.bench_function("minimax", |b| {
        b.iter(|| select_move(black_box(&GameBoard::new()), Player::X, GameAlgorithm::Minimax))
    });

    group.bench_function("alpha-beta", |b| {
        b.iter(|| select_move(black_box(&GameBoard::new()), Player::X, GameAlgorithm::AlphaBeta))
    });
    group.finish();
}

criterion_group!(benches, puzzle_search, move_selection);
criterion_main!(benches);
