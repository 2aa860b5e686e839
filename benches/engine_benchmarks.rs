//! Benchmarks for chess engine performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::board::Board;
use chess_core::engine::{ChessEngine, Engine};
use chess_core::perft::perft;
use chess_core::types::Color;

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let board = Board::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&board), black_box(depth)))
        });
    }

    let kiwipete: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&kiwipete), black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Board::new();
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(startpos.legal_moves(startpos.side_to_move())))
    });

    let middlegame: Board = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
        .parse()
        .unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| black_box(middlegame.legal_moves(middlegame.side_to_move())))
    });

    let kiwipete: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .unwrap();
    group.bench_function("kiwipete", |b| {
        b.iter(|| black_box(kiwipete.legal_moves(kiwipete.side_to_move())))
    });

    group.finish();
}

fn bench_get_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_move");
    group.sample_size(10);

    for depth in [2, 3, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut engine = Engine::with_seed(0);
                engine.start(Board::new(), Color::White);
                engine.set_search_depth(depth);
                black_box(engine.get_move())
            })
        });
    }
}

criterion_group!(benches, bench_perft, bench_movegen, bench_get_move);
criterion_main!(benches);
