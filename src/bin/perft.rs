//! `perft <depth> <fen-or-startpos>`: per-root-move leaf counts plus a grand
//! total, for validating move generation against external perft references.

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use chess_core::board::Board;
use chess_core::perft::perft_divide;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: perft <depth> <fen-or-startpos>");
        return ExitCode::FAILURE;
    }

    let Ok(depth) = args[1].parse::<u32>() else {
        eprintln!("invalid depth: {}", args[1]);
        return ExitCode::FAILURE;
    };

    let board = match Board::try_from_fen(&args[2]) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("invalid position: {e}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let divide = perft_divide(&board, depth);
    let total: u64 = divide.iter().map(|(_, count)| count).sum();
    for (mv, count) in &divide {
        println!("{mv}: {count}");
    }
    println!("Total: {total} in {:?}", start.elapsed());

    ExitCode::SUCCESS
}
