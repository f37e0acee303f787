//! Line-oriented benchmark driver for the Connect Four solver.
//!
//! Reads move sequences (one per line, optionally followed by whitespace and an
//! expected score which is ignored), solves each, and prints
//! `<move-sequence> <score> <nodes-explored> <microseconds>` to stdout. Invalid
//! lines produce a diagnostic on stderr and an empty stdout line, preserving
//! line-number alignment between input and output.

use clap::Parser;
use connect4_solver::{Position, Solver};
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

const DEFAULT_TT_SIZE_MB: usize = 64;

#[derive(Parser)]
#[command(about = "Benchmark driver for the Connect Four perfect-play solver")]
struct Args {
    /// Transposition table size, in megabytes.
    #[arg(long = "tt-size-mb", default_value_t = DEFAULT_TT_SIZE_MB)]
    tt_size_mb: usize,

    /// Only determine the sign of the score (win/draw/loss), not its exact value.
    #[arg(long)]
    weak: bool,

    /// File of move sequences, one per line. Reads stdin if omitted.
    path: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let lines: Vec<String> = match &args.path {
        Some(path) => fs::read_to_string(path)?.lines().map(str::to_owned).collect(),
        None => io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    let progress_style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} ({eta})",
    )?
    .progress_chars("#>-");
    let progress = ProgressBar::new(lines.len() as u64).with_style(progress_style);

    let mut solver = Solver::with_tt_size_mb(args.tt_size_mb);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in progress.wrap_iter(lines.iter()) {
        let sequence = line.split_whitespace().next().unwrap_or("");

        let mut position = match Position::from_moves(sequence) {
            Ok(position) => position,
            Err(err) => {
                eprintln!("invalid move sequence {sequence:?}: {err}");
                writeln!(out)?;
                continue;
            }
        };

        solver.reset();
        let start = Instant::now();
        let score = solver.solve(&mut position, args.weak);
        let elapsed = start.elapsed();

        writeln!(
            out,
            "{sequence} {score} {nodes} {micros}",
            nodes = solver.nodes_explored,
            micros = elapsed.as_micros(),
        )?;
    }

    Ok(())
}
