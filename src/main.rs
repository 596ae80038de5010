// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This is the executable entry point: it reads a nice tree decomposition
//! from a file in the `io` module's text format, runs the sequential solver
//! on it and reports the size of a minimum dominating set of the decomposed
//! graph.

use std::time::Instant;

use clap::Parser;

use tdom::io::read_decomposition;
use tdom::{SequentialSolver, Solver};

/// This structure uses `clap-derive` annotations and defines the arguments
/// that can be passed on to the executable solver.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to the decomposition file
    fname: String,
    /// Print the materialized bags before solving
    #[clap(short, long)]
    verbose: bool,
}

/// This is your executable's entry point. It is the place where all the
/// pieces are put together to compute the minimum dominating set size of the
/// decomposed graph.
fn main() {
    let args = Args::parse();
    let decomposition = read_decomposition(&args.fname).unwrap();

    if args.verbose {
        for bag in decomposition.bags() {
            println!("{bag}");
        }
    }

    let mut solver = SequentialSolver::new(&decomposition);

    let start = Instant::now();
    let completion = solver.minimize().unwrap();
    let duration = start.elapsed();

    let objective = completion
        .best_value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "infeasible".to_string());

    println!("Duration:   {:.3} seconds", duration.as_secs_f32());
    println!("Bags:       {}", decomposition.nb_bags());
    println!("Width:      {}", decomposition.width());
    println!("Objective:  {objective}");
}
