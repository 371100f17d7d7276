//! boardnet - multi-board connectivity explorer
//!
//! Reads EDA netlist exports, resolves electrical connectivity across the
//! assembly, and prints a summary or writes the JSON model.
//!
//! # Usage
//!
//! ```bash
//! boardnet --netlist exports/carrier --output carrier.json
//! boardnet --eagle shield.nets shield.pins shield.parts
//! ```

use std::path::PathBuf;

use clap::Parser;

use boardnet::{export, netlist, nets::NetMap, report, Result, System};

/// Multi-board connectivity explorer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Netlist export directory (pstchip.dat, pstxprt.dat, pstxnet.dat)
    #[arg(long, value_name = "DIR")]
    netlist: Option<PathBuf>,

    /// EAGLE report triple: nets, pins, parts
    #[arg(long, num_args = 3, value_name = "FILE")]
    eagle: Option<Vec<PathBuf>>,

    /// Write the JSON model to this path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut system = System::new("assembly");

    if let Some(dir) = &args.netlist {
        let mut board = netlist::read_netlist(dir)?;
        board.identifier = board.name.clone();
        system.add_board(board)?;
    }

    if let Some(paths) = &args.eagle {
        let mut board = report::read_eagle(&paths[0], &paths[1], &paths[2])?;
        board.identifier = board.name.clone();
        system.add_board(board)?;
    }

    let nets = NetMap::build(&system);

    for (_, board) in system.boards() {
        println!(
            "board {}: {} components, {} wires, {} interfaces",
            board.identifier,
            board.components().count(),
            board.wires().count(),
            board.interfaces().count(),
        );
    }
    println!("{} nets resolved", nets.len());

    if let Some(path) = &args.output {
        export::write_json(&system, &nets, path)?;
        println!("model written to {}", path.display());
    }

    Ok(())
}
