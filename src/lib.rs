//! # boardnet
//!
//! A connectivity model for multi-board electronic assemblies.
//!
//! Boards are closed netlists: their components and wires come from one CAD
//! tool's export, but the interesting electrical nodes span several boards
//! mated through connectors, and sometimes a programmable device's external
//! pins. This library reads disparate EDA exports into one typed graph and
//! computes true connectivity (nets) across the whole assembly.
//!
//! ## Architecture
//!
//! - [`model`] - the connectivity graph: systems, boards, components, pins,
//!   wires, interfaces and off-board signal groups
//! - [`netlist`] - lexer and recursive-descent parser for the three-file
//!   proprietary netlist export
//! - [`report`] - fixed-column readers for EAGLE exports and Xilinx I/O
//!   reports
//! - [`nets`] - the union-find net resolver
//! - [`export`] - JSON serialization of a resolved system
//!
//! ## Usage
//!
//! ```no_run
//! use boardnet::{netlist, nets::NetMap, System};
//!
//! # fn main() -> boardnet::Result<()> {
//! let mut board = netlist::read_netlist("exports/carrier")?;
//! board.identifier = "carrier".to_string();
//!
//! let mut system = System::new("assembly");
//! let carrier = system.add_board(board)?;
//!
//! // ... add more boards, mate interfaces, bind rtl groups ...
//!
//! let nets = NetMap::build(&system);
//! for net in nets.nets() {
//!     println!("net {}: {} members", net.id(), net.members().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Net resolution rules
//!
//! Resolution seeds one set per wire (and off-board signal) and merges sets
//! along interface pairings and component internal-short models. Two
//! domain rules guard the merges: a No-Connect wire never joins a non-NC
//! wire, and a component model never bridges a DC-classified rail into a
//! logic net. See [`nets`] for the details.

pub mod error;
pub mod export;
pub mod model;
pub mod netlist;
pub mod nets;
pub mod report;

// Re-export main types for convenience
pub use error::{BoardnetError, Result};
pub use model::{Board, Rtl, System};
pub use nets::NetMap;
