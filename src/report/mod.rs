//! Fixed-column report readers for other CAD tools.
//!
//! These readers populate the same graph model as the netlist parser, each
//! through the ordinary construction API: [`read_eagle`] builds a [`Board`]
//! from an EAGLE 9.6.2 export triple, [`read_xilinx_io`] builds an
//! [`Rtl`](crate::model::Rtl) group from a Vivado I/O report.
//!
//! [`Board`]: crate::model::Board

mod eagle;
mod xilinx;

pub use eagle::read_eagle;
pub use xilinx::{parse_io_report, read_xilinx_io};
