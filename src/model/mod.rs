//! The connectivity graph: systems, boards, components, pins, wires,
//! interfaces and off-board signal groups.
//!
//! Entities are stored arena-style (flat vectors per board or per rtl group)
//! and addressed by `usize`-backed id newtypes, so the bidirectional
//! relationships of the model are plain index fields instead of ownership
//! cycles. The graph is not designed for concurrent mutation: build it in a
//! single construction phase, then treat it as an immutable snapshot for
//! [`nets::NetMap`](crate::nets::NetMap) and the exporters.

mod board;
mod system;
mod types;
mod visit;

pub use board::{Board, Component, Interface, Pin, Wire};
pub use system::{Rtl, Signal, System};
pub use types::{
    BoardId, ComponentClass, ComponentId, InterfaceHandle, InterfaceId, Peer, PinId, RtlId,
    SignalId, WireId, WireKind,
};
pub use visit::{depth_first, Entity};
