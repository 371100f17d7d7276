//! Core id types for the connectivity graph.
//!
//! Entities live in per-board (or per-rtl) arenas and are addressed by these
//! `usize`-backed newtypes. An id is only meaningful on the board or rtl that
//! issued it; cross-board references carry a [`BoardId`] alongside.

use std::fmt;

use serde::Serialize;

/// Index of a board within its [`System`](crate::model::System).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId(pub usize);

/// Index of a component within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

/// Index of a pin within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub usize);

/// Index of a wire within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub usize);

/// Index of an interface within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(pub usize);

/// Index of an off-board signal group within its [`System`](crate::model::System).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RtlId(pub usize);

/// Index of a signal within its rtl group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub usize);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

impl fmt::Display for RtlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// A board-qualified interface reference, usable across the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceHandle {
    pub board: BoardId,
    pub interface: InterfaceId,
}

impl InterfaceHandle {
    pub fn new(board: BoardId, interface: InterfaceId) -> Self {
        Self { board, interface }
    }
}

impl fmt::Display for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.board, self.interface)
    }
}

/// What an interface is paired with: another board's interface, or an
/// off-board signal group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    Interface(InterfaceHandle),
    Rtl(RtlId),
}

/// Wire classification.
///
/// `NoConnect` wires never merge with non-NC wires during net resolution;
/// `Dc` wires are immune to component-model merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireKind {
    #[default]
    Default,
    Dc,
    NoConnect,
}

/// Component classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentClass {
    #[default]
    Default,
    Connector,
    Discrete,
    Chip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BoardId(0).to_string(), "b0");
        assert_eq!(WireId(12).to_string(), "w12");
        let h = InterfaceHandle::new(BoardId(1), InterfaceId(3));
        assert_eq!(h.to_string(), "b1.i3");
    }
}
