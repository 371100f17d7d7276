//! Depth-first traversal over a system's entities.
//!
//! Exporters depend on this order for deterministic output: the system, then
//! each board in insertion order (components with their pins, then wires,
//! then interfaces), then each rtl group with its signals.

use super::board::{Board, Component, Interface, Pin, Wire};
use super::system::{Rtl, Signal, System};
use super::types::{BoardId, ComponentId, InterfaceId, PinId, RtlId, SignalId, WireId};

/// One entity of the model, tagged with the ids that identify it.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    System(&'a System),
    Board(BoardId, &'a Board),
    Component(BoardId, ComponentId, &'a Component),
    Pin(BoardId, PinId, &'a Pin),
    Wire(BoardId, WireId, &'a Wire),
    Interface(BoardId, InterfaceId, &'a Interface),
    Rtl(RtlId, &'a Rtl),
    Signal(RtlId, SignalId, &'a Signal),
}

/// Visit the system and all its children, depth first, in the documented
/// fixed order.
pub fn depth_first(system: &System) -> impl Iterator<Item = Entity<'_>> {
    let mut out = Vec::new();
    out.push(Entity::System(system));
    for (bid, board) in system.boards() {
        out.push(Entity::Board(bid, board));
        for (cid, component) in board.components() {
            out.push(Entity::Component(bid, cid, component));
            for &pid in component.pins() {
                out.push(Entity::Pin(bid, pid, board.pin(pid)));
            }
        }
        for (wid, wire) in board.wires() {
            out.push(Entity::Wire(bid, wid, wire));
        }
        for (iid, interface) in board.interfaces() {
            out.push(Entity::Interface(bid, iid, interface));
        }
    }
    for (rid, rtl) in system.rtls() {
        out.push(Entity::Rtl(rid, rtl));
        for (sid, signal) in rtl.signals() {
            out.push(Entity::Signal(rid, sid, signal));
        }
    }
    out.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_order() {
        let mut board = Board::new();
        board.identifier = "b".to_string();
        let c = board.add_component("R1", "0603").unwrap();
        board.add_pin(c, "1", "A").unwrap();
        board.add_pin(c, "2", "B").unwrap();
        board.add_wire("N1").unwrap();
        board.add_interface("hdr").unwrap();

        let mut system = System::new("sys");
        system.add_board(board).unwrap();
        let mut rtl = Rtl::new("fpga");
        rtl.add_signal("clk", "A1");
        system.add_rtl(rtl).unwrap();

        let kinds: Vec<&str> = depth_first(&system)
            .map(|e| match e {
                Entity::System(_) => "system",
                Entity::Board(..) => "board",
                Entity::Component(..) => "component",
                Entity::Pin(..) => "pin",
                Entity::Wire(..) => "wire",
                Entity::Interface(..) => "interface",
                Entity::Rtl(..) => "rtl",
                Entity::Signal(..) => "signal",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "system",
                "board",
                "component",
                "pin",
                "pin",
                "wire",
                "interface",
                "rtl",
                "signal"
            ]
        );
    }
}
