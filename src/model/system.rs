//! System assembly: boards, off-board signal groups, and pairing.
//!
//! A system owns its boards and rtl groups in insertion order. Interface
//! pairing is the system-level operation that mates two boards (or a board
//! and an rtl group) pin-for-pin; it is symmetric, one-shot, and
//! arity-checked.

use crate::error::{BoardnetError, Result};

use super::board::{Board, Interface};
use super::types::{BoardId, InterfaceHandle, Peer, RtlId, SignalId};

/// One external pin of a programmable device: a signal name plus the
/// physical package location it is bonded to.
#[derive(Debug)]
pub struct Signal {
    name: String,
    location: String,
}

impl Signal {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// An off-board signal group: a programmable device's external pin list,
/// pairable with exactly one board interface.
///
/// Signals keep their insertion order; pairing correspondence is positional
/// against the name-sorted view (see [`Rtl::sorted_by_name`]).
#[derive(Debug)]
pub struct Rtl {
    pub name: String,
    signals: Vec<Signal>,
    pub(crate) other: Option<InterfaceHandle>,
}

impl Rtl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signals: Vec::new(),
            other: None,
        }
    }

    pub fn add_signal(
        &mut self,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> SignalId {
        let id = SignalId(self.signals.len());
        self.signals.push(Signal {
            name: name.into(),
            location: location.into(),
        });
        id
    }

    pub fn signal(&self, id: SignalId) -> &Signal {
        &self.signals[id.0]
    }

    /// Signals in insertion order.
    pub fn signals(&self) -> impl Iterator<Item = (SignalId, &Signal)> {
        self.signals
            .iter()
            .enumerate()
            .map(|(i, s)| (SignalId(i), s))
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// The paired interface, once [`System::bind_rtl`] has run.
    pub fn other(&self) -> Option<InterfaceHandle> {
        self.other
    }

    /// Signal ids sorted by signal name. Position i of the paired
    /// interface's pins corresponds to position i of this ordering.
    pub fn sorted_by_name(&self) -> Vec<SignalId> {
        let mut ids: Vec<SignalId> = (0..self.signals.len()).map(SignalId).collect();
        ids.sort_by(|a, b| self.signals[a.0].name.cmp(&self.signals[b.0].name));
        ids
    }
}

/// The root of the model: a named assembly of boards and rtl groups.
#[derive(Debug, Default)]
pub struct System {
    pub name: String,
    boards: Vec<Board>,
    rtls: Vec<Rtl>,
}

impl System {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boards: Vec::new(),
            rtls: Vec::new(),
        }
    }

    // ---- boards ----

    /// Add a board. Its `identifier` must be unique within the system;
    /// adding a board whose identifier is already present fails.
    pub fn add_board(&mut self, board: Board) -> Result<BoardId> {
        if self.boards.iter().any(|b| b.identifier == board.identifier) {
            return Err(BoardnetError::AlreadyOwned {
                scope: "board",
                name: board.identifier,
                owner: "system",
            });
        }
        let id = BoardId(self.boards.len());
        self.boards.push(board);
        Ok(id)
    }

    /// Look up a board by identifier.
    pub fn get_board(&self, identifier: &str) -> Result<BoardId> {
        self.boards
            .iter()
            .position(|b| b.identifier == identifier)
            .map(BoardId)
            .ok_or_else(|| BoardnetError::not_found("board", identifier))
    }

    pub fn board(&self, id: BoardId) -> &Board {
        &self.boards[id.0]
    }

    pub fn board_mut(&mut self, id: BoardId) -> &mut Board {
        &mut self.boards[id.0]
    }

    /// Boards in insertion order.
    pub fn boards(&self) -> impl Iterator<Item = (BoardId, &Board)> {
        self.boards.iter().enumerate().map(|(i, b)| (BoardId(i), b))
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    // ---- rtl groups ----

    /// Add an off-board signal group. Its name must be unique within the
    /// system.
    pub fn add_rtl(&mut self, rtl: Rtl) -> Result<RtlId> {
        if self.rtls.iter().any(|r| r.name == rtl.name) {
            return Err(BoardnetError::AlreadyOwned {
                scope: "rtl",
                name: rtl.name,
                owner: "system",
            });
        }
        let id = RtlId(self.rtls.len());
        self.rtls.push(rtl);
        Ok(id)
    }

    /// Look up an rtl group by name.
    pub fn get_rtl(&self, name: &str) -> Result<RtlId> {
        self.rtls
            .iter()
            .position(|r| r.name == name)
            .map(RtlId)
            .ok_or_else(|| BoardnetError::not_found("rtl", name))
    }

    pub fn rtl(&self, id: RtlId) -> &Rtl {
        &self.rtls[id.0]
    }

    /// Rtl groups in insertion order.
    pub fn rtls(&self) -> impl Iterator<Item = (RtlId, &Rtl)> {
        self.rtls.iter().enumerate().map(|(i, r)| (RtlId(i), r))
    }

    // ---- pairing ----

    fn interface_at(&self, handle: InterfaceHandle) -> Result<&Interface> {
        self.boards
            .get(handle.board.0)
            .and_then(|b| b.try_interface(handle.interface))
            .ok_or(BoardnetError::Malformed {
                what: "interface handle",
            })
    }

    /// Pair two interfaces on different boards, pin-for-pin.
    ///
    /// Fails if either side is already paired, if the pin counts differ, or
    /// if both handles point into the same board. On success `a.other == b`
    /// and `b.other == a`.
    pub fn mate(&mut self, a: InterfaceHandle, b: InterfaceHandle) -> Result<()> {
        let ia = self.interface_at(a)?;
        let ib = self.interface_at(b)?;

        if a.board == b.board {
            return Err(BoardnetError::cross_board(format!(
                "interfaces '{}' and '{}' are on the same board",
                ia.name(),
                ib.name()
            )));
        }
        if ia.other().is_some() {
            return Err(BoardnetError::AlreadyPaired {
                name: ia.name().to_string(),
            });
        }
        if ib.other().is_some() {
            return Err(BoardnetError::AlreadyPaired {
                name: ib.name().to_string(),
            });
        }
        if ia.pins().len() != ib.pins().len() {
            return Err(BoardnetError::ArityMismatch {
                left: ia.name().to_string(),
                left_count: ia.pins().len(),
                right: ib.name().to_string(),
                right_count: ib.pins().len(),
            });
        }

        self.boards[a.board.0].set_interface_other(a.interface, Peer::Interface(b));
        self.boards[b.board.0].set_interface_other(b.interface, Peer::Interface(a));
        Ok(())
    }

    /// Pair a board interface with an off-board signal group.
    ///
    /// Fails if either side is already paired or if the interface's pin
    /// count differs from the group's signal count. Position i of the
    /// interface's pins corresponds to position i of the group's
    /// name-sorted signals.
    pub fn bind_rtl(&mut self, iface: InterfaceHandle, rtl: RtlId) -> Result<()> {
        let i = self.interface_at(iface)?;
        let r = self.rtls.get(rtl.0).ok_or(BoardnetError::Malformed {
            what: "rtl id",
        })?;

        if i.other().is_some() {
            return Err(BoardnetError::AlreadyPaired {
                name: i.name().to_string(),
            });
        }
        if r.other.is_some() {
            return Err(BoardnetError::AlreadyPaired {
                name: r.name.clone(),
            });
        }
        if i.pins().len() != r.signal_count() {
            return Err(BoardnetError::ArityMismatch {
                left: i.name().to_string(),
                left_count: i.pins().len(),
                right: r.name.clone(),
                right_count: r.signal_count(),
            });
        }

        self.boards[iface.board.0].set_interface_other(iface.interface, Peer::Rtl(rtl));
        self.rtls[rtl.0].other = Some(iface);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Peer;

    fn board(identifier: &str, iface_pins: usize) -> Board {
        let mut b = Board::new();
        b.name = identifier.to_string();
        b.identifier = identifier.to_string();
        let j1 = b.add_component("J1", "HDR").unwrap();
        let iface = b.add_interface("hdr").unwrap();
        for n in 0..iface_pins {
            let p = b.add_pin(j1, (n + 1).to_string(), format!("P{n}")).unwrap();
            b.interface_add_pin(iface, p).unwrap();
        }
        b
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let mut system = System::new("sys");
        system.add_board(board("alpha", 2)).unwrap();
        let err = system.add_board(board("alpha", 2)).unwrap_err();
        assert!(matches!(err, BoardnetError::AlreadyOwned { .. }));
    }

    #[test]
    fn test_mate_is_symmetric() {
        let mut system = System::new("sys");
        let a = system.add_board(board("alpha", 3)).unwrap();
        let b = system.add_board(board("beta", 3)).unwrap();
        let ha = InterfaceHandle::new(a, system.board(a).get_interface("hdr").unwrap());
        let hb = InterfaceHandle::new(b, system.board(b).get_interface("hdr").unwrap());

        system.mate(ha, hb).unwrap();

        assert_eq!(
            system.board(a).interface(ha.interface).other(),
            Some(Peer::Interface(hb))
        );
        assert_eq!(
            system.board(b).interface(hb.interface).other(),
            Some(Peer::Interface(ha))
        );
    }

    #[test]
    fn test_mate_arity_mismatch() {
        let mut system = System::new("sys");
        let a = system.add_board(board("alpha", 3)).unwrap();
        let b = system.add_board(board("beta", 4)).unwrap();
        let ha = InterfaceHandle::new(a, system.board(a).get_interface("hdr").unwrap());
        let hb = InterfaceHandle::new(b, system.board(b).get_interface("hdr").unwrap());

        let err = system.mate(ha, hb).unwrap_err();
        assert!(matches!(err, BoardnetError::ArityMismatch { .. }));
    }

    #[test]
    fn test_mate_twice_fails() {
        let mut system = System::new("sys");
        let a = system.add_board(board("alpha", 2)).unwrap();
        let b = system.add_board(board("beta", 2)).unwrap();
        let c = system.add_board(board("gamma", 2)).unwrap();
        let ha = InterfaceHandle::new(a, system.board(a).get_interface("hdr").unwrap());
        let hb = InterfaceHandle::new(b, system.board(b).get_interface("hdr").unwrap());
        let hc = InterfaceHandle::new(c, system.board(c).get_interface("hdr").unwrap());

        system.mate(ha, hb).unwrap();
        let err = system.mate(ha, hc).unwrap_err();
        assert!(matches!(err, BoardnetError::AlreadyPaired { .. }));
    }

    #[test]
    fn test_pins_frozen_after_pairing() {
        let mut system = System::new("sys");
        let a = system.add_board(board("alpha", 2)).unwrap();
        let b = system.add_board(board("beta", 2)).unwrap();
        let ha = InterfaceHandle::new(a, system.board(a).get_interface("hdr").unwrap());
        let hb = InterfaceHandle::new(b, system.board(b).get_interface("hdr").unwrap());
        system.mate(ha, hb).unwrap();

        let alpha = system.board_mut(a);
        let j1 = alpha.get_component("J1").unwrap();
        let extra = alpha.add_pin(j1, "99", "EXTRA").unwrap();
        let err = alpha.interface_add_pin(ha.interface, extra).unwrap_err();
        assert!(matches!(err, BoardnetError::AlreadyPaired { .. }));
    }

    #[test]
    fn test_bind_rtl() {
        let mut system = System::new("sys");
        let a = system.add_board(board("alpha", 2)).unwrap();
        let ha = InterfaceHandle::new(a, system.board(a).get_interface("hdr").unwrap());

        let mut fpga = Rtl::new("fpga");
        fpga.add_signal("uart_tx", "A7");
        fpga.add_signal("uart_rx", "B2");
        let r = system.add_rtl(fpga).unwrap();

        system.bind_rtl(ha, r).unwrap();
        assert_eq!(system.rtl(r).other(), Some(ha));
        assert_eq!(
            system.board(a).interface(ha.interface).other(),
            Some(Peer::Rtl(r))
        );

        // One-shot: a second bind fails
        let mut other = Rtl::new("fpga2");
        other.add_signal("x", "C1");
        other.add_signal("y", "C2");
        let r2 = system.add_rtl(other).unwrap();
        let err = system.bind_rtl(ha, r2).unwrap_err();
        assert!(matches!(err, BoardnetError::AlreadyPaired { .. }));
    }

    #[test]
    fn test_sorted_by_name() {
        let mut rtl = Rtl::new("fpga");
        rtl.add_signal("clk", "B1");
        rtl.add_signal("adc", "C4");
        rtl.add_signal("rst", "A2");
        let order: Vec<&str> = rtl
            .sorted_by_name()
            .into_iter()
            .map(|id| rtl.signal(id).name())
            .collect();
        assert_eq!(order, vec!["adc", "clk", "rst"]);
    }
}
