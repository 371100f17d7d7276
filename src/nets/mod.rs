//! Net resolution: computing electrical equivalence classes.
//!
//! A [`NetMap`] is an eager snapshot built from a [`System`]: every wire on
//! every board (and every off-board signal) is seeded as its own set, then
//! interface pairings and component internal-short models merge sets subject
//! to the domain rules:
//!
//! - a No-Connect wire never merges with a non-NC wire (NC↔NC is fine);
//! - off-board pairings merge pins against the group's name-sorted signals;
//! - component models never merge across an NC boundary, never touch a
//!   DC-classified wire, and are suppressed entirely by `ignore_model`.
//!
//! Mutating the system after a map is built does not update the map; build a
//! new one.

mod union;

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{BoardnetError, Result};
use crate::model::{BoardId, Peer, RtlId, SignalId, System, WireId, WireKind};

use union::UnionFind;

/// One element of the net map: a board wire or an off-board signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetElement {
    Wire { board: BoardId, wire: WireId },
    Signal { rtl: RtlId, signal: SignalId },
}

impl NetElement {
    pub fn wire(board: BoardId, wire: WireId) -> Self {
        Self::Wire { board, wire }
    }

    pub fn signal(rtl: RtlId, signal: SignalId) -> Self {
        Self::Signal { rtl, signal }
    }
}

impl fmt::Display for NetElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetElement::Wire { board, wire } => write!(f, "{}.{}", board, wire),
            NetElement::Signal { rtl, signal } => write!(f, "{}.{}", rtl, signal),
        }
    }
}

/// A maximal set of wires and signals that are electrically the same node.
#[derive(Debug)]
pub struct Net {
    id: usize,
    members: Vec<NetElement>,
}

impl Net {
    /// Zero-based net number, stable for an unmodified system.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Members in the fixed element enumeration order.
    pub fn members(&self) -> &[NetElement] {
        &self.members
    }
}

/// Read-only map from every wire and signal of a system to its net.
#[derive(Debug)]
pub struct NetMap {
    nets: Vec<Net>,
    index: HashMap<NetElement, usize>,
}

impl NetMap {
    /// Resolve nets for a system snapshot.
    pub fn build(system: &System) -> NetMap {
        // Seed one singleton per wire and per signal, in the fixed
        // enumeration order that also determines net numbering.
        let mut elements = Vec::new();
        let mut dense: HashMap<NetElement, usize> = HashMap::new();
        for (bid, board) in system.boards() {
            for (wid, _) in board.wires() {
                let el = NetElement::wire(bid, wid);
                dense.insert(el, elements.len());
                elements.push(el);
            }
        }
        for (rid, rtl) in system.rtls() {
            for (sid, _) in rtl.signals() {
                let el = NetElement::signal(rid, sid);
                dense.insert(el, elements.len());
                elements.push(el);
            }
        }

        let mut uf = UnionFind::new(elements.len());

        for (bid, board) in system.boards() {
            // Interface pairings: pin-for-pin positional merges
            for (iid, iface) in board.interfaces() {
                match iface.other() {
                    Some(Peer::Interface(peer)) => {
                        // Each mated pair appears on both boards; handle the
                        // edge from its lower endpoint only
                        if (bid.0, iid.0) > (peer.board.0, peer.interface.0) {
                            continue;
                        }
                        let other = system.board(peer.board);
                        let peer_pins = other.interface(peer.interface).pins();
                        for (i, &pa) in iface.pins().iter().enumerate() {
                            let pb = peer_pins[i];
                            let (wa, wb) = match (board.pin(pa).wire(), other.pin(pb).wire()) {
                                (Some(wa), Some(wb)) => (wa, wb),
                                _ => continue,
                            };
                            let nc_a = board.wire(wa).kind == WireKind::NoConnect;
                            let nc_b = other.wire(wb).kind == WireKind::NoConnect;
                            if nc_a != nc_b {
                                continue;
                            }
                            uf.union(
                                dense[&NetElement::wire(bid, wa)],
                                dense[&NetElement::wire(peer.board, wb)],
                            );
                        }
                    }
                    Some(Peer::Rtl(rid)) => {
                        // Position i of the interface corresponds to the
                        // i-th name-sorted signal; signals carry no NC
                        // classification, so no exception applies
                        let sorted = system.rtl(rid).sorted_by_name();
                        for (i, &pa) in iface.pins().iter().enumerate() {
                            let Some(wa) = board.pin(pa).wire() else {
                                continue;
                            };
                            uf.union(
                                dense[&NetElement::wire(bid, wa)],
                                dense[&NetElement::signal(rid, sorted[i])],
                            );
                        }
                    }
                    None => {}
                }
            }

            // Component models: declared internal shorts
            for (_, component) in board.components() {
                if component.ignore_model {
                    continue;
                }
                for &(pa, pb) in component.model() {
                    let (wa, wb) = match (board.pin(pa).wire(), board.pin(pb).wire()) {
                        (Some(wa), Some(wb)) => (wa, wb),
                        _ => continue,
                    };
                    let ka = board.wire(wa).kind;
                    let kb = board.wire(wb).kind;
                    if (ka == WireKind::NoConnect) != (kb == WireKind::NoConnect) {
                        continue;
                    }
                    // A model must never bridge a static rail into a logic net
                    if ka == WireKind::Dc || kb == WireKind::Dc {
                        continue;
                    }
                    uf.union(
                        dense[&NetElement::wire(bid, wa)],
                        dense[&NetElement::wire(bid, wb)],
                    );
                }
            }
        }

        // Number equivalence classes on first sight, in enumeration order
        let mut nets: Vec<Net> = Vec::new();
        let mut net_of_root: HashMap<usize, usize> = HashMap::new();
        let mut index: HashMap<NetElement, usize> = HashMap::new();
        for (i, &el) in elements.iter().enumerate() {
            let root = uf.find(i);
            let id = *net_of_root.entry(root).or_insert_with(|| {
                let id = nets.len();
                nets.push(Net {
                    id,
                    members: Vec::new(),
                });
                id
            });
            nets[id].members.push(el);
            index.insert(el, id);
        }

        debug!(
            elements = elements.len(),
            nets = nets.len(),
            "resolved nets"
        );
        NetMap { nets, index }
    }

    /// All nets, ordered by id.
    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter()
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    /// Resolve an element to its net. Fails for elements that were not part
    /// of the system this map was built from.
    pub fn resolve(&self, element: NetElement) -> Result<&Net> {
        self.index
            .get(&element)
            .map(|&id| &self.nets[id])
            .ok_or_else(|| BoardnetError::NotInNetMap {
                element: element.to_string(),
            })
    }

    /// Resolve a board wire to its net.
    pub fn resolve_wire(&self, board: BoardId, wire: WireId) -> Result<&Net> {
        self.resolve(NetElement::wire(board, wire))
    }

    /// Resolve an off-board signal to its net.
    pub fn resolve_signal(&self, rtl: RtlId, signal: SignalId) -> Result<&Net> {
        self.resolve(NetElement::signal(rtl, signal))
    }
}
