//! JSON export of a system and its resolved nets.
//!
//! Every entity is emitted into one flat map keyed by its stable id, with
//! cross-references by key, so downstream tooling can join entities without
//! re-walking the graph. Entities appear in the fixed depth-first traversal
//! order, which makes the output deterministic for an unmodified system.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::error::{BoardnetError, Result};
use crate::model::{depth_first, BoardId, ComponentId, Entity, Peer, PinId, System};
use crate::nets::{NetElement, NetMap};

fn component_key(board: BoardId, component: ComponentId) -> String {
    format!("{board}.{component}")
}

fn pin_key(board: BoardId, pin: PinId) -> String {
    format!("{board}.{pin}")
}

fn element_key(element: NetElement) -> String {
    element.to_string()
}

fn net_key(id: usize) -> String {
    format!("n{id}")
}

fn peer_key(peer: Peer) -> String {
    match peer {
        Peer::Interface(h) => h.to_string(),
        Peer::Rtl(r) => r.to_string(),
    }
}

/// Serialize a system plus its resolved net map into one JSON document.
pub fn to_json(system: &System, nets: &NetMap) -> Result<Value> {
    let mut models = Map::new();

    for entity in depth_first(system) {
        match entity {
            Entity::System(sys) => {
                models.insert(
                    "system".to_string(),
                    json!({
                        "kind": "system",
                        "name": sys.name,
                        "boards": sys.boards().map(|(id, _)| id.to_string()).collect::<Vec<_>>(),
                        "rtls": sys.rtls().map(|(id, _)| id.to_string()).collect::<Vec<_>>(),
                        "nets": nets.nets().map(|n| net_key(n.id())).collect::<Vec<_>>(),
                    }),
                );
            }
            Entity::Board(bid, board) => {
                models.insert(
                    bid.to_string(),
                    json!({
                        "kind": "board",
                        "name": board.name,
                        "identifier": board.identifier,
                        "parent": "system",
                        "components": board
                            .components()
                            .map(|(cid, _)| component_key(bid, cid))
                            .collect::<Vec<_>>(),
                        "wires": board
                            .wires()
                            .map(|(wid, _)| element_key(NetElement::wire(bid, wid)))
                            .collect::<Vec<_>>(),
                        "interfaces": board
                            .interfaces()
                            .map(|(iid, _)| format!("{bid}.{iid}"))
                            .collect::<Vec<_>>(),
                    }),
                );
            }
            Entity::Component(bid, cid, component) => {
                let model: Vec<[String; 2]> = if component.ignore_model {
                    Vec::new()
                } else {
                    component
                        .model()
                        .iter()
                        .map(|&(a, b)| [pin_key(bid, a), pin_key(bid, b)])
                        .collect()
                };
                models.insert(
                    component_key(bid, cid),
                    json!({
                        "kind": "component",
                        "refdes": component.refdes(),
                        "package": component.package(),
                        "symbol": component.symbol,
                        "value": component.value,
                        "class": component.class,
                        "parent": bid.to_string(),
                        "pins": component
                            .pins()
                            .iter()
                            .map(|&pid| pin_key(bid, pid))
                            .collect::<Vec<_>>(),
                        "model": model,
                    }),
                );
            }
            Entity::Pin(bid, pid, pin) => {
                models.insert(
                    pin_key(bid, pid),
                    json!({
                        "kind": "pin",
                        "number": pin.number(),
                        "name": pin.name(),
                        "parent": component_key(bid, pin.component()),
                        "wire": pin.wire().map(|wid| element_key(NetElement::wire(bid, wid))),
                        "interfaces": pin
                            .interfaces()
                            .iter()
                            .map(|iid| format!("{bid}.{iid}"))
                            .collect::<Vec<_>>(),
                    }),
                );
            }
            Entity::Wire(bid, wid, wire) => {
                let net = nets.resolve_wire(bid, wid)?;
                models.insert(
                    element_key(NetElement::wire(bid, wid)),
                    json!({
                        "kind": "wire",
                        "name": wire.name(),
                        "type": wire.kind,
                        "parent": bid.to_string(),
                        "pins": wire
                            .pins()
                            .iter()
                            .map(|&pid| pin_key(bid, pid))
                            .collect::<Vec<_>>(),
                        "net": net_key(net.id()),
                    }),
                );
            }
            Entity::Interface(bid, iid, interface) => {
                models.insert(
                    format!("{bid}.{iid}"),
                    json!({
                        "kind": "interface",
                        "name": interface.name(),
                        "parent": bid.to_string(),
                        "other": interface.other().map(peer_key),
                        "pins": interface
                            .pins()
                            .iter()
                            .map(|&pid| pin_key(bid, pid))
                            .collect::<Vec<_>>(),
                    }),
                );
            }
            Entity::Rtl(rid, rtl) => {
                models.insert(
                    rid.to_string(),
                    json!({
                        "kind": "rtl",
                        "name": rtl.name,
                        "parent": "system",
                        "other": rtl.other().map(|h| h.to_string()),
                        "signals": rtl
                            .signals()
                            .map(|(sid, _)| element_key(NetElement::signal(rid, sid)))
                            .collect::<Vec<_>>(),
                    }),
                );
            }
            Entity::Signal(rid, sid, signal) => {
                let net = nets.resolve_signal(rid, sid)?;
                models.insert(
                    element_key(NetElement::signal(rid, sid)),
                    json!({
                        "kind": "signal",
                        "name": signal.name(),
                        "location": signal.location(),
                        "parent": rid.to_string(),
                        "net": net_key(net.id()),
                    }),
                );
            }
        }
    }

    for net in nets.nets() {
        models.insert(
            net_key(net.id()),
            json!({
                "kind": "net",
                "members": net
                    .members()
                    .iter()
                    .map(|&el| element_key(el))
                    .collect::<Vec<_>>(),
            }),
        );
    }

    Ok(json!({ "root": "system", "models": models }))
}

/// Write the JSON export to a file.
pub fn write_json(system: &System, nets: &NetMap, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let doc = to_json(system, nets)?;
    let text = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, text).map_err(|e| BoardnetError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
