//! Board-level connectivity graph.
//!
//! A board owns flat arenas of its components, pins, wires and interfaces.
//! Relationships are stored as ids into those arenas, so the back-references
//! the model needs (pin → wire, pin → interfaces, wire → pins) are plain
//! index fields. Every mutating operation validates first and links both
//! sides of the relationship, or fails without partial mutation.

use crate::error::{BoardnetError, Result};

use super::types::{ComponentClass, ComponentId, InterfaceId, Peer, PinId, WireId, WireKind};

/// A physical part placed on a board, identified by its refdes.
#[derive(Debug)]
pub struct Component {
    refdes: String,
    package: String,
    /// Schematic symbol / device name, when the source format provides one.
    pub symbol: Option<String>,
    /// Part value (e.g. "10k"), when the source format provides one.
    pub value: Option<String>,
    pub class: ComponentClass,
    /// When set, the internal shorts in `model` are ignored by net resolution.
    pub ignore_model: bool,
    pub(crate) pins: Vec<PinId>,
    pub(crate) model: Vec<(PinId, PinId)>,
}

impl Component {
    pub fn refdes(&self) -> &str {
        &self.refdes
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Pins in creation order.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Internally-shorted pin pairs, in assignment order.
    pub fn model(&self) -> &[(PinId, PinId)] {
        &self.model
    }
}

/// A single pin of a component. Carries at most one wire connection and may
/// be a member of any number of interfaces.
#[derive(Debug)]
pub struct Pin {
    number: String,
    name: String,
    component: ComponentId,
    pub(crate) wire: Option<WireId>,
    pub(crate) interfaces: Vec<InterfaceId>,
}

impl Pin {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn wire(&self) -> Option<WireId> {
        self.wire
    }

    pub fn interfaces(&self) -> &[InterfaceId] {
        &self.interfaces
    }
}

/// A named electrical conductor within one board.
#[derive(Debug)]
pub struct Wire {
    name: String,
    pub kind: WireKind,
    pub(crate) pins: Vec<PinId>,
}

impl Wire {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connected pins, in connection order.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }
}

/// A named, ordered set of a board's pins intended to mate with another
/// board's interface or an off-board signal group. Pin insertion order is the
/// positional contract used for pairing.
#[derive(Debug)]
pub struct Interface {
    name: String,
    pub(crate) pins: Vec<PinId>,
    pub(crate) other: Option<Peer>,
}

impl Interface {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// The paired side, once [`System::mate`](crate::model::System::mate) or
    /// [`System::bind_rtl`](crate::model::System::bind_rtl) has run.
    pub fn other(&self) -> Option<Peer> {
        self.other
    }
}

/// One physical PCB's component/wire/interface graph.
#[derive(Debug, Default)]
pub struct Board {
    /// Display name (from the source tool's drawing name).
    pub name: String,
    /// Unique identifier within a system, used for cross-references and file
    /// naming. Distinct from `name`: several boards may share a drawing.
    pub identifier: String,
    components: Vec<Component>,
    pins: Vec<Pin>,
    wires: Vec<Wire>,
    interfaces: Vec<Interface>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- components ----

    /// Add a component. Fails if the refdes is already taken on this board.
    pub fn add_component(
        &mut self,
        refdes: impl Into<String>,
        package: impl Into<String>,
    ) -> Result<ComponentId> {
        let refdes = refdes.into();
        if self.find_component(&refdes).is_some() {
            return Err(BoardnetError::redefinition("component", refdes));
        }
        let id = ComponentId(self.components.len());
        self.components.push(Component {
            refdes,
            package: package.into(),
            symbol: None,
            value: None,
            class: ComponentClass::Default,
            ignore_model: false,
            pins: Vec::new(),
            model: Vec::new(),
        });
        Ok(id)
    }

    /// Look up a component by refdes.
    pub fn get_component(&self, refdes: &str) -> Result<ComponentId> {
        self.find_component(refdes)
            .ok_or_else(|| BoardnetError::not_found("component", refdes))
    }

    fn find_component(&self, refdes: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|c| c.refdes == refdes)
            .map(ComponentId)
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0]
    }

    pub fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id.0]
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    /// Assign the component's internal-short model. Each pair names two pin
    /// numbers of the component; unknown numbers fail the whole assignment.
    pub fn set_model(&mut self, component: ComponentId, pairs: &[(&str, &str)]) -> Result<()> {
        if component.0 >= self.components.len() {
            return Err(BoardnetError::Malformed {
                what: "component id",
            });
        }
        let mut model = Vec::with_capacity(pairs.len());
        for (a, b) in pairs {
            let pa = self.get_pin(component, a).map_err(|_| {
                BoardnetError::UnknownModelPin {
                    refdes: self.component(component).refdes.clone(),
                    pin: (*a).to_string(),
                }
            })?;
            let pb = self.get_pin(component, b).map_err(|_| {
                BoardnetError::UnknownModelPin {
                    refdes: self.component(component).refdes.clone(),
                    pin: (*b).to_string(),
                }
            })?;
            model.push((pa, pb));
        }
        self.components[component.0].model = model;
        Ok(())
    }

    // ---- pins ----

    /// Add a pin to a component. Fails if the component already has a pin
    /// with this number.
    pub fn add_pin(
        &mut self,
        component: ComponentId,
        number: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<PinId> {
        let number = number.into();
        let owner = self
            .components
            .get(component.0)
            .ok_or(BoardnetError::Malformed {
                what: "component id",
            })?;
        if owner
            .pins
            .iter()
            .any(|&p| self.pins[p.0].number == number)
        {
            return Err(BoardnetError::redefinition("pin", number));
        }
        let id = PinId(self.pins.len());
        self.pins.push(Pin {
            number,
            name: name.into(),
            component,
            wire: None,
            interfaces: Vec::new(),
        });
        self.components[component.0].pins.push(id);
        Ok(id)
    }

    /// Look up a pin of a component by pin number.
    pub fn get_pin(&self, component: ComponentId, number: &str) -> Result<PinId> {
        self.components
            .get(component.0)
            .ok_or(BoardnetError::Malformed {
                what: "component id",
            })?
            .pins
            .iter()
            .copied()
            .find(|&p| self.pins[p.0].number == number)
            .ok_or_else(|| BoardnetError::not_found("pin", number))
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.0]
    }

    /// All pins of the board, in creation order.
    pub fn pins(&self) -> impl Iterator<Item = (PinId, &Pin)> {
        self.pins.iter().enumerate().map(|(i, p)| (PinId(i), p))
    }

    // ---- wires ----

    /// Add a wire. Fails if the name is already taken on this board.
    pub fn add_wire(&mut self, name: impl Into<String>) -> Result<WireId> {
        let name = name.into();
        if self.find_wire(&name).is_some() {
            return Err(BoardnetError::redefinition("wire", name));
        }
        let id = WireId(self.wires.len());
        self.wires.push(Wire {
            name,
            kind: WireKind::Default,
            pins: Vec::new(),
        });
        Ok(id)
    }

    /// Look up a wire by name.
    pub fn get_wire(&self, name: &str) -> Result<WireId> {
        self.find_wire(name)
            .ok_or_else(|| BoardnetError::not_found("wire", name))
    }

    fn find_wire(&self, name: &str) -> Option<WireId> {
        self.wires.iter().position(|w| w.name == name).map(WireId)
    }

    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id.0]
    }

    pub fn wire_mut(&mut self, id: WireId) -> &mut Wire {
        &mut self.wires[id.0]
    }

    /// Wires in insertion order.
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter().enumerate().map(|(i, w)| (WireId(i), w))
    }

    /// Connect a pin to a wire. The pin must not already carry a connection;
    /// a duplicate connect attempt is an error, not a no-op.
    pub fn connect(&mut self, wire: WireId, pin: PinId) -> Result<()> {
        if wire.0 >= self.wires.len() {
            return Err(BoardnetError::Malformed { what: "wire id" });
        }
        let p = self.pins.get(pin.0).ok_or(BoardnetError::Malformed {
            what: "pin id",
        })?;
        if let Some(existing) = p.wire {
            return Err(BoardnetError::PinAlreadyConnected {
                pin: p.number.clone(),
                wire: self.wires[existing.0].name.clone(),
            });
        }
        self.pins[pin.0].wire = Some(wire);
        self.wires[wire.0].pins.push(pin);
        Ok(())
    }

    // ---- interfaces ----

    /// Add an interface. Fails if the name is already taken on this board.
    pub fn add_interface(&mut self, name: impl Into<String>) -> Result<InterfaceId> {
        let name = name.into();
        if self.find_interface(&name).is_some() {
            return Err(BoardnetError::redefinition("interface", name));
        }
        let id = InterfaceId(self.interfaces.len());
        self.interfaces.push(Interface {
            name,
            pins: Vec::new(),
            other: None,
        });
        Ok(id)
    }

    /// Look up an interface by name.
    pub fn get_interface(&self, name: &str) -> Result<InterfaceId> {
        self.find_interface(name)
            .ok_or_else(|| BoardnetError::not_found("interface", name))
    }

    fn find_interface(&self, name: &str) -> Option<InterfaceId> {
        self.interfaces
            .iter()
            .position(|i| i.name == name)
            .map(InterfaceId)
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.interfaces[id.0]
    }

    /// Interfaces in insertion order.
    pub fn interfaces(&self) -> impl Iterator<Item = (InterfaceId, &Interface)> {
        self.interfaces
            .iter()
            .enumerate()
            .map(|(i, x)| (InterfaceId(i), x))
    }

    pub(crate) fn try_interface(&self, id: InterfaceId) -> Option<&Interface> {
        self.interfaces.get(id.0)
    }

    pub(crate) fn set_interface_other(&mut self, id: InterfaceId, peer: Peer) {
        self.interfaces[id.0].other = Some(peer);
    }

    /// Add a pin to an interface. The interface must not yet be paired (pin
    /// membership freezes its arity) and the pin must not already be a
    /// member.
    pub fn interface_add_pin(&mut self, interface: InterfaceId, pin: PinId) -> Result<()> {
        let iface = self
            .interfaces
            .get(interface.0)
            .ok_or(BoardnetError::Malformed {
                what: "interface id",
            })?;
        if iface.other.is_some() {
            return Err(BoardnetError::AlreadyPaired {
                name: iface.name.clone(),
            });
        }
        let p = self.pins.get(pin.0).ok_or(BoardnetError::Malformed {
            what: "pin id",
        })?;
        if iface.pins.contains(&pin) {
            return Err(BoardnetError::redefinition(
                "interface pin",
                p.number.clone(),
            ));
        }
        self.interfaces[interface.0].pins.push(pin);
        self.pins[pin.0].interfaces.push(interface);
        Ok(())
    }
}
