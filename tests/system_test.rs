//! End-to-end test: read one board from a netlist export, build a second
//! board and an off-board device through the model API, mate them, and check
//! the resolved connectivity.

use boardnet::model::{ComponentClass, InterfaceHandle, Rtl, WireKind};
use boardnet::netlist::NetlistReader;
use boardnet::nets::NetMap;
use boardnet::{export, Board, System};

const PSTCHIP: &str = "\
FILE_TYPE = LIBRARY_PARTS ;
PRIMITIVE
'RES_10K';
PIN
'A':
PIN_NUMBER='(1)';
'B':
PIN_NUMBER='(2)';
END_PIN;
BODY
PART_NAME='RES_10K';
JEDEC_TYPE='0603';
END_BODY;
END_PRIMITIVE;
PRIMITIVE
'HDR4';
PIN
'P1':
PIN_NUMBER='(1)';
'P2':
PIN_NUMBER='(2)';
'P3':
PIN_NUMBER='(3)';
'P4':
PIN_NUMBER='(4)';
END_PIN;
BODY
PART_NAME='HDR4';
JEDEC_TYPE='HDR1X4';
END_BODY;
END_PRIMITIVE;
END.
";

const PSTXPRT: &str = "\
FILE_TYPE = EXPANDEDPARTLIST ;
DIRECTIVES
PST_VERSION='PST_HDL_CENTRIC_VERSION_0';
ROOT_DRAWING='carrier';
POST_TIME='Feb 11 10:00:00 2024';
SOURCE_TOOL='CAPTURE';
END_DIRECTIVES;
PART_NAME
R1 'RES_10K':;
PART_NAME
J1 'HDR4':;
END.
";

const PSTXNET: &str = "\
FILE_TYPE = EXPANDEDNETLIST ;
NET_NAME
'VCC'
'@carrier.vcc':;
NODE_NAME R1 1
'carrier':'A':;
NET_NAME
'DATA'
'@carrier.data':;
NODE_NAME R1 2
'carrier':'B':;
NODE_NAME J1 1
'carrier':'P1':;
NET_NAME
'GND'
'@carrier.gnd':;
NODE_NAME J1 2
'carrier':'P2':;
NET_NAME
'TX'
'@carrier.tx':;
NODE_NAME J1 3
'carrier':'P3':;
NET_NAME
'RX'
'@carrier.rx':;
NODE_NAME J1 4
'carrier':'P4':;
END.
";

/// The carrier board as read from the three-file export, with its edge
/// connector exposed as an interface and its pull-up marked up.
fn carrier_board() -> Board {
    let mut reader = NetlistReader::new();
    for text in [PSTCHIP, PSTXPRT, PSTXNET] {
        reader.read_str(text).unwrap();
    }
    let mut board = reader.into_board();
    board.identifier = "carrier".to_string();

    let vcc = board.get_wire("VCC").unwrap();
    board.wire_mut(vcc).kind = WireKind::Dc;

    let r1 = board.get_component("R1").unwrap();
    board.set_model(r1, &[("1", "2")]).unwrap();
    board.component_mut(r1).class = ComponentClass::Discrete;

    let j1 = board.get_component("J1").unwrap();
    board.component_mut(j1).class = ComponentClass::Connector;
    let edge = board.add_interface("edge").unwrap();
    for number in ["1", "2", "3", "4"] {
        let pin = board.get_pin(j1, number).unwrap();
        board.interface_add_pin(edge, pin).unwrap();
    }
    board
}

/// A shield board built directly through the model API: an edge connector
/// mirroring the carrier's, one wire per pin, and a two-pin device exposed
/// to an off-board controller. The RX wire is intentionally unconnected.
fn shield_board() -> Board {
    let mut board = Board::new();
    board.name = "shield".to_string();
    board.identifier = "shield".to_string();

    let j1 = board.add_component("J1", "HDR1X4").unwrap();
    board.component_mut(j1).class = ComponentClass::Connector;
    let edge = board.add_interface("edge").unwrap();
    for (number, net) in [("1", "S_DATA"), ("2", "S_GND"), ("3", "S_TX"), ("4", "S_RX")] {
        let pin = board.add_pin(j1, number, format!("P{number}")).unwrap();
        let wire = board.add_wire(net).unwrap();
        board.connect(wire, pin).unwrap();
        board.interface_add_pin(edge, pin).unwrap();
    }
    let s_rx = board.get_wire("S_RX").unwrap();
    board.wire_mut(s_rx).kind = WireKind::NoConnect;

    let u2 = board.add_component("U2", "QFN16").unwrap();
    board.component_mut(u2).class = ComponentClass::Chip;
    let fpga_io = board.add_interface("fpga_io").unwrap();
    for (number, net) in [("1", "S_TX"), ("2", "S_DATA")] {
        let pin = board.add_pin(u2, number, format!("IO{number}")).unwrap();
        let wire = board.get_wire(net).unwrap();
        board.connect(wire, pin).unwrap();
        board.interface_add_pin(fpga_io, pin).unwrap();
    }
    board
}

fn assembled() -> System {
    let mut system = System::new("assembly");
    let carrier = system.add_board(carrier_board()).unwrap();
    let shield = system.add_board(shield_board()).unwrap();

    let carrier_edge =
        InterfaceHandle::new(carrier, system.board(carrier).get_interface("edge").unwrap());
    let shield_edge =
        InterfaceHandle::new(shield, system.board(shield).get_interface("edge").unwrap());
    system.mate(carrier_edge, shield_edge).unwrap();

    let mut mcu = Rtl::new("mcu");
    mcu.add_signal("uart_tx", "B2");
    mcu.add_signal("spi_data", "A5");
    let mcu = system.add_rtl(mcu).unwrap();
    let fpga_io =
        InterfaceHandle::new(shield, system.board(shield).get_interface("fpga_io").unwrap());
    system.bind_rtl(fpga_io, mcu).unwrap();

    system
}

#[test]
fn netlist_read_counts() {
    let board = carrier_board();
    assert_eq!(board.name, "carrier");
    assert_eq!(board.components().count(), 2);
    assert_eq!(board.wires().count(), 5);
    assert_eq!(board.interfaces().count(), 1);

    let j1 = board.get_component("J1").unwrap();
    assert_eq!(board.component(j1).package(), "HDR1X4");
    assert_eq!(board.component(j1).pins().len(), 4);

    let data = board.get_wire("DATA").unwrap();
    assert_eq!(board.wire(data).pins().len(), 2);
}

#[test]
fn mated_boards_share_nets() {
    let system = assembled();
    let map = NetMap::build(&system);

    let carrier = system.get_board("carrier").unwrap();
    let shield = system.get_board("shield").unwrap();

    for (a, b) in [("DATA", "S_DATA"), ("GND", "S_GND"), ("TX", "S_TX")] {
        let wa = system.board(carrier).get_wire(a).unwrap();
        let wb = system.board(shield).get_wire(b).unwrap();
        assert_eq!(
            map.resolve_wire(carrier, wa).unwrap().id(),
            map.resolve_wire(shield, wb).unwrap().id(),
            "{a} and {b} must resolve to the same net"
        );
    }

    // Unrelated wires stay apart
    let gnd = system.board(carrier).get_wire("GND").unwrap();
    let tx = system.board(carrier).get_wire("TX").unwrap();
    assert_ne!(
        map.resolve_wire(carrier, gnd).unwrap().id(),
        map.resolve_wire(carrier, tx).unwrap().id()
    );
}

#[test]
fn nc_wire_stays_isolated() {
    let system = assembled();
    let map = NetMap::build(&system);

    let carrier = system.get_board("carrier").unwrap();
    let shield = system.get_board("shield").unwrap();
    let rx = system.board(carrier).get_wire("RX").unwrap();
    let s_rx = system.board(shield).get_wire("S_RX").unwrap();

    // Positionally mated, but exactly one side is no-connect
    assert_ne!(
        map.resolve_wire(carrier, rx).unwrap().id(),
        map.resolve_wire(shield, s_rx).unwrap().id()
    );
}

#[test]
fn dc_rail_immune_to_component_model() {
    let system = assembled();
    let map = NetMap::build(&system);

    let carrier = system.get_board("carrier").unwrap();
    let vcc = system.board(carrier).get_wire("VCC").unwrap();
    let data = system.board(carrier).get_wire("DATA").unwrap();

    // R1's model would short VCC to DATA, but VCC is a DC rail
    assert_ne!(
        map.resolve_wire(carrier, vcc).unwrap().id(),
        map.resolve_wire(carrier, data).unwrap().id()
    );

    // Once VCC is no longer DC-classified, the model applies on rebuild
    let mut system = assembled();
    let carrier = system.get_board("carrier").unwrap();
    let vcc = system.board(carrier).get_wire("VCC").unwrap();
    system.board_mut(carrier).wire_mut(vcc).kind = WireKind::Default;
    let map = NetMap::build(&system);
    let data = system.board(carrier).get_wire("DATA").unwrap();
    assert_eq!(
        map.resolve_wire(carrier, vcc).unwrap().id(),
        map.resolve_wire(carrier, data).unwrap().id()
    );
}

#[test]
fn ignore_model_removes_only_model_unions() {
    let mut system = assembled();
    let carrier = system.get_board("carrier").unwrap();
    let vcc = system.board(carrier).get_wire("VCC").unwrap();
    system.board_mut(carrier).wire_mut(vcc).kind = WireKind::Default;
    let r1 = system.board(carrier).get_component("R1").unwrap();
    system.board_mut(carrier).component_mut(r1).ignore_model = true;

    let map = NetMap::build(&system);
    let shield = system.get_board("shield").unwrap();
    let data = system.board(carrier).get_wire("DATA").unwrap();
    let s_data = system.board(shield).get_wire("S_DATA").unwrap();

    // The model-based union is gone even though nothing is DC anymore
    assert_ne!(
        map.resolve_wire(carrier, vcc).unwrap().id(),
        map.resolve_wire(carrier, data).unwrap().id()
    );
    // Interface pairing unions are unaffected
    assert_eq!(
        map.resolve_wire(carrier, data).unwrap().id(),
        map.resolve_wire(shield, s_data).unwrap().id()
    );
}

#[test]
fn rtl_signals_pair_by_sorted_name() {
    let system = assembled();
    let map = NetMap::build(&system);

    let shield = system.get_board("shield").unwrap();
    let mcu = system.get_rtl("mcu").unwrap();
    let by_name = |name: &str| {
        system
            .rtl(mcu)
            .signals()
            .find(|(_, s)| s.name() == name)
            .map(|(id, _)| id)
            .unwrap()
    };

    // fpga_io pin 0 sits on S_TX and pairs with the first name-sorted
    // signal (spi_data); pin 1 sits on S_DATA and pairs with uart_tx
    let s_tx = system.board(shield).get_wire("S_TX").unwrap();
    let s_data = system.board(shield).get_wire("S_DATA").unwrap();
    assert_eq!(
        map.resolve_wire(shield, s_tx).unwrap().id(),
        map.resolve_signal(mcu, by_name("spi_data")).unwrap().id()
    );
    assert_eq!(
        map.resolve_wire(shield, s_data).unwrap().id(),
        map.resolve_signal(mcu, by_name("uart_tx")).unwrap().id()
    );
}

#[test]
fn net_ids_are_contiguous_and_stable() {
    let system = assembled();
    let map = NetMap::build(&system);

    let ids: Vec<usize> = map.nets().map(|n| n.id()).collect();
    let expected: Vec<usize> = (0..map.len()).collect();
    assert_eq!(ids, expected);

    // Every wire and signal lands in exactly one net
    let mut elements = 0;
    for (_, board) in system.boards() {
        elements += board.wires().count();
    }
    for (_, rtl) in system.rtls() {
        elements += rtl.signals().count();
    }
    let member_total: usize = map.nets().map(|n| n.members().len()).sum();
    assert_eq!(member_total, elements);

    // An unmodified system resolves to the identical partition and ids
    let again = NetMap::build(&system);
    assert_eq!(map.len(), again.len());
    for (a, b) in map.nets().zip(again.nets()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.members(), b.members());
    }
}

#[test]
fn json_export_is_consistent() {
    let system = assembled();
    let map = NetMap::build(&system);
    let doc = export::to_json(&system, &map).unwrap();

    let models = doc["models"].as_object().unwrap();
    assert_eq!(doc["root"], "system");
    assert_eq!(models["system"]["boards"].as_array().unwrap().len(), 2);
    assert_eq!(models["system"]["rtls"].as_array().unwrap().len(), 1);

    // Every net key referenced by a wire exists in the document
    for (key, value) in models {
        if value["kind"] == "wire" {
            let net = value["net"].as_str().unwrap();
            assert!(
                models.contains_key(net),
                "wire {key} references missing {net}"
            );
        }
    }
}
