//! Stock arithmetic composites: a 1-bit full adder and a 4-bit ripple adder.

use crate::library::pin;
use crate::system::System;
use crate::template::{ComponentTemplate, InstanceTemplate, WireTemplate};

fn wire(from: &str, to: &str) -> WireTemplate {
    WireTemplate::create(from, to).expect("endpoint literals are well-formed")
}

fn full_adder_template() -> ComponentTemplate {
    ComponentTemplate {
        type_name: "full-adder".to_string(),
        input_pins: vec![pin("A", 1), pin("B", 1), pin("Cin", 1)],
        output_pins: vec![pin("S", 1), pin("Cout", 1)],
        components: vec![
            InstanceTemplate::new("xor1", "xor"),
            InstanceTemplate::new("xor2", "xor"),
            InstanceTemplate::new("and1", "and"),
            InstanceTemplate::new("and2", "and"),
            InstanceTemplate::new("or1", "or"),
        ],
        wires: vec![
            // sum: S = (A ^ B) ^ Cin
            wire("this.A", "xor1.in0"),
            wire("this.B", "xor1.in1"),
            wire("xor1.out", "xor2.in0"),
            wire("this.Cin", "xor2.in1"),
            wire("xor2.out", "this.S"),
            // carry: Cout = (A & B) | ((A ^ B) & Cin)
            wire("this.A", "and1.in0"),
            wire("this.B", "and1.in1"),
            wire("xor1.out", "and2.in0"),
            wire("this.Cin", "and2.in1"),
            wire("and1.out", "or1.in0"),
            wire("and2.out", "or1.in1"),
            wire("or1.out", "this.Cout"),
        ],
    }
}

fn four_bit_adder_template() -> ComponentTemplate {
    let mut wires = vec![
        wire("this.A", "unpackA.in"),
        wire("this.B", "unpackB.in"),
        wire("this.Cin", "fad0.Cin"),
    ];
    for i in 0..4 {
        wires.push(wire(&format!("unpackA.out{i}"), &format!("fad{i}.A")));
        wires.push(wire(&format!("unpackB.out{i}"), &format!("fad{i}.B")));
        wires.push(wire(&format!("fad{i}.S"), &format!("packS.in{i}")));
        if i < 3 {
            wires.push(wire(&format!("fad{i}.Cout"), &format!("fad{}.Cin", i + 1)));
        }
    }
    wires.push(wire("packS.out", "this.S"));
    wires.push(wire("fad3.Cout", "this.Cout"));

    ComponentTemplate {
        type_name: "4bit-adder".to_string(),
        input_pins: vec![pin("A", 4), pin("B", 4), pin("Cin", 1)],
        output_pins: vec![pin("S", 4), pin("Cout", 1)],
        components: vec![
            InstanceTemplate::new("unpackA", "unpack4"),
            InstanceTemplate::new("unpackB", "unpack4"),
            InstanceTemplate::new("fad0", "full-adder"),
            InstanceTemplate::new("fad1", "full-adder"),
            InstanceTemplate::new("fad2", "full-adder"),
            InstanceTemplate::new("fad3", "full-adder"),
            InstanceTemplate::new("packS", "pack4"),
        ],
        wires,
    }
}

/// Registers the arithmetic composites: `full-adder` (sum and carry from a
/// XOR/AND/OR network) and `4bit-adder` (a 4-bit ripple-carry adder chaining
/// four full adders between an unpack and a pack stage).
///
/// Depends on the gate and pack/unpack types from
/// [`register_basic_components`](crate::library::register_basic_components).
pub fn register_arithmetic_components(system: &mut System) {
    system.register_composite_component(full_adder_template());
    system.register_composite_component(four_bit_adder_template());
}
