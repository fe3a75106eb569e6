//! Stock primitive components and composite definitions.
//!
//! This module defines the built-in component families (gates, wiring
//! helpers, multiplexers, arithmetic composites) as well as the trait and
//! enum needed to evaluate them.
//!
//! ## This module notably consists of:
//! - **[`Evaluate`]**: the interface every primitive evaluation function
//!   implements.
//! - **[`LogicFn`]**: the closed enum of all primitive evaluation functions,
//!   dispatched with `enum_dispatch`.
//! - **[`register_basic_components`]** / **[`register_arithmetic_components`]**:
//!   stock registrations for a [`System`].
//!
//! [`System`]: crate::system::System

use enum_dispatch::enum_dispatch;

use crate::component::PinValues;
use crate::system::System;
use crate::template::{ComponentTemplate, PinTemplate, PinType};

pub use gates::*;
pub use muxes::*;
pub use wiring::*;

mod arithmetic;
mod gates;
mod muxes;
mod wiring;

pub use arithmetic::register_arithmetic_components;

/// The interface defining how a primitive component evaluates.
///
/// Implementations are pure: outputs depend only on `inputs`, keyed by pin
/// name. An input pin missing from the map reads as 0; output values are
/// masked to their pin's width by the caller.
#[enum_dispatch]
pub trait Evaluate {
    /// Computes output pin values from input pin values.
    fn eval(&self, inputs: &PinValues) -> PinValues;

    /// The template this function registers under: its type name and pin
    /// shape. Keeps behavior and interface defined in one place.
    fn template(&self) -> ComponentTemplate;
}

/// Every primitive evaluation function known to the crate.
#[enum_dispatch(Evaluate)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicFn {
    /// NOT gate.
    Not(Not),
    /// AND gate.
    And(And),
    /// OR gate.
    Or(Or),
    /// NAND gate.
    Nand(Nand),
    /// NOR gate.
    Nor(Nor),
    /// XOR gate.
    Xor(Xor),
    /// XNOR gate.
    Xnor(Xnor),
    /// Identity buffer.
    Pass(Pass),
    /// Bit packer.
    Pack(Pack),
    /// Bit unpacker.
    Unpack(Unpack),
    /// 2-way multiplexer.
    Mux(Mux),
    /// 2-way demultiplexer.
    Demux(Demux),
}

/// Bit mask covering `width` bits.
pub(crate) fn mask(width: u8) -> u64 {
    u64::MAX >> (64 - u32::from(width))
}

/// Shorthand for an unsigned pin template, `Bool` at width 1.
pub(crate) fn pin(name: &str, width: u8) -> PinTemplate {
    let pin_type = if width == 1 { PinType::Bool } else { PinType::Unsigned };
    PinTemplate::new(name, width, pin_type)
}

/// Fetches an input value from a snapshot; unwired pins read as 0.
pub(crate) fn input(inputs: &PinValues, name: &str) -> u64 {
    inputs.get(name).copied().unwrap_or(0)
}

/// Registers the stock primitive set on a system: 1-bit gates, pass buffers
/// for widths 1 through 4, 2-way muxes and demuxes for widths 1 through 4,
/// and 2/4-bit packers and unpackers.
pub fn register_basic_components(system: &mut System) {
    system.register_logic(Not::new(1));
    system.register_logic(And::new(1));
    system.register_logic(Or::new(1));
    system.register_logic(Nand::new(1));
    system.register_logic(Nor::new(1));
    system.register_logic(Xor::new(1));
    system.register_logic(Xnor::new(1));

    for width in 1..=4 {
        system.register_logic(Pass::new(width));
        system.register_logic(Mux::new(width));
        system.register_logic(Demux::new(width));
    }

    system.register_logic(Pack::new(2));
    system.register_logic(Unpack::new(2));
    system.register_logic(Pack::new(4));
    system.register_logic(Unpack::new(4));
}
