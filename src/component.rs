//! Live circuit model: pins, wires, and component instances.
//!
//! All instances live in slotmap arenas owned by the
//! [`System`](crate::system::System); everything else refers to them through
//! non-owning [`PinKey`]s and [`ComponentKey`]s. A parent composite owns its
//! children as a key list, so removing a subtree is a walk over keys.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SimError};
use crate::library::LogicFn;
use crate::template::PinType;

new_key_type! {
    /// Key type for pin arenas.
    pub struct PinKey;
    /// Key type for component arenas.
    pub struct ComponentKey;
}

/// Arena owning every pin in a system.
pub type PinArena = SlotMap<PinKey, Pin>;
/// Arena owning every component in a system.
pub type ComponentArena = SlotMap<ComponentKey, Component>;
/// A snapshot of pin values by pin name.
pub type PinValues = HashMap<String, u64>;

/// Smallest pin width.
pub const MIN_WIDTH: u8 = 1;
/// Largest pin width (values are stored in a `u64`).
pub const MAX_WIDTH: u8 = 64;

/// A named, fixed-width signal endpoint.
///
/// A pin starts out *unwritten* ([`Pin::read`] returns `None`) and holds the
/// last value written to it thereafter. Values are always masked to the
/// pin's width before storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    name: String,
    width: u8,
    pin_type: PinType,
    value: Option<u64>,
}

impl Pin {
    /// Creates an unwritten pin. Width is clamped to `1..=64`.
    pub fn new(name: &str, width: u8, pin_type: PinType) -> Self {
        Self {
            name: name.to_string(),
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            pin_type,
            value: None,
        }
    }

    /// The pin's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pin's bit width.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// The pin's interpretation hint.
    pub fn pin_type(&self) -> PinType {
        self.pin_type
    }

    /// Bit mask covering the pin's width.
    pub fn mask(&self) -> u64 {
        u64::MAX >> (64 - u32::from(self.width))
    }

    /// The last written value, or `None` if the pin was never written.
    pub fn read(&self) -> Option<u64> {
        self.value
    }

    /// Stores a value declared to be `width` bits wide.
    ///
    /// Fails with [`SimError::WidthMismatch`] if `width` differs from the
    /// pin's width and with [`SimError::ValueTooWide`] if the value has bits
    /// set beyond it. On failure the pin's value is untouched.
    pub fn write(&mut self, value: u64, width: u8) -> Result<()> {
        if width != self.width {
            return Err(SimError::WidthMismatch {
                pin: self.name.clone(),
                expected: self.width,
                actual: width,
            });
        }
        if value & !self.mask() != 0 {
            return Err(SimError::ValueTooWide { value, width });
        }
        self.value = Some(value);
        Ok(())
    }

    /// Overwrites the stored value without width checks. Used by the run
    /// loop, which checks widths at the wire level, and by input
    /// application, which masks first.
    pub(crate) fn set_raw(&mut self, value: Option<u64>) {
        self.value = value;
    }
}

/// One end of a wire: a pin together with the component it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEnd {
    /// The component owning the pin. For a boundary endpoint this is the
    /// composite that owns the wire.
    pub component: ComponentKey,
    /// The pin itself.
    pub pin: PinKey,
}

/// A directed, width-checked connection between two pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wire {
    /// Producing end.
    pub from: WireEnd,
    /// Consuming end.
    pub to: WireEnd,
}

/// What a component is made of.
#[derive(Debug, Clone)]
pub enum ComponentKind {
    /// A component built from children and wires, with no logic of its own.
    Composite {
        /// Child instances in declaration order.
        children: Vec<ComponentKey>,
        /// Internal wires in declaration order.
        wires: Vec<Wire>,
    },
    /// A leaf component evaluated by a pure function.
    Primitive {
        /// The evaluation function.
        logic: LogicFn,
    },
}

/// A live component instance.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    type_name: String,
    input_pins: Vec<PinKey>,
    output_pins: Vec<PinKey>,
    kind: ComponentKind,
}

impl Component {
    /// Creates a component. Pin key lists must already be allocated in the
    /// pin arena.
    pub(crate) fn new(
        name: &str,
        type_name: &str,
        input_pins: Vec<PinKey>,
        output_pins: Vec<PinKey>,
        kind: ComponentKind,
    ) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            input_pins,
            output_pins,
            kind,
        }
    }

    /// The instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered type name this instance was created from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Boundary input pins in declaration order.
    pub fn input_pins(&self) -> &[PinKey] {
        &self.input_pins
    }

    /// Boundary output pins in declaration order.
    pub fn output_pins(&self) -> &[PinKey] {
        &self.output_pins
    }

    /// The component's structure or logic.
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Child keys, empty for primitives.
    pub fn children(&self) -> &[ComponentKey] {
        match &self.kind {
            ComponentKind::Composite { children, .. } => children,
            ComponentKind::Primitive { .. } => &[],
        }
    }

    /// Internal wires, empty for primitives.
    pub fn wires(&self) -> &[Wire] {
        match &self.kind {
            ComponentKind::Composite { wires, .. } => wires,
            ComponentKind::Primitive { .. } => &[],
        }
    }

    /// Looks up a boundary input pin by name.
    pub fn input_pin(&self, name: &str, pins: &PinArena) -> Result<PinKey> {
        find_pin(&self.input_pins, name, pins)
    }

    /// Looks up a boundary output pin by name.
    pub fn output_pin(&self, name: &str, pins: &PinArena) -> Result<PinKey> {
        find_pin(&self.output_pins, name, pins)
    }

    /// Looks up a child by instance name.
    pub fn child(&self, name: &str, components: &ComponentArena) -> Result<ComponentKey> {
        self.children()
            .iter()
            .copied()
            .find(|&k| components[k].name == name)
            .ok_or_else(|| SimError::ComponentNotFound(name.to_string()))
    }

    /// Replaces the composite's wire list. No-op shape check: the caller
    /// resolves and width-checks the wires beforehand.
    pub(crate) fn set_wires(&mut self, new_wires: Vec<Wire>) {
        if let ComponentKind::Composite { wires, .. } = &mut self.kind {
            *wires = new_wires;
        }
    }

    /// Appends a wire to the composite's wire list.
    pub(crate) fn push_wire(&mut self, wire: Wire) {
        if let ComponentKind::Composite { wires, .. } = &mut self.kind {
            wires.push(wire);
        }
    }

    /// Appends a child to the composite's child list.
    pub(crate) fn push_child(&mut self, child: ComponentKey) {
        if let ComponentKind::Composite { children, .. } = &mut self.kind {
            children.push(child);
        }
    }

    /// Drops child references and wires that fail the predicate, after a
    /// component is removed from the arena.
    pub(crate) fn retain_refs(&mut self, keep: impl Fn(ComponentKey) -> bool) {
        if let ComponentKind::Composite { children, wires } = &mut self.kind {
            children.retain(|&k| keep(k));
            wires.retain(|w| keep(w.from.component) && keep(w.to.component));
        }
    }
}

fn find_pin(keys: &[PinKey], name: &str, pins: &PinArena) -> Result<PinKey> {
    keys.iter()
        .copied()
        .find(|&k| pins[k].name() == name)
        .ok_or_else(|| SimError::PinNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped() {
        assert_eq!(Pin::new("a", 0, PinType::Bool).width(), 1);
        assert_eq!(Pin::new("a", 200, PinType::Unsigned).width(), 64);
        assert_eq!(Pin::new("a", 4, PinType::Unsigned).width(), 4);
    }

    #[test]
    fn mask_covers_width() {
        assert_eq!(Pin::new("a", 1, PinType::Bool).mask(), 0b1);
        assert_eq!(Pin::new("a", 4, PinType::Unsigned).mask(), 0xF);
        assert_eq!(Pin::new("a", 64, PinType::Unsigned).mask(), u64::MAX);
    }

    #[test]
    fn unwritten_then_written() {
        let mut pin = Pin::new("a", 4, PinType::Unsigned);
        assert_eq!(pin.read(), None, "fresh pin must read as unwritten");

        pin.write(0xA, 4).unwrap();
        assert_eq!(pin.read(), Some(0xA));
    }

    #[test]
    fn write_rejects_wrong_width() {
        let mut pin = Pin::new("a", 4, PinType::Unsigned);
        let err = pin.write(1, 8).unwrap_err();
        assert_eq!(
            err,
            SimError::WidthMismatch { pin: "a".to_string(), expected: 4, actual: 8 }
        );
        assert_eq!(pin.read(), None, "failed write must not store a value");
    }

    #[test]
    fn write_rejects_oversized_value() {
        let mut pin = Pin::new("a", 4, PinType::Unsigned);
        let err = pin.write(0x10, 4).unwrap_err();
        assert_eq!(err, SimError::ValueTooWide { value: 0x10, width: 4 });
        assert_eq!(pin.read(), None);
    }
}
