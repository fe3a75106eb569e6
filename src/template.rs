//! Declarative component descriptions.
//!
//! A [`ComponentTemplate`] is the serializable blueprint of a component type:
//! its boundary pins, the child instances it contains, and the wires between
//! them. Templates carry no values and no behavior. They are registered with
//! a [`System`] and instantiated into live components on demand, and a live
//! composite can be exported back into an equivalent template.
//!
//! [`System`]: crate::system::System

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Interpretation hint for a pin's bits.
///
/// Purely descriptive metadata; evaluation treats every pin as an unsigned
/// bit pattern regardless of type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    /// A single-bit flag.
    Bool,
    /// An unsigned integer.
    Unsigned,
    /// A two's-complement signed integer.
    Signed,
}

/// Blueprint for one boundary pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTemplate {
    /// Pin name, unique within its side (input or output) of the component.
    pub name: String,
    /// Bit width, 1 to 64.
    pub width: u8,
    /// Interpretation hint.
    #[serde(rename = "type")]
    pub pin_type: PinType,
}

impl PinTemplate {
    /// Convenience constructor.
    pub fn new(name: &str, width: u8, pin_type: PinType) -> Self {
        Self { name: name.to_string(), width, pin_type }
    }
}

/// Blueprint for one child instance of a composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTemplate {
    /// Instance name, unique among the composite's children.
    pub name: String,
    /// Registered type name to instantiate.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl InstanceTemplate {
    /// Convenience constructor.
    pub fn new(name: &str, type_name: &str) -> Self {
        Self { name: name.to_string(), type_name: type_name.to_string() }
    }
}

/// Blueprint for one wire inside a composite.
///
/// A `None` component means the endpoint is a boundary pin of the composite
/// itself rather than a pin of one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTemplate {
    /// Producing child, or `None` for the composite's own input pin.
    #[serde(rename = "fromComponent")]
    pub from_component: Option<String>,
    /// Pin name on the producing side.
    #[serde(rename = "fromPin")]
    pub from_pin: String,
    /// Consuming child, or `None` for the composite's own output pin.
    #[serde(rename = "toComponent")]
    pub to_component: Option<String>,
    /// Pin name on the consuming side.
    #[serde(rename = "toPin")]
    pub to_pin: String,
}

impl WireTemplate {
    /// Parses a wire from two dotted endpoint strings, e.g.
    /// `WireTemplate::create("this.A", "xor1.in0")`.
    ///
    /// The component part `this` names the composite's own boundary pins.
    /// An endpoint without exactly one `.` is a [`SimError::MalformedEndpoint`].
    pub fn create(from: &str, to: &str) -> Result<Self> {
        let (from_component, from_pin) = parse_endpoint(from)?;
        let (to_component, to_pin) = parse_endpoint(to)?;
        Ok(Self { from_component, from_pin, to_component, to_pin })
    }
}

fn parse_endpoint(text: &str) -> Result<(Option<String>, String)> {
    let mut parts = text.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(component), Some(pin), None) if !component.is_empty() && !pin.is_empty() => {
            let component = match component {
                "this" => None,
                other => Some(other.to_string()),
            };
            Ok((component, pin.to_string()))
        }
        _ => Err(SimError::MalformedEndpoint(text.to_string())),
    }
}

/// Blueprint for a component type.
///
/// A template with no children and no wires describes a primitive (its
/// behavior is supplied separately at registration); a template with
/// children describes a composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTemplate {
    /// The type name this template registers under.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Boundary input pins, in declaration order.
    #[serde(rename = "inputPins")]
    pub input_pins: Vec<PinTemplate>,
    /// Boundary output pins, in declaration order.
    #[serde(rename = "outputPins")]
    pub output_pins: Vec<PinTemplate>,
    /// Child instances, in declaration order.
    pub components: Vec<InstanceTemplate>,
    /// Internal wires, in declaration order.
    pub wires: Vec<WireTemplate>,
}

impl ComponentTemplate {
    /// Creates a primitive template (no children, no wires).
    pub fn primitive(
        type_name: &str,
        input_pins: Vec<PinTemplate>,
        output_pins: Vec<PinTemplate>,
    ) -> Self {
        Self {
            type_name: type_name.to_string(),
            input_pins,
            output_pins,
            components: Vec::new(),
            wires: Vec::new(),
        }
    }

    /// Serializes the template to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserializes a template from a JSON string.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_parsing() {
        let w = WireTemplate::create("this.A", "xor1.in0").unwrap();
        assert_eq!(w.from_component, None, "'this' should name the boundary");
        assert_eq!(w.from_pin, "A");
        assert_eq!(w.to_component.as_deref(), Some("xor1"));
        assert_eq!(w.to_pin, "in0");
    }

    #[test]
    fn malformed_endpoints_rejected() {
        for bad in ["A", "a.b.c", ".pin", "comp.", ""] {
            assert_eq!(
                WireTemplate::create(bad, "this.out"),
                Err(SimError::MalformedEndpoint(bad.to_string())),
                "endpoint {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn json_round_trip() {
        let template = ComponentTemplate {
            type_name: "half-adder".to_string(),
            input_pins: vec![
                PinTemplate::new("A", 1, PinType::Bool),
                PinTemplate::new("B", 1, PinType::Bool),
            ],
            output_pins: vec![
                PinTemplate::new("S", 1, PinType::Bool),
                PinTemplate::new("C", 1, PinType::Bool),
            ],
            components: vec![
                InstanceTemplate::new("xor1", "xor"),
                InstanceTemplate::new("and1", "and"),
            ],
            wires: vec![
                WireTemplate::create("this.A", "xor1.in0").unwrap(),
                WireTemplate::create("this.B", "xor1.in1").unwrap(),
                WireTemplate::create("this.A", "and1.in0").unwrap(),
                WireTemplate::create("this.B", "and1.in1").unwrap(),
                WireTemplate::create("xor1.out", "this.S").unwrap(),
                WireTemplate::create("and1.out", "this.C").unwrap(),
            ],
        };

        let json = template.to_json().unwrap();
        let back = ComponentTemplate::from_json(&json).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn json_field_names() {
        let template = ComponentTemplate::primitive(
            "not",
            vec![PinTemplate::new("in", 1, PinType::Bool)],
            vec![PinTemplate::new("out", 1, PinType::Bool)],
        );
        let json = template.to_json().unwrap();
        assert!(json.contains("\"type\":\"not\""), "json was {json}");
        assert!(json.contains("\"inputPins\""), "json was {json}");
        assert!(json.contains("\"outputPins\""), "json was {json}");
    }
}
