use crate::component::{MAX_WIDTH, MIN_WIDTH, PinValues};
use crate::library::{Evaluate, input, pin};
use crate::template::ComponentTemplate;

/// A 2-way multiplexer component.
///
/// Registers as `mux2way{width}bit`: a one-bit `select` chooses between
/// `in0` (select 0) and `in1` (select 1).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mux {
    width: u8,
}
impl Mux {
    /// Creates a new 2-way multiplexer with the specified data width.
    pub fn new(width: u8) -> Self {
        Self { width: width.clamp(MIN_WIDTH, MAX_WIDTH) }
    }
}
impl Evaluate for Mux {
    fn eval(&self, inputs: &PinValues) -> PinValues {
        let selected = match input(inputs, "select") & 1 {
            0 => input(inputs, "in0"),
            _ => input(inputs, "in1"),
        };
        PinValues::from([("out".to_string(), selected)])
    }
    fn template(&self) -> ComponentTemplate {
        ComponentTemplate::primitive(
            &format!("mux2way{}bit", self.width),
            vec![pin("select", 1), pin("in0", self.width), pin("in1", self.width)],
            vec![pin("out", self.width)],
        )
    }
}

/// A 2-way demultiplexer component.
///
/// Registers as `dmux2way{width}bit`: a one-bit `select` routes `in` to
/// `out0` (select 0) or `out1` (select 1); the unselected output is 0.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Demux {
    width: u8,
}
impl Demux {
    /// Creates a new 2-way demultiplexer with the specified data width.
    pub fn new(width: u8) -> Self {
        Self { width: width.clamp(MIN_WIDTH, MAX_WIDTH) }
    }
}
impl Evaluate for Demux {
    fn eval(&self, inputs: &PinValues) -> PinValues {
        let value = input(inputs, "in");
        let (out0, out1) = match input(inputs, "select") & 1 {
            0 => (value, 0),
            _ => (0, value),
        };
        PinValues::from([("out0".to_string(), out0), ("out1".to_string(), out1)])
    }
    fn template(&self) -> ComponentTemplate {
        ComponentTemplate::primitive(
            &format!("dmux2way{}bit", self.width),
            vec![pin("select", 1), pin("in", self.width)],
            vec![pin("out0", self.width), pin("out1", self.width)],
        )
    }
}
