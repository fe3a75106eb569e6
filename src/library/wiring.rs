use crate::component::{MAX_WIDTH, MIN_WIDTH, PinValues};
use crate::library::{Evaluate, input, pin};
use crate::template::ComponentTemplate;

/// Minimum number of lanes for packers and unpackers.
pub const MIN_LANES: u8 = 2;
/// Maximum number of lanes for packers and unpackers.
pub const MAX_LANES: u8 = 64;

/// An identity buffer component.
///
/// Registers as `pass{width}`. Useful for giving a wire a component
/// boundary without altering the signal.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Pass {
    width: u8,
}
impl Pass {
    /// Creates a new pass buffer with the specified width.
    pub fn new(width: u8) -> Self {
        Self { width: width.clamp(MIN_WIDTH, MAX_WIDTH) }
    }
}
impl Evaluate for Pass {
    fn eval(&self, inputs: &PinValues) -> PinValues {
        PinValues::from([("out".to_string(), input(inputs, "in"))])
    }
    fn template(&self) -> ComponentTemplate {
        ComponentTemplate::primitive(
            &format!("pass{}", self.width),
            vec![pin("in", self.width)],
            vec![pin("out", self.width)],
        )
    }
}

/// A bit packer component.
///
/// Registers as `pack{n}`: combines `n` one-bit inputs `in0..in{n-1}` into
/// one `n`-bit output, `in0` as the least significant bit.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Pack {
    lanes: u8,
}
impl Pack {
    /// Creates a new packer with the specified number of one-bit lanes.
    pub fn new(lanes: u8) -> Self {
        Self { lanes: lanes.clamp(MIN_LANES, MAX_LANES) }
    }
}
impl Evaluate for Pack {
    fn eval(&self, inputs: &PinValues) -> PinValues {
        let value = (0..self.lanes)
            .map(|i| (input(inputs, &format!("in{i}")) & 1) << i)
            .fold(0, |acc, bit| acc | bit);
        PinValues::from([("out".to_string(), value)])
    }
    fn template(&self) -> ComponentTemplate {
        ComponentTemplate::primitive(
            &format!("pack{}", self.lanes),
            (0..self.lanes).map(|i| pin(&format!("in{i}"), 1)).collect(),
            vec![pin("out", self.lanes)],
        )
    }
}

/// A bit unpacker component.
///
/// Registers as `unpack{n}`: splits one `n`-bit input into `n` one-bit
/// outputs `out0..out{n-1}`, `out0` as the least significant bit.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Unpack {
    lanes: u8,
}
impl Unpack {
    /// Creates a new unpacker with the specified number of one-bit lanes.
    pub fn new(lanes: u8) -> Self {
        Self { lanes: lanes.clamp(MIN_LANES, MAX_LANES) }
    }
}
impl Evaluate for Unpack {
    fn eval(&self, inputs: &PinValues) -> PinValues {
        let value = input(inputs, "in");
        (0..self.lanes)
            .map(|i| (format!("out{i}"), (value >> i) & 1))
            .collect()
    }
    fn template(&self) -> ComponentTemplate {
        ComponentTemplate::primitive(
            &format!("unpack{}", self.lanes),
            vec![pin("in", self.lanes)],
            (0..self.lanes).map(|i| pin(&format!("out{i}"), 1)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_identity() {
        let buffer = Pass::new(4);
        let inputs = PinValues::from([("in".to_string(), 0b1010)]);
        assert_eq!(buffer.eval(&inputs)["out"], 0b1010);
    }

    #[test]
    fn pack_low_bit_first() {
        let packer = Pack::new(4);
        let inputs = PinValues::from([
            ("in0".to_string(), 1),
            ("in1".to_string(), 0),
            ("in2".to_string(), 1),
            ("in3".to_string(), 1),
        ]);
        assert_eq!(packer.eval(&inputs)["out"], 0b1101, "in0 should be the LSB");
    }

    #[test]
    fn unpack_low_bit_first() {
        let unpacker = Unpack::new(4);
        let inputs = PinValues::from([("in".to_string(), 0b1101)]);
        let outputs = unpacker.eval(&inputs);
        assert_eq!(outputs["out0"], 1);
        assert_eq!(outputs["out1"], 0);
        assert_eq!(outputs["out2"], 1);
        assert_eq!(outputs["out3"], 1);
    }

    #[test]
    fn pack_unpack_inverse() {
        let packer = Pack::new(4);
        let unpacker = Unpack::new(4);
        for value in 0..16u64 {
            let inputs = PinValues::from([("in".to_string(), value)]);
            let lanes = unpacker.eval(&inputs);
            // Route each unpacked lane onto the packer's matching input.
            let repacked: PinValues = (0..4)
                .map(|i| (format!("in{i}"), lanes[&format!("out{i}")]))
                .collect();
            assert_eq!(
                packer.eval(&repacked)["out"],
                value,
                "unpack then pack should return {value}"
            );
        }
    }

    #[test]
    fn templates_name_the_lanes() {
        let template = Pack::new(2).template();
        assert_eq!(template.type_name, "pack2");
        assert_eq!(template.input_pins.len(), 2);
        assert_eq!(template.output_pins[0].width, 2);

        let template = Unpack::new(4).template();
        assert_eq!(template.type_name, "unpack4");
        assert_eq!(template.input_pins[0].width, 4);
        assert_eq!(template.output_pins.len(), 4);
    }
}
