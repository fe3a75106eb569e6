use crate::component::{MAX_WIDTH, MIN_WIDTH, PinValues};
use crate::library::{Evaluate, input, mask, pin};
use crate::template::ComponentTemplate;

macro_rules! gates {
    ($($(#[$m:meta])? $Id:ident ($name:literal): $f:expr, $invert:literal),*$(,)?) => {
        $(
            $(#[$m])?
            #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
            pub struct $Id {
                width: u8,
            }
            impl $Id {
                /// Creates a new instance of the gate with the specified width.
                pub fn new(width: u8) -> Self {
                    Self { width: width.clamp(MIN_WIDTH, MAX_WIDTH) }
                }
            }
            impl Evaluate for $Id {
                fn eval(&self, inputs: &PinValues) -> PinValues {
                    let f: fn(u64, u64) -> u64 = $f;
                    let value = f(input(inputs, "in0"), input(inputs, "in1"));
                    let value = if $invert { !value & mask(self.width) } else { value };
                    PinValues::from([("out".to_string(), value)])
                }
                fn template(&self) -> ComponentTemplate {
                    ComponentTemplate::primitive(
                        $name,
                        vec![pin("in0", self.width), pin("in1", self.width)],
                        vec![pin("out", self.width)],
                    )
                }
            }
        )*
    }
}

gates! {
    /// An AND gate component.
    And ("and"):   |a, b| a & b, false,
    /// An OR gate component.
    Or ("or"):     |a, b| a | b, false,
    /// An XOR gate component.
    Xor ("xor"):   |a, b| a ^ b, false,
    /// A NAND gate component.
    Nand ("nand"): |a, b| a & b, true,
    /// A NOR gate component.
    Nor ("nor"):   |a, b| a | b, true,
    /// A XNOR gate component.
    Xnor ("xnor"): |a, b| a ^ b, true,
}

/// A NOT gate component.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Not {
    width: u8,
}
impl Not {
    /// Creates a new instance of the NOT gate with the specified width.
    pub fn new(width: u8) -> Self {
        Self { width: width.clamp(MIN_WIDTH, MAX_WIDTH) }
    }
}
impl Evaluate for Not {
    fn eval(&self, inputs: &PinValues) -> PinValues {
        let value = !input(inputs, "in") & mask(self.width);
        PinValues::from([("out".to_string(), value)])
    }
    fn template(&self) -> ComponentTemplate {
        ComponentTemplate::primitive(
            "not",
            vec![pin("in", self.width)],
            vec![pin("out", self.width)],
        )
    }
}
