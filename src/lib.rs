#![warn(missing_docs)]
//! Evaluation engine for hierarchical combinational logic circuits.
//!
//! Circuits are described by [`ComponentTemplate`]s: named, fixed-width pins
//! on a boundary, child component instances, and wires between their pins.
//! A [`System`] registers templates under type names (primitives come with a
//! [`LogicFn`] evaluation function, composites with children and wires),
//! instantiates them into a live component tree, flattens the tree into one
//! dependency graph, and settles the whole circuit in a single topologically
//! ordered pass. Combinational feedback is rejected as an error rather than
//! simulated.
//!
//! [`ComponentTemplate`]: template::ComponentTemplate
//! [`System`]: system::System
//! [`LogicFn`]: library::LogicFn

pub mod component;
pub mod error;
pub mod graph;
pub mod library;
pub mod system;
pub mod template;
