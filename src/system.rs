//! The component type registry and evaluation driver.
//!
//! A [`System`] owns every pin and component instance in play, maps type
//! names to their definitions, and drives evaluation: it flattens the main
//! component's instance tree into one [`DependencyGraph`], caches the
//! resulting run list, and replays that list to settle the whole circuit in
//! a single pass. Structural edits invalidate the cached run list; value
//! writes never do.

use std::collections::HashMap;

use crate::component::{
    Component, ComponentArena, ComponentKey, ComponentKind, Pin, PinArena, PinKey, PinValues,
    Wire, WireEnd,
};
use crate::error::{Result, SimError};
use crate::graph::{DependencyGraph, Step};
use crate::library::{Evaluate, LogicFn};
use crate::template::{ComponentTemplate, InstanceTemplate, PinTemplate, WireTemplate};

/// A registered component type.
#[derive(Debug, Clone)]
enum TypeDef {
    /// A leaf type: pin shape plus an evaluation function.
    Primitive { template: ComponentTemplate, logic: LogicFn },
    /// A structural type: pin shape plus children and wires.
    Composite { template: ComponentTemplate },
}

impl TypeDef {
    fn template(&self) -> &ComponentTemplate {
        match self {
            TypeDef::Primitive { template, .. } => template,
            TypeDef::Composite { template } => template,
        }
    }
}

/// Vertex of the flattened dependency graph: a pin or a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum RunVertex {
    Pin(PinKey),
    Logic(ComponentKey),
}

/// Edge payload of the flattened dependency graph.
#[derive(Debug, Clone, Copy)]
enum RunEdge {
    /// A real wire: copy the source pin's value to the destination pin.
    Copy { from: WireEnd, to: WireEnd },
    /// Pure ordering between a primitive and its boundary pins.
    Ordering,
}

/// One executable entry of the cached run list.
#[derive(Debug, Clone, Copy)]
enum Runner {
    /// Copy a pin value along a wire.
    Wire { from: PinKey, to: PinKey },
    /// Evaluate a primitive component.
    Logic(ComponentKey),
}

/// The circuit registry and driver.
#[derive(Debug, Default)]
pub struct System {
    types: HashMap<String, TypeDef>,
    pins: PinArena,
    components: ComponentArena,
    main: Option<ComponentKey>,
    run_list: Option<Vec<Runner>>,
}

impl System {
    /// Creates an empty system with no registered types.
    pub fn new() -> Self {
        Default::default()
    }

    // ---------------------------------------------------------------- //
    // Registry

    /// Registers a primitive type: a pin shape evaluated by `logic`.
    /// Re-registering a name overwrites the previous definition; existing
    /// instances keep the definition they were created with.
    pub fn register_primitive_component(&mut self, template: ComponentTemplate, logic: LogicFn) {
        self.types
            .insert(template.type_name.clone(), TypeDef::Primitive { template, logic });
    }

    /// Registers a primitive type straight from its evaluation function,
    /// using the template the function describes itself with.
    pub fn register_logic<F: Evaluate + Into<LogicFn>>(&mut self, logic: F) {
        self.register_primitive_component(logic.template(), logic.into());
    }

    /// Registers a composite type described entirely by its template.
    pub fn register_composite_component(&mut self, template: ComponentTemplate) {
        self.types
            .insert(template.type_name.clone(), TypeDef::Composite { template });
    }

    /// Looks up the template a type name was registered with.
    pub fn template(&self, type_name: &str) -> Option<&ComponentTemplate> {
        self.types.get(type_name).map(TypeDef::template)
    }

    // ---------------------------------------------------------------- //
    // Instantiation

    /// Instantiates a registered type under the given instance name,
    /// recursively creating children, boundary pins, and wires.
    ///
    /// Fails with [`SimError::ComponentTypeNotFound`] for an unknown type
    /// and with the wiring errors of the template otherwise. A failed
    /// instantiation removes everything it created.
    pub fn create_component(&mut self, name: &str, type_name: &str) -> Result<ComponentKey> {
        let def = self
            .types
            .get(type_name)
            .cloned()
            .ok_or_else(|| SimError::ComponentTypeNotFound(type_name.to_string()))?;
        match def {
            TypeDef::Primitive { template, logic } => {
                Ok(self.instantiate_primitive(name, &template, logic))
            }
            TypeDef::Composite { template } => self.instantiate_composite(name, &template),
        }
    }

    /// Instantiates a composite directly from a template, without it being
    /// registered. Child types must still be registered.
    pub fn create_from_template(
        &mut self,
        name: &str,
        template: &ComponentTemplate,
    ) -> Result<ComponentKey> {
        self.instantiate_composite(name, template)
    }

    fn instantiate_primitive(
        &mut self,
        name: &str,
        template: &ComponentTemplate,
        logic: LogicFn,
    ) -> ComponentKey {
        let input_pins = self.alloc_pins(&template.input_pins);
        let output_pins = self.alloc_pins(&template.output_pins);
        self.components.insert(Component::new(
            name,
            &template.type_name,
            input_pins,
            output_pins,
            ComponentKind::Primitive { logic },
        ))
    }

    fn instantiate_composite(
        &mut self,
        name: &str,
        template: &ComponentTemplate,
    ) -> Result<ComponentKey> {
        // Children first: wires refer to their pins.
        let mut children = Vec::with_capacity(template.components.len());
        for spec in &template.components {
            match self.create_component(&spec.name, &spec.type_name) {
                Ok(child) => children.push(child),
                Err(e) => {
                    for child in children {
                        self.remove_component(child);
                    }
                    return Err(e);
                }
            }
        }

        let input_pins = self.alloc_pins(&template.input_pins);
        let output_pins = self.alloc_pins(&template.output_pins);
        let key = self.components.insert(Component::new(
            name,
            &template.type_name,
            input_pins,
            output_pins,
            ComponentKind::Composite { children, wires: Vec::new() },
        ));

        // The component must exist before its wires can name its boundary
        // pins and children.
        let mut wires = Vec::with_capacity(template.wires.len());
        for spec in &template.wires {
            match self.resolve_wire(key, spec) {
                Ok(wire) => wires.push(wire),
                Err(e) => {
                    self.remove_component(key);
                    return Err(e);
                }
            }
        }
        self.components[key].set_wires(wires);

        Ok(key)
    }

    fn alloc_pins(&mut self, templates: &[PinTemplate]) -> Vec<PinKey> {
        templates
            .iter()
            .map(|t| self.pins.insert(Pin::new(&t.name, t.width, t.pin_type)))
            .collect()
    }

    /// Resolves a wire template against a composite: a `None` component
    /// names the composite's own boundary (an input pin as source, an
    /// output pin as destination); named components must be children, read
    /// from their outputs and written through their inputs. The two
    /// endpoints must agree on width.
    fn resolve_wire(&self, owner: ComponentKey, spec: &WireTemplate) -> Result<Wire> {
        let composite = &self.components[owner];

        let from = match &spec.from_component {
            // A boundary source must be an input pin of the composite.
            None => WireEnd {
                component: owner,
                pin: composite.input_pin(&spec.from_pin, &self.pins)?,
            },
            Some(child_name) => {
                let child = composite.child(child_name, &self.components)?;
                WireEnd {
                    component: child,
                    pin: self.components[child].output_pin(&spec.from_pin, &self.pins)?,
                }
            }
        };

        let to = match &spec.to_component {
            // A boundary destination must be an output pin.
            None => WireEnd {
                component: owner,
                pin: composite.output_pin(&spec.to_pin, &self.pins)?,
            },
            Some(child_name) => {
                let child = composite.child(child_name, &self.components)?;
                WireEnd {
                    component: child,
                    pin: self.components[child].input_pin(&spec.to_pin, &self.pins)?,
                }
            }
        };

        let from_width = self.pins[from.pin].width();
        let to_width = self.pins[to.pin].width();
        if from_width != to_width {
            return Err(SimError::WidthMismatch {
                pin: self.pins[to.pin].name().to_string(),
                expected: to_width,
                actual: from_width,
            });
        }

        Ok(Wire { from, to })
    }

    // ---------------------------------------------------------------- //
    // Structural edits

    /// Marks a component as the root of evaluation.
    pub fn set_main_component(&mut self, key: ComponentKey) {
        self.main = Some(key);
        self.run_list = None;
    }

    /// The current evaluation root, if one is set.
    pub fn main_component(&self) -> Option<ComponentKey> {
        self.main
    }

    /// Instantiates a new child inside a composite. Primitive parents and
    /// duplicate instance names within the parent are rejected.
    pub fn add_child(
        &mut self,
        parent: ComponentKey,
        name: &str,
        type_name: &str,
    ) -> Result<ComponentKey> {
        self.require_composite(parent)?;
        if self.components[parent].child(name, &self.components).is_ok() {
            return Err(SimError::DuplicateChild(name.to_string()));
        }
        let child = self.create_component(name, type_name)?;
        self.components[parent].push_child(child);
        self.run_list = None;
        Ok(child)
    }

    /// Adds a wire inside a composite, resolved and width-checked against
    /// its current children and boundary pins.
    pub fn add_wire(&mut self, parent: ComponentKey, spec: &WireTemplate) -> Result<()> {
        self.require_composite(parent)?;
        let wire = self.resolve_wire(parent, spec)?;
        self.components[parent].push_wire(wire);
        self.run_list = None;
        Ok(())
    }

    fn require_composite(&self, key: ComponentKey) -> Result<()> {
        let component = &self.components[key];
        match component.kind() {
            ComponentKind::Composite { .. } => Ok(()),
            ComponentKind::Primitive { .. } => {
                Err(SimError::NotComposite(component.name().to_string()))
            }
        }
    }

    /// Removes a component, its whole subtree, and all of their pins.
    /// Wires and child references to the removed subtree are dropped from
    /// the remaining components.
    pub fn remove_component(&mut self, key: ComponentKey) {
        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let Some(component) = self.components.remove(k) else { continue };
            for &pin in component.input_pins().iter().chain(component.output_pins()) {
                self.pins.remove(pin);
            }
            stack.extend_from_slice(component.children());
            removed.push(k);
        }

        for component in self.components.values_mut() {
            component.retain_refs(|k| !removed.contains(&k));
        }
        if self.main.is_some_and(|m| removed.contains(&m)) {
            self.main = None;
        }
        self.run_list = None;
    }

    // ---------------------------------------------------------------- //
    // Flattening and execution

    /// Flattens the main component's instance tree into one dependency
    /// graph, topologically orders it, and caches the runnable entries.
    ///
    /// Composites are transparent: they contribute their boundary pins as
    /// vertices and their wires as copy edges. Primitives contribute
    /// themselves as a vertex held in place by ordering edges from their
    /// input pins and to their output pins.
    ///
    /// Fails with [`SimError::NoMainComponent`] if no root is set and with
    /// [`SimError::CircuitHasCycle`] on combinational feedback; in both
    /// cases no run list is cached.
    pub fn construct_graph(&mut self) -> Result<()> {
        self.run_list = None;
        let main = self.main.ok_or(SimError::NoMainComponent)?;

        let mut graph = DependencyGraph::new();
        self.flatten(&mut graph, main);

        let order = graph.calc_order().map_err(|cycle| {
            tracing::warn!(unordered = cycle.remaining, "circuit has combinational feedback");
            SimError::CircuitHasCycle { unordered: cycle.remaining }
        })?;

        let run_list: Vec<Runner> = order
            .iter()
            .filter_map(|step| match *step {
                Step::Vertex(RunVertex::Logic(key)) => Some(Runner::Logic(key)),
                Step::Vertex(RunVertex::Pin(_)) => None,
                Step::Edge(RunEdge::Copy { from, to }) => {
                    Some(Runner::Wire { from: from.pin, to: to.pin })
                }
                Step::Edge(RunEdge::Ordering) => None,
            })
            .collect();

        tracing::debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            runners = run_list.len(),
            "constructed run list"
        );
        self.run_list = Some(run_list);
        Ok(())
    }

    fn flatten(&self, graph: &mut DependencyGraph<RunVertex, RunEdge>, key: ComponentKey) {
        let component = &self.components[key];
        for &pin in component.input_pins().iter().chain(component.output_pins()) {
            graph.add_vertex(RunVertex::Pin(pin));
        }

        match component.kind() {
            ComponentKind::Primitive { .. } => {
                graph.add_vertex(RunVertex::Logic(key));
                for &pin in component.input_pins() {
                    graph.add_edge(RunVertex::Pin(pin), RunVertex::Logic(key), RunEdge::Ordering);
                }
                for &pin in component.output_pins() {
                    graph.add_edge(RunVertex::Logic(key), RunVertex::Pin(pin), RunEdge::Ordering);
                }
            }
            ComponentKind::Composite { children, wires } => {
                for &child in children {
                    self.flatten(graph, child);
                }
                for &wire in wires {
                    graph.add_edge(
                        RunVertex::Pin(wire.from.pin),
                        RunVertex::Pin(wire.to.pin),
                        RunEdge::Copy { from: wire.from, to: wire.to },
                    );
                }
            }
        }
    }

    /// Replays the cached run list once. Exactly one pass settles an
    /// acyclic circuit; there is no fixpoint iteration.
    ///
    /// Fails with [`SimError::GraphNotConstructed`] if no run list is
    /// cached.
    pub fn run_logic(&mut self) -> Result<()> {
        let Some(run_list) = &self.run_list else {
            return Err(SimError::GraphNotConstructed);
        };
        let pins = &mut self.pins;
        let components = &self.components;

        for runner in run_list {
            match *runner {
                Runner::Wire { from, to } => {
                    let from_width = pins[from].width();
                    let to_width = pins[to].width();
                    // Re-checked in case a pin changed behind the cache.
                    if from_width != to_width {
                        return Err(SimError::WidthMismatch {
                            pin: pins[to].name().to_string(),
                            expected: to_width,
                            actual: from_width,
                        });
                    }
                    let value = pins[from].read();
                    pins[to].set_raw(value);
                }
                Runner::Logic(key) => {
                    let component = &components[key];
                    let ComponentKind::Primitive { logic } = component.kind() else {
                        continue;
                    };
                    let inputs: PinValues = component
                        .input_pins()
                        .iter()
                        .map(|&k| (pins[k].name().to_string(), pins[k].read().unwrap_or(0)))
                        .collect();
                    let outputs = logic.eval(&inputs);
                    for &k in component.output_pins() {
                        let produced = outputs.get(pins[k].name()).copied();
                        // Outputs the function did not produce keep their value.
                        if let Some(value) = produced {
                            let masked = value & pins[k].mask();
                            pins[k].set_raw(Some(masked));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------- //
    // Value interface

    /// Snapshot of a component's written input pins by name.
    pub fn input_values(&self, key: ComponentKey) -> PinValues {
        self.pin_values(self.components[key].input_pins())
    }

    /// Snapshot of a component's written output pins by name.
    pub fn output_values(&self, key: ComponentKey) -> PinValues {
        self.pin_values(self.components[key].output_pins())
    }

    fn pin_values(&self, keys: &[PinKey]) -> PinValues {
        keys.iter()
            .filter_map(|&k| {
                let pin = &self.pins[k];
                pin.read().map(|v| (pin.name().to_string(), v))
            })
            .collect()
    }

    /// Writes values to a component's input pins by name, masking each to
    /// its pin's width. Names that match no input pin are ignored.
    pub fn apply_input_values(&mut self, key: ComponentKey, values: &PinValues) {
        for &k in self.components[key].input_pins() {
            let pin = &mut self.pins[k];
            let written = values.get(pin.name()).copied();
            if let Some(value) = written {
                let masked = value & pin.mask();
                pin.set_raw(Some(masked));
            }
        }
    }

    /// Writes 0 into every input pin of the component and all of its
    /// descendants, replacing any leftover state from a previous run.
    pub fn clear_inputs(&mut self, key: ComponentKey) {
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let component = &self.components[k];
            stack.extend_from_slice(component.children());
            let inputs = component.input_pins().to_vec();
            for pin in inputs {
                self.pins[pin].set_raw(Some(0));
            }
        }
    }

    /// Evaluates the main component against a set of input values and
    /// returns its output values: ensures the run list is built, clears
    /// all inputs to 0, applies `inputs`, runs one pass, and snapshots the
    /// main outputs.
    pub fn evaluate(&mut self, inputs: &PinValues) -> Result<PinValues> {
        if self.run_list.is_none() {
            self.construct_graph()?;
        }
        let main = self.main.ok_or(SimError::NoMainComponent)?;

        self.clear_inputs(main);
        self.apply_input_values(main, inputs);
        self.run_logic()?;
        Ok(self.output_values(main))
    }

    // ---------------------------------------------------------------- //
    // Export

    /// Rebuilds a template from a live component: boundary pins, children,
    /// and wires in their current order, with boundary wire endpoints
    /// expressed as `None`.
    pub fn export_template(&self, key: ComponentKey) -> ComponentTemplate {
        let component = &self.components[key];
        let pin_template = |&k: &PinKey| {
            let pin = &self.pins[k];
            PinTemplate::new(pin.name(), pin.width(), pin.pin_type())
        };
        let endpoint = |end: WireEnd| {
            let component_name = (end.component != key)
                .then(|| self.components[end.component].name().to_string());
            (component_name, self.pins[end.pin].name().to_string())
        };

        ComponentTemplate {
            type_name: component.type_name().to_string(),
            input_pins: component.input_pins().iter().map(pin_template).collect(),
            output_pins: component.output_pins().iter().map(pin_template).collect(),
            components: component
                .children()
                .iter()
                .map(|&c| {
                    let child = &self.components[c];
                    InstanceTemplate::new(child.name(), child.type_name())
                })
                .collect(),
            wires: component
                .wires()
                .iter()
                .map(|&w| {
                    let (from_component, from_pin) = endpoint(w.from);
                    let (to_component, to_pin) = endpoint(w.to);
                    WireTemplate { from_component, from_pin, to_component, to_pin }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{register_basic_components, Not, Pass};
    use crate::template::{PinType, WireTemplate};

    fn stocked_system() -> System {
        let mut system = System::new();
        register_basic_components(&mut system);
        system
    }

    /// A composite wrapping a single NOT gate.
    fn inverter_template() -> ComponentTemplate {
        ComponentTemplate {
            type_name: "inverter".to_string(),
            input_pins: vec![PinTemplate::new("A", 1, PinType::Bool)],
            output_pins: vec![PinTemplate::new("Y", 1, PinType::Bool)],
            components: vec![InstanceTemplate::new("n1", "not")],
            wires: vec![
                WireTemplate::create("this.A", "n1.in").unwrap(),
                WireTemplate::create("n1.out", "this.Y").unwrap(),
            ],
        }
    }

    #[test]
    fn unknown_type_rejected() {
        let mut system = System::new();
        assert_eq!(
            system.create_component("x", "no-such-type"),
            Err(SimError::ComponentTypeNotFound("no-such-type".to_string()))
        );
    }

    #[test]
    fn unknown_child_pin_rejected_and_rolled_back() {
        let mut system = stocked_system();
        let template = ComponentTemplate {
            wires: vec![WireTemplate::create("this.A", "n1.bogus").unwrap()],
            ..inverter_template()
        };
        system.register_composite_component(template);

        assert_eq!(
            system.create_component("inv", "inverter"),
            Err(SimError::PinNotFound("bogus".to_string()))
        );
        assert!(system.components.is_empty(), "failed instantiation must roll back");
        assert!(system.pins.is_empty(), "failed instantiation must roll back pins");
    }

    #[test]
    fn unknown_child_component_rejected() {
        let mut system = stocked_system();
        let template = ComponentTemplate {
            wires: vec![WireTemplate::create("ghost.out", "this.Y").unwrap()],
            ..inverter_template()
        };
        system.register_composite_component(template);

        assert_eq!(
            system.create_component("inv", "inverter"),
            Err(SimError::ComponentNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn boundary_output_rejected_as_wire_source() {
        let mut system = stocked_system();
        // Y is an output pin; it cannot feed a child.
        let template = ComponentTemplate {
            wires: vec![
                WireTemplate::create("this.Y", "n1.in").unwrap(),
                WireTemplate::create("n1.out", "this.Y").unwrap(),
            ],
            ..inverter_template()
        };
        system.register_composite_component(template);

        assert_eq!(
            system.create_component("inv", "inverter"),
            Err(SimError::PinNotFound("Y".to_string()))
        );
    }

    #[test]
    fn boundary_input_rejected_as_wire_destination() {
        let mut system = stocked_system();
        // A is an input pin; a child cannot drive it.
        let template = ComponentTemplate {
            wires: vec![WireTemplate::create("n1.out", "this.A").unwrap()],
            ..inverter_template()
        };
        system.register_composite_component(template);

        assert_eq!(
            system.create_component("inv", "inverter"),
            Err(SimError::PinNotFound("A".to_string()))
        );
    }

    #[test]
    fn wire_width_mismatch_rejected() {
        let mut system = stocked_system();
        // pass4's pins are 4 bits wide; the boundary pin is 1 bit.
        let template = ComponentTemplate {
            type_name: "bad-widths".to_string(),
            input_pins: vec![PinTemplate::new("A", 1, PinType::Bool)],
            output_pins: vec![],
            components: vec![InstanceTemplate::new("p", "pass4")],
            wires: vec![WireTemplate::create("this.A", "p.in").unwrap()],
        };
        system.register_composite_component(template);

        assert_eq!(
            system.create_component("bad", "bad-widths"),
            Err(SimError::WidthMismatch { pin: "in".to_string(), expected: 4, actual: 1 })
        );
    }

    #[test]
    fn run_requires_constructed_graph() {
        let mut system = stocked_system();
        let main = system.create_component("n1", "not").unwrap();
        system.set_main_component(main);

        assert_eq!(system.run_logic(), Err(SimError::GraphNotConstructed));
        system.construct_graph().unwrap();
        assert_eq!(system.run_logic(), Ok(()));
    }

    #[test]
    fn construct_requires_main() {
        let mut system = stocked_system();
        assert_eq!(system.construct_graph(), Err(SimError::NoMainComponent));
    }

    #[test]
    fn evaluate_primitive_directly() {
        let mut system = stocked_system();
        let main = system.create_component("n1", "not").unwrap();
        system.set_main_component(main);

        let outputs = system.evaluate(&PinValues::from([("in".to_string(), 0)])).unwrap();
        assert_eq!(outputs["out"], 1);
        let outputs = system.evaluate(&PinValues::from([("in".to_string(), 1)])).unwrap();
        assert_eq!(outputs["out"], 0);
    }

    #[test]
    fn apply_inputs_masks_and_ignores_unknown_names() {
        let mut system = stocked_system();
        let main = system.create_component("p", "pass4").unwrap();
        system.set_main_component(main);

        let inputs = PinValues::from([
            ("in".to_string(), 0xFF), // 4-bit pin, should mask to 0xF
            ("nonsense".to_string(), 7),
        ]);
        system.apply_input_values(main, &inputs);
        assert_eq!(system.input_values(main)["in"], 0xF);
    }

    #[test]
    fn unwritten_pins_omitted_from_snapshots() {
        let mut system = stocked_system();
        let main = system.create_component("n1", "not").unwrap();
        assert!(system.input_values(main).is_empty());
        assert!(system.output_values(main).is_empty());
    }

    #[test]
    fn structural_edits_invalidate_run_list() {
        let mut system = stocked_system();
        system.register_composite_component(inverter_template());
        let main = system.create_component("inv", "inverter").unwrap();
        system.set_main_component(main);
        system.construct_graph().unwrap();
        assert_eq!(system.run_logic(), Ok(()));

        system.add_child(main, "n2", "not").unwrap();
        assert_eq!(
            system.run_logic(),
            Err(SimError::GraphNotConstructed),
            "adding a child must invalidate the run list"
        );

        system.construct_graph().unwrap();
        system
            .add_wire(main, &WireTemplate::create("this.A", "n2.in").unwrap())
            .unwrap();
        assert_eq!(
            system.run_logic(),
            Err(SimError::GraphNotConstructed),
            "adding a wire must invalidate the run list"
        );
    }

    #[test]
    fn value_writes_do_not_invalidate_run_list() {
        let mut system = stocked_system();
        let main = system.create_component("n1", "not").unwrap();
        system.set_main_component(main);
        system.construct_graph().unwrap();

        system.apply_input_values(main, &PinValues::from([("in".to_string(), 1)]));
        assert_eq!(system.run_logic(), Ok(()), "value writes must keep the run list");
    }

    #[test]
    fn structural_edits_on_primitive_rejected() {
        let mut system = stocked_system();
        let gate = system.create_component("n1", "not").unwrap();

        assert_eq!(
            system.add_child(gate, "n2", "not"),
            Err(SimError::NotComposite("n1".to_string()))
        );
        assert_eq!(
            system.add_wire(gate, &WireTemplate::create("this.in", "this.out").unwrap()),
            Err(SimError::NotComposite("n1".to_string()))
        );
    }

    #[test]
    fn duplicate_child_name_rejected() {
        let mut system = stocked_system();
        system.register_composite_component(inverter_template());
        let main = system.create_component("inv", "inverter").unwrap();

        assert_eq!(
            system.add_child(main, "n1", "not"),
            Err(SimError::DuplicateChild("n1".to_string()))
        );
    }

    #[test]
    fn remove_component_drops_subtree_and_references() {
        let mut system = stocked_system();
        system.register_composite_component(inverter_template());
        let main = system.create_component("inv", "inverter").unwrap();
        system.set_main_component(main);

        let n1 = system.components[main].child("n1", &system.components).unwrap();
        system.remove_component(n1);

        assert!(system.components[main].children().is_empty());
        assert!(
            system.components[main].wires().is_empty(),
            "wires touching the removed child must be dropped"
        );
        assert!(!system.components.contains_key(n1));

        system.remove_component(main);
        assert!(system.components.is_empty());
        assert!(system.pins.is_empty());
        assert_eq!(system.main_component(), None, "removing main must clear it");
    }

    #[test]
    fn export_round_trip() {
        let mut system = stocked_system();
        system.register_composite_component(inverter_template());
        let main = system.create_component("inv", "inverter").unwrap();

        let exported = system.export_template(main);
        assert_eq!(exported, inverter_template());
    }

    #[test]
    fn create_from_unregistered_template() {
        let mut system = stocked_system();
        let main = system.create_from_template("inv", &inverter_template()).unwrap();
        system.set_main_component(main);

        let outputs = system.evaluate(&PinValues::from([("A".to_string(), 0)])).unwrap();
        assert_eq!(outputs["Y"], 1);
    }

    #[test]
    fn registering_logic_uses_its_own_template() {
        let mut system = System::new();
        system.register_logic(Not::new(1));
        system.register_logic(Pass::new(2));
        assert_eq!(system.template("not").unwrap().input_pins[0].name, "in");
        assert_eq!(system.template("pass2").unwrap().input_pins[0].width, 2);
    }
}
