use core::fmt;

use fxhash::FxHashSet;
use tracing::debug;

use crate::circuit::config::CircuitConfig;
use crate::circuit::node::{GateKind, Logic, Node, NodeId};
use crate::circuit::pin::{Listener, Pin, PinId};
use crate::circuit::value::Value;

/// Arena holding all pins and nodes of a logic circuit
///
/// Pins and nodes are created once and live as long as the circuit.
/// Edges between pins are plain handle pairs, so nodes never own each other's pins.
///
/// Propagation is eager and synchronous: [`Circuit::set_value`] returns once every
/// dependent pin has settled. Wirings must not contain combinational feedback that
/// fails to reach a fixed point; such loops are stopped by the limit in [`CircuitConfig`].
#[derive(Clone, Default)]
pub struct Circuit {
    pub(crate) pins: Vec<Pin>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) config: CircuitConfig,
}

impl Circuit {
    /// Create a new circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new circuit with the given settings
    pub fn with_config(config: CircuitConfig) -> Self {
        Circuit {
            config,
            ..Default::default()
        }
    }

    /// Settings of the circuit
    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// Return the number of pins
    pub fn nb_pins(&self) -> usize {
        self.pins.len()
    }

    /// Return the number of nodes, including the sub-nodes of composite gates
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the pin with the given handle
    pub fn pin(&self, p: PinId) -> &Pin {
        &self.pins[p.index()]
    }

    /// Get the node with the given handle
    pub fn node(&self, n: NodeId) -> &Node {
        &self.nodes[n.index()]
    }

    /// Handles of all pins
    pub fn pin_ids(&self) -> impl Iterator<Item = PinId> {
        (0..self.nb_pins()).map(PinId::from_index)
    }

    /// Handles of all nodes
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nb_nodes()).map(NodeId::from_index)
    }

    /// Handles of the nodes that are not part of a composite gate
    pub fn top_level_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|n| self.node(*n).parent().is_none())
    }

    /// Add a free-standing pin, initially unknown
    pub fn add_pin(&mut self) -> PinId {
        self.add_pin_with_value(Value::Unknown)
    }

    /// Add a free-standing pin with an initial value
    pub fn add_pin_with_value(&mut self, value: Value) -> PinId {
        let p = PinId::from_index(self.pins.len());
        self.pins.push(Pin::new(value));
        p
    }

    /// Current value of a pin
    pub fn value(&self, p: PinId) -> Value {
        self.pin(p).value
    }

    /// Pin driving this one, if any
    pub fn source(&self, p: PinId) -> Option<PinId> {
        self.pin(p).source
    }

    /// Pins driven by this one, in connection order
    pub fn destinations(&self, p: PinId) -> &[PinId] {
        &self.pin(p).destinations
    }

    /// Listeners of this pin, in registration order
    pub fn listeners(&self, p: PinId) -> &[Listener] {
        &self.pin(p).listeners
    }

    /// Register a listener on a pin; does nothing if it is already registered
    pub fn add_change_listener(&mut self, p: PinId, listener: Listener) {
        let listeners = &mut self.pins[p.index()].listeners;
        if listeners.contains(&listener) {
            return;
        }
        listeners.push(listener);
    }

    /// Unregister a listener from a pin; does nothing if it is not registered
    pub fn remove_change_listener(&mut self, p: PinId, listener: &Listener) {
        let listeners = &mut self.pins[p.index()].listeners;
        if let Some(i) = listeners.iter().position(|l| l == listener) {
            listeners.remove(i);
        }
    }

    /// Make `from` drive `to`; does nothing if they are already connected
    ///
    /// If `to` already had a source, the old edge is removed first.
    /// The current value is not pushed: `to` follows `from` starting with its next change.
    pub fn connect(&mut self, from: PinId, to: PinId) {
        if self.pin(from).drives(to) {
            return;
        }
        debug!("Connecting {from} -> {to}");
        self.pins[from.index()].destinations.push(to);
        self.set_source(to, from);
    }

    /// Remove the edge from `from` to `to`; does nothing if they are not connected
    pub fn disconnect(&mut self, from: PinId, to: PinId) {
        let destinations = &mut self.pins[from.index()].destinations;
        let Some(i) = destinations.iter().position(|p| *p == to) else {
            return;
        };
        debug!("Disconnecting {from} -> {to}");
        destinations.remove(i);
        self.unset_source(to);
    }

    /// Record the source of a pin, severing the edge from its previous source
    fn set_source(&mut self, p: PinId, source: PinId) {
        let old = self.pins[p.index()].source.replace(source);
        if let Some(old) = old {
            if old != source {
                debug!("Disconnecting {old} -> {p}, replaced by {source}");
                self.pins[old.index()].destinations.retain(|d| *d != p);
            }
        }
    }

    /// Clear the source of a pin
    fn unset_source(&mut self, p: PinId) {
        self.pins[p.index()].source = None;
    }

    /// Add a base node, whose recalculation does nothing
    ///
    /// With `auto_calculate`, every input pin gets a listener that recalculates the node.
    pub fn add_node(&mut self, nb_inputs: usize, nb_outputs: usize, auto_calculate: bool) -> NodeId {
        self.add_node_with_logic(nb_inputs, nb_outputs, auto_calculate, Logic::Passive)
    }

    fn add_node_with_logic(
        &mut self,
        nb_inputs: usize,
        nb_outputs: usize,
        auto_calculate: bool,
        logic: Logic,
    ) -> NodeId {
        let n = NodeId::from_index(self.nodes.len());
        let inputs: Box<[PinId]> = (0..nb_inputs).map(|_| self.add_pin()).collect();
        let outputs: Box<[PinId]> = (0..nb_outputs).map(|_| self.add_pin()).collect();
        if auto_calculate {
            for p in inputs.iter() {
                self.add_change_listener(*p, Listener::Recalculate(n));
            }
        }
        self.nodes.push(Node {
            inputs,
            outputs,
            logic,
            auto_calculate,
            parent: None,
        });
        n
    }

    /// Add a composite node, whose behaviour comes from the sub-circuit wired between its pins
    ///
    /// `build` receives the input and output pins of the new node, creates and wires the sub-nodes,
    /// and returns them. They become owned by the composite node.
    ///
    /// ```
    /// # use trilogic::{Circuit, Value};
    /// let mut circuit = Circuit::new();
    /// // A buffer made of two inverters
    /// let buf = circuit.add_composite(1, 1, |c, inputs, outputs| {
    ///     let n0 = c.not();
    ///     let n1 = c.not();
    ///     c.connect(inputs[0], c.input_pin(n0, 0));
    ///     c.connect(c.output_pin(n0, 0), c.input_pin(n1, 0));
    ///     c.connect(c.output_pin(n1, 0), outputs[0]);
    ///     vec![n0, n1]
    /// });
    /// circuit.set_value(circuit.input_pin(buf, 0), Value::High).unwrap();
    /// assert_eq!(circuit.value(circuit.output_pin(buf, 0)), Value::High);
    /// ```
    pub fn add_composite<F>(&mut self, nb_inputs: usize, nb_outputs: usize, build: F) -> NodeId
    where
        F: FnOnce(&mut Circuit, &[PinId], &[PinId]) -> Vec<NodeId>,
    {
        let n = self.add_node(nb_inputs, nb_outputs, false);
        let inputs = self.node(n).inputs.clone();
        let outputs = self.node(n).outputs.clone();
        let children = build(self, &inputs, &outputs);
        for c in &children {
            let child = &mut self.nodes[c.index()];
            assert!(child.parent.is_none(), "Node {c} already belongs to a composite");
            assert!(*c != n);
            child.parent = Some(n);
        }
        self.nodes[n.index()].logic = Logic::Composite(children.into());
        n
    }

    /// Add a gate of the given kind
    pub fn add_gate(&mut self, kind: GateKind, width: usize) -> NodeId {
        assert!(width > 0, "Gates need at least one input");
        let n = match kind {
            GateKind::And => self.add_node_with_logic(width, 1, true, Logic::And),
            GateKind::Or => self.add_node_with_logic(width, 1, true, Logic::Or),
            GateKind::Not => {
                assert_eq!(width, 1, "Not gates have a single input");
                self.add_node_with_logic(1, 1, true, Logic::Not)
            }
            GateKind::Nand => self.add_inverted(GateKind::And, width),
            GateKind::Nor => self.add_inverted(GateKind::Or, width),
        };
        debug!("Created {kind} gate {n} with {width} inputs");
        n
    }

    /// Build Not(gate) as a composite
    fn add_inverted(&mut self, kind: GateKind, width: usize) -> NodeId {
        self.add_composite(width, 1, |c, inputs, outputs| {
            let inner = c.add_gate(kind, width);
            let not = c.not();
            for (i, p) in inputs.iter().enumerate() {
                let d = c.input_pin(inner, i);
                c.connect(*p, d);
            }
            let inner_out = c.output_pin(inner, 0);
            let not_in = c.input_pin(not, 0);
            c.connect(inner_out, not_in);
            let not_out = c.output_pin(not, 0);
            c.connect(not_out, outputs[0]);
            vec![inner, not]
        })
    }

    /// Create an n-input And gate
    pub fn and(&mut self, width: usize) -> NodeId {
        self.add_gate(GateKind::And, width)
    }

    /// Create an n-input Or gate
    pub fn or(&mut self, width: usize) -> NodeId {
        self.add_gate(GateKind::Or, width)
    }

    /// Create an inverter
    pub fn not(&mut self) -> NodeId {
        self.add_gate(GateKind::Not, 1)
    }

    /// Create an n-input Nand gate
    pub fn nand(&mut self, width: usize) -> NodeId {
        self.add_gate(GateKind::Nand, width)
    }

    /// Create an n-input Nor gate
    pub fn nor(&mut self, width: usize) -> NodeId {
        self.add_gate(GateKind::Nor, width)
    }

    /// Get the input pin of a node at index i
    pub fn input_pin(&self, n: NodeId, i: usize) -> PinId {
        let node = self.node(n);
        assert!(i < node.nb_inputs());
        node.inputs[i]
    }

    /// Get the output pin of a node at index i
    pub fn output_pin(&self, n: NodeId, i: usize) -> PinId {
        let node = self.node(n);
        assert!(i < node.nb_outputs());
        node.outputs[i]
    }

    /// Current values of the input pins of a node
    pub fn input_values(&self, n: NodeId) -> Vec<Value> {
        self.node(n).inputs.iter().map(|p| self.value(*p)).collect()
    }

    /// Current values of the output pins of a node
    pub fn output_values(&self, n: NodeId) -> Vec<Value> {
        self.node(n).outputs.iter().map(|p| self.value(*p)).collect()
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        for p in self.pin_ids() {
            let pin = self.pin(p);
            let mut seen = FxHashSet::default();
            for d in pin.destinations() {
                assert!(d.index() < self.nb_pins(), "Invalid destination {d} of {p}");
                assert!(seen.insert(*d), "Duplicate destination {d} of {p}");
                assert_eq!(self.source(*d), Some(p), "Destination {d} of {p} has another source");
            }
            if let Some(s) = pin.source() {
                assert!(s.index() < self.nb_pins(), "Invalid source {s} of {p}");
                assert!(self.pin(s).drives(p), "Source {s} does not drive {p}");
            }
            for l in pin.listeners() {
                if let Listener::Recalculate(n) = l {
                    assert!(n.index() < self.nb_nodes(), "Invalid listener {n} on {p}");
                    assert!(self.node(*n).inputs().contains(&p));
                }
            }
        }
        for n in self.node_ids() {
            let node = self.node(n);
            for p in node.inputs().iter().chain(node.outputs().iter()) {
                assert!(p.index() < self.nb_pins(), "Invalid pin {p} of {n}");
            }
            for c in node.logic().children() {
                assert_eq!(self.node(*c).parent(), Some(n), "Invalid parent for {c}");
            }
            if let Some(parent) = node.parent() {
                assert!(self.node(parent).logic().children().contains(&n));
            }
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit with {} nodes, {} pins:",
            self.nb_nodes(),
            self.nb_pins()
        )?;
        for n in self.node_ids() {
            let node = self.node(n);
            write!(f, "\t{} = {}(", n, node.logic())?;
            for (i, p) in node.inputs().iter().enumerate() {
                if i != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", p, self.value(*p))?;
            }
            write!(f, ") ->")?;
            for p in node.outputs() {
                write!(f, " {}={}", p, self.value(*p))?;
            }
            if let Some(parent) = node.parent() {
                write!(f, " in {parent}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
