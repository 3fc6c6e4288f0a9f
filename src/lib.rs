//! Three-state combinational logic circuits
//!
//! This crate models logic circuits as pins carrying a value (1, 0 or x), connected into gates.
//! Setting a pin propagates the new value through the connected graph, recomputing the outputs of
//! every dependent gate before returning.
//!
//! # Usage
//!
//! ```bash
//! # Show how a gate is built
//! trilogic show nand -w 3
//! # Print the truth table of a gate
//! trilogic table nor -w 2
//! # Check a composite gate against an explicit wiring of its primitives
//! trilogic check nand -w 8 --random 10000
//! ```
//!
//! # Development
//!
//! ## Datastructures
//!
//! `Circuit` is an arena holding every pin and node; `PinId` and `NodeId` are stable handles into it.
//! A pin has a value, an ordered list of destinations it drives, at most one source driving it,
//! and an ordered list of listeners called when its value changes.
//!
//! Nodes have a fixed number of input and output pins:
//! * primitive gates (And, Or, Not) recompute their outputs when any input changes;
//! * composite gates (Nand, Nor) have no formula: their boundary pins are wired into sub-nodes they own.
//!
//! Unknown inputs fold to low in And and Or gates, while Not keeps them unknown.
//!
//! For example, here is a Nand gate driven in two steps:
//! ```
//! # use trilogic::{Circuit, Value};
//! let mut circuit = Circuit::new();
//! let nand = circuit.nand(2);
//! circuit.set_value(circuit.input_pin(nand, 0), Value::High).unwrap();
//! assert_eq!(circuit.value(circuit.output_pin(nand, 0)), Value::High);
//! circuit.set_value(circuit.input_pin(nand, 1), Value::High).unwrap();
//! assert_eq!(circuit.value(circuit.output_pin(nand, 0)), Value::Low);
//! ```
//!
//! ## Propagation
//!
//! Propagation is single-threaded, synchronous and zero-delay. A pin pushes its new value to its
//! destinations depth-first, and notifies its own listeners only once they have settled.
//! Wirings must not contain combinational feedback that fails to reach a fixed point: such a loop
//! is stopped once a chain of updates gets deeper than a configurable limit, and reported as an error.

#![warn(missing_docs)]

pub mod circuit;
pub mod equiv;
pub mod sim;

pub use circuit::{
    stats, Callback, Circuit, CircuitConfig, CircuitError, GateKind, Listener, Logic, Node, NodeId,
    Pin, PinId, Value,
};
