//! Representation and handling of logic circuits

mod circuit;
mod config;
mod error;
mod node;
mod pin;
mod propagate;
pub mod stats;
mod value;

pub use circuit::Circuit;
pub use config::CircuitConfig;
pub use error::CircuitError;
pub use node::{GateKind, Logic, Node, NodeId};
pub use pin::{Callback, Listener, Pin, PinId};
pub use value::Value;
