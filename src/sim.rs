//! Simulation of a logic circuit by driving its pins
//!
//! Propagation is eager, so simulating is just setting pins in order and reading the settled values.
//! Driving inputs one at a time means a gate may be recalculated on a partially updated input vector;
//! the final values only depend on the last settled state.

mod patterns;
mod truth_table;

use crate::{Circuit, CircuitError, NodeId, PinId, Value};

pub use patterns::{
    binary_patterns, exhaustive_patterns, generate_random_patterns, nb_exhaustive_patterns,
};
pub use truth_table::truth_table;

/// Drive the inputs of a node in order; return its output values
pub fn evaluate(c: &mut Circuit, node: NodeId, pattern: &[Value]) -> Result<Vec<Value>, CircuitError> {
    assert_eq!(pattern.len(), c.node(node).nb_inputs());
    for (i, v) in pattern.iter().enumerate() {
        let p = c.input_pin(node, i);
        c.set_value(p, *v)?;
    }
    Ok(c.output_values(node))
}

/// Apply each pattern to the driver pins in order; return the values of the observed pins after each one
pub fn simulate(
    c: &mut Circuit,
    drivers: &[PinId],
    observed: &[PinId],
    patterns: &[Vec<Value>],
) -> Result<Vec<Vec<Value>>, CircuitError> {
    let mut ret = Vec::new();
    for pattern in patterns {
        assert_eq!(pattern.len(), drivers.len());
        for (p, v) in drivers.iter().zip(pattern) {
            c.set_value(*p, *v)?;
        }
        ret.push(observed.iter().map(|p| c.value(*p)).collect());
    }
    Ok(ret)
}
