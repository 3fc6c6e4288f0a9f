//! Equivalence checking of gates by simulation
//!
//! Both candidates are built in the same circuit and driven by the same pins, so they see the exact
//! same sequence of input changes, including the partially updated input vectors in between.

use tracing::debug;

use crate::{Circuit, CircuitConfig, CircuitError, GateKind, NodeId, PinId, Value};

/// Reasons for an equivalence check to fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquivalenceError {
    /// The two nodes disagree after applying this pattern
    #[error("outputs differ for input pattern {0:?}")]
    Mismatch(Vec<Value>),

    /// Propagation failed
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// Two nodes sharing the same input drivers
pub struct EquivalenceChecker {
    circuit: Circuit,
    drivers: Vec<PinId>,
    a: NodeId,
    b: NodeId,
}

impl EquivalenceChecker {
    /// Build both nodes and connect them to shared drivers
    ///
    /// The builders may create any number of nodes, and return the one whose pins are compared.
    pub fn new<FA, FB>(nb_inputs: usize, build_a: FA, build_b: FB, config: CircuitConfig) -> Self
    where
        FA: FnOnce(&mut Circuit) -> NodeId,
        FB: FnOnce(&mut Circuit) -> NodeId,
    {
        let mut circuit = Circuit::with_config(config);
        let drivers: Vec<PinId> = (0..nb_inputs).map(|_| circuit.add_pin()).collect();
        let a = build_a(&mut circuit);
        let b = build_b(&mut circuit);
        for n in [a, b] {
            let node = circuit.node(n);
            assert_eq!(node.nb_inputs(), nb_inputs);
            assert_eq!(node.nb_outputs(), circuit.node(a).nb_outputs());
            for (i, d) in drivers.iter().enumerate() {
                let p = circuit.input_pin(n, i);
                circuit.connect(*d, p);
            }
        }
        EquivalenceChecker {
            circuit,
            drivers,
            a,
            b,
        }
    }

    /// The circuit holding both nodes
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Drive a pattern; return whether both nodes have the same outputs
    pub fn check_pattern(&mut self, pattern: &[Value]) -> Result<bool, CircuitError> {
        assert_eq!(pattern.len(), self.drivers.len());
        for (d, v) in self.drivers.iter().zip(pattern) {
            self.circuit.set_value(*d, *v)?;
        }
        Ok(self.circuit.output_values(self.a) == self.circuit.output_values(self.b))
    }
}

/// Check that two nodes behave the same on a sequence of patterns
///
/// Returns the first pattern where the outputs differ.
pub fn check_equivalence<FA, FB>(
    nb_inputs: usize,
    build_a: FA,
    build_b: FB,
    patterns: &[Vec<Value>],
    config: CircuitConfig,
) -> Result<(), EquivalenceError>
where
    FA: FnOnce(&mut Circuit) -> NodeId,
    FB: FnOnce(&mut Circuit) -> NodeId,
{
    let mut checker = EquivalenceChecker::new(nb_inputs, build_a, build_b, config);
    for p in patterns {
        if !checker.check_pattern(p)? {
            debug!("Mismatch for pattern {:?}", p);
            return Err(EquivalenceError::Mismatch(p.clone()));
        }
    }
    Ok(())
}

/// Build a composite gate and its reference wiring, an explicit Not after the primitive gate
pub fn composite_checker(kind: GateKind, width: usize, config: CircuitConfig) -> EquivalenceChecker {
    let Some(primitive) = kind.inverted_primitive() else {
        panic!("{kind} is not a composite gate");
    };
    EquivalenceChecker::new(
        width,
        |c| c.add_gate(kind, width),
        |c| reference_inverted(c, primitive, width),
        config,
    )
}

/// Check a composite gate against its reference wiring
pub fn check_composite(
    kind: GateKind,
    width: usize,
    patterns: &[Vec<Value>],
    config: CircuitConfig,
) -> Result<(), EquivalenceError> {
    let mut checker = composite_checker(kind, width, config);
    for p in patterns {
        if !checker.check_pattern(p)? {
            return Err(EquivalenceError::Mismatch(p.clone()));
        }
    }
    Ok(())
}

/// Not(gate) wired by hand inside a base node, without using the composite builder
fn reference_inverted(c: &mut Circuit, primitive: GateKind, width: usize) -> NodeId {
    let top = c.add_node(width, 1, false);
    let inner = c.add_gate(primitive, width);
    let not = c.not();
    for i in 0..width {
        let from = c.input_pin(top, i);
        let to = c.input_pin(inner, i);
        c.connect(from, to);
    }
    let from = c.output_pin(inner, 0);
    let to = c.input_pin(not, 0);
    c.connect(from, to);
    let from = c.output_pin(not, 0);
    let to = c.output_pin(top, 0);
    c.connect(from, to);
    top
}

#[cfg(test)]
mod tests {
    use super::{check_composite, check_equivalence, EquivalenceError};
    use crate::sim::{exhaustive_patterns, generate_random_patterns};
    use crate::{CircuitConfig, GateKind, Value};

    #[test]
    fn test_composites() {
        let config = CircuitConfig::default();
        for width in 1..=4 {
            let patterns: Vec<_> = exhaustive_patterns(width).collect();
            check_composite(GateKind::Nand, width, &patterns, config).unwrap();
            check_composite(GateKind::Nor, width, &patterns, config).unwrap();
        }
    }

    #[test]
    fn test_composites_random() {
        let config = CircuitConfig::default();
        for seed in 0..4 {
            let patterns = generate_random_patterns(8, 200, seed);
            check_composite(GateKind::Nand, 8, &patterns, config).unwrap();
            check_composite(GateKind::Nor, 8, &patterns, config).unwrap();
        }
    }

    #[test]
    fn test_equiv_and() {
        let patterns: Vec<_> = exhaustive_patterns(3).collect();
        check_equivalence(
            3,
            |c| c.and(3),
            |c| c.and(3),
            &patterns,
            CircuitConfig::default(),
        )
        .unwrap();
    }

    #[test]
    fn test_not_equiv() {
        let patterns: Vec<_> = exhaustive_patterns(2).collect();
        let res = check_equivalence(
            2,
            |c| c.and(2),
            |c| c.or(2),
            &patterns,
            CircuitConfig::default(),
        );
        // Both agree on the first pattern (all low), not on the second one
        assert_eq!(
            res,
            Err(EquivalenceError::Mismatch(vec![Value::Low, Value::High]))
        );
    }

    #[test]
    #[should_panic]
    fn test_not_composite() {
        check_composite(GateKind::And, 2, &[], CircuitConfig::default()).unwrap();
    }
}
