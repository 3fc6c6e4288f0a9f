use volute::Lut;

use crate::sim::evaluate;
use crate::{Circuit, CircuitConfig, CircuitError, GateKind, Value};

/// Compute the binary truth table of a gate
///
/// Each row is evaluated on a freshly built gate, driving inputs in order from an unknown state.
/// An output left unknown is recorded as 0.
pub fn truth_table(kind: GateKind, width: usize, config: CircuitConfig) -> Result<Lut, CircuitError> {
    let mut lut = Lut::zero(width);
    for mask in 0..lut.num_bits() {
        let mut c = Circuit::with_config(config);
        let n = c.add_gate(kind, width);
        let pattern: Vec<Value> = (0..width)
            .map(|i| Value::from((mask >> i) & 1 != 0))
            .collect();
        let out = evaluate(&mut c, n, &pattern)?;
        if out[0].to_bool() == Some(true) {
            lut.set_bit(mask);
        }
    }
    Ok(lut)
}

#[cfg(test)]
mod tests {
    use volute::Lut;

    use super::truth_table;
    use crate::{CircuitConfig, GateKind};

    fn and_lut(width: usize) -> Lut {
        let mut ret = Lut::one(width);
        for i in 0..width {
            ret = ret & Lut::nth_var(width, i);
        }
        ret
    }

    fn or_lut(width: usize) -> Lut {
        let mut ret = Lut::zero(width);
        for i in 0..width {
            ret = ret | Lut::nth_var(width, i);
        }
        ret
    }

    #[test]
    fn test_primitives() {
        let config = CircuitConfig::default();
        for w in 1..=4 {
            assert_eq!(truth_table(GateKind::And, w, config).unwrap(), and_lut(w));
            assert_eq!(truth_table(GateKind::Or, w, config).unwrap(), or_lut(w));
        }
        assert_eq!(
            truth_table(GateKind::Not, 1, config).unwrap(),
            !Lut::nth_var(1, 0)
        );
    }

    #[test]
    fn test_composites() {
        let config = CircuitConfig::default();
        for w in 1..=4 {
            assert_eq!(truth_table(GateKind::Nand, w, config).unwrap(), !and_lut(w));
            assert_eq!(truth_table(GateKind::Nor, w, config).unwrap(), !or_lut(w));
        }
    }
}
