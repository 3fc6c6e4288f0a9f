//! Compute circuit statistics
//!
//! ```
//! # use trilogic::Circuit;
//! # let mut circuit = Circuit::new();
//! # circuit.nand(2);
//! use trilogic::circuit::stats::stats;
//! let stats = stats(&circuit);
//!
//! // The Nand gate is made of an And and a Not
//! assert_eq!(stats.nb_composite, 1);
//! assert_eq!(stats.nb_and, 1);
//! assert_eq!(stats.nb_not, 1);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::{Circuit, Listener, Logic};

/// Number of pins, edges and nodes in a circuit
#[derive(Clone, Debug)]
pub struct CircuitStats {
    /// Number of pins
    pub nb_pins: usize,
    /// Number of pin-to-pin connections
    pub nb_edges: usize,
    /// Number of external callbacks
    pub nb_callbacks: usize,
    /// Number of nodes that are not part of a composite
    pub nb_top_level: usize,
    /// Number of And gates
    pub nb_and: usize,
    /// Arity of And gates
    pub and_arity: Vec<usize>,
    /// Number of Or gates
    pub nb_or: usize,
    /// Arity of Or gates
    pub or_arity: Vec<usize>,
    /// Number of Not gates
    pub nb_not: usize,
    /// Number of composite nodes
    pub nb_composite: usize,
    /// Number of base nodes without formula
    pub nb_passive: usize,
}

impl CircuitStats {
    /// Total number of nodes, including those inside composites
    pub fn nb_nodes(&self) -> usize {
        self.nb_and + self.nb_or + self.nb_not + self.nb_composite + self.nb_passive
    }

    /// Number of primitive gates
    pub fn nb_primitives(&self) -> usize {
        self.nb_and + self.nb_or + self.nb_not
    }

    fn add_and(&mut self, sz: usize) {
        self.nb_and += 1;
        record_arity(&mut self.and_arity, sz);
    }

    fn add_or(&mut self, sz: usize) {
        self.nb_or += 1;
        record_arity(&mut self.or_arity, sz);
    }
}

fn record_arity(arity: &mut Vec<usize>, sz: usize) {
    if arity.len() <= sz {
        arity.resize(sz + 1, 0);
    }
    arity[sz] += 1;
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Pins: {}", self.nb_pins)?;
        writeln!(f, "  Connections: {}", self.nb_edges)?;
        writeln!(f, "  Nodes: {}", self.nb_nodes())?;
        writeln!(f, "      top level: {}", self.nb_top_level)?;
        if self.nb_callbacks != 0 {
            writeln!(f, "  Callbacks: {}", self.nb_callbacks)?;
        }
        if self.nb_composite != 0 {
            writeln!(f, "  Composite: {}", self.nb_composite)?;
        }
        if self.nb_and != 0 {
            writeln!(f, "  And: {}", self.nb_and)?;
            for (i, nb) in self.and_arity.iter().enumerate() {
                if *nb != 0 {
                    writeln!(f, "      {}: {}", i, nb)?;
                }
            }
        }
        if self.nb_or != 0 {
            writeln!(f, "  Or: {}", self.nb_or)?;
            for (i, nb) in self.or_arity.iter().enumerate() {
                if *nb != 0 {
                    writeln!(f, "      {}: {}", i, nb)?;
                }
            }
        }
        if self.nb_not != 0 {
            writeln!(f, "  Not: {}", self.nb_not)?;
        }
        if self.nb_passive != 0 {
            writeln!(f, "  Passive: {}", self.nb_passive)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the circuit
pub fn stats(c: &Circuit) -> CircuitStats {
    let mut ret = CircuitStats {
        nb_pins: c.nb_pins(),
        nb_edges: 0,
        nb_callbacks: 0,
        nb_top_level: c.top_level_nodes().count(),
        nb_and: 0,
        and_arity: Vec::new(),
        nb_or: 0,
        or_arity: Vec::new(),
        nb_not: 0,
        nb_composite: 0,
        nb_passive: 0,
    };
    for p in c.pin_ids() {
        ret.nb_edges += c.destinations(p).len();
        ret.nb_callbacks += c
            .listeners(p)
            .iter()
            .filter(|l| matches!(l, Listener::Callback(_)))
            .count();
    }
    for n in c.node_ids() {
        let node = c.node(n);
        match node.logic() {
            Logic::And => ret.add_and(node.nb_inputs()),
            Logic::Or => ret.add_or(node.nb_inputs()),
            Logic::Not => ret.nb_not += 1,
            Logic::Composite(_) => ret.nb_composite += 1,
            Logic::Passive => ret.nb_passive += 1,
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::stats;
    use crate::{Circuit, Listener};

    #[test]
    fn test_stats() {
        let mut c = Circuit::new();
        c.and(2);
        c.and(3);
        c.nor(3);
        c.add_node(1, 2, false);
        let p = c.add_pin();
        c.add_change_listener(p, Listener::callback(|_| {}));

        let s = stats(&c);
        assert_eq!(s.nb_and, 2);
        assert_eq!(s.and_arity, vec![0, 0, 1, 1]);
        assert_eq!(s.nb_or, 1);
        assert_eq!(s.or_arity, vec![0, 0, 0, 1]);
        assert_eq!(s.nb_not, 1);
        assert_eq!(s.nb_composite, 1);
        assert_eq!(s.nb_passive, 1);
        assert_eq!(s.nb_nodes(), 6);
        assert_eq!(s.nb_primitives(), 4);
        assert_eq!(s.nb_top_level, 4);
        assert_eq!(s.nb_callbacks, 1);
        // Nor: 3 inputs, Or to Not, Not to output
        assert_eq!(s.nb_edges, 5);
        assert_eq!(s.nb_pins, c.nb_pins());
    }

    #[test]
    fn test_display() {
        let mut c = Circuit::new();
        c.not();
        let s = format!("{}", stats(&c));
        assert!(s.contains("Not: 1"));
        assert!(!s.contains("And"));
    }
}
