//! Eager propagation of pin values
//!
//! Setting a pin first pushes the value to all its destinations, depth-first and in connection order,
//! and only then notifies the pin's own listeners. Recalculating a node sets its output pins, which
//! propagate in turn. The recursion is run on an explicit stack of pending steps, each tagged with
//! its depth in the propagation, so that a feedback loop without fixed point is reported instead of
//! exhausting the call stack. Fan-out only widens the stack and is not limited.

use tracing::{trace, warn};

use crate::circuit::circuit::Circuit;
use crate::circuit::error::CircuitError;
use crate::circuit::node::NodeId;
use crate::circuit::pin::{Listener, PinId};
use crate::circuit::value::Value;

/// Pending propagation step
#[derive(Debug, Clone, Copy)]
enum Task {
    /// Assign a value to a pin and propagate it
    Assign {
        pin: PinId,
        value: Value,
        depth: usize,
    },
    /// Call the listeners of a pin, starting at index `next`
    Notify {
        pin: PinId,
        next: usize,
        depth: usize,
    },
}

impl Circuit {
    /// Set the value of a pin and propagate it through the circuit
    ///
    /// Does nothing if the pin already holds this value. Otherwise destinations are updated
    /// first, then listeners are called with the settled value.
    ///
    /// Fails if a chain of updates gets deeper than the configured maximum depth, which happens when
    /// the circuit has a feedback loop that never settles. The circuit is left partially updated.
    pub fn set_value(&mut self, pin: PinId, value: Value) -> Result<(), CircuitError> {
        self.run(
            pin,
            vec![Task::Assign {
                pin,
                value,
                depth: 0,
            }],
        )
    }

    /// Recompute the outputs of a node from its current inputs, and propagate them
    ///
    /// This is called automatically when an input of an auto-calculating node changes.
    /// Nodes without a formula are left untouched.
    pub fn recalculate(&mut self, node: NodeId) -> Result<(), CircuitError> {
        let mut stack = Vec::new();
        self.push_outputs(node, 0, &mut stack);
        let origin = match stack.last() {
            Some(Task::Assign { pin, .. }) => *pin,
            _ => return Ok(()),
        };
        self.run(origin, stack)
    }

    /// Compute the new outputs of a node and schedule their assignment, first output on top
    fn push_outputs(&self, node: NodeId, depth: usize, stack: &mut Vec<Task>) {
        let n = self.node(node);
        let values = n.logic().compute(&self.input_values(node));
        trace!("Recalculating {node}: {} -> {:?}", n.logic(), values);
        stack.extend(
            n.outputs()
                .iter()
                .zip(values)
                .rev()
                .map(|(pin, value)| Task::Assign {
                    pin: *pin,
                    value,
                    depth,
                }),
        );
    }

    fn run(&mut self, origin: PinId, mut stack: Vec<Task>) -> Result<(), CircuitError> {
        let limit = self.config.max_depth;
        while let Some(task) = stack.pop() {
            match task {
                Task::Assign { pin, value, depth } => {
                    let p = &mut self.pins[pin.index()];
                    if p.value == value {
                        continue;
                    }
                    if depth > limit {
                        warn!(
                            "Propagation from {origin} exceeded depth {limit} at {pin}; giving up on a circuit that does not settle"
                        );
                        return Err(CircuitError::PropagationLimit { pin: origin, limit });
                    }
                    trace!("Setting {pin} to {value}");
                    p.value = value;
                    stack.push(Task::Notify {
                        pin,
                        next: 0,
                        depth,
                    });
                    stack.extend(p.destinations.iter().rev().map(|d| Task::Assign {
                        pin: *d,
                        value,
                        depth: depth + 1,
                    }));
                }
                Task::Notify { pin, next, depth } => {
                    let p = &self.pins[pin.index()];
                    let Some(listener) = p.listeners.get(next).cloned() else {
                        continue;
                    };
                    let value = p.value;
                    stack.push(Task::Notify {
                        pin,
                        next: next + 1,
                        depth,
                    });
                    match listener {
                        Listener::Callback(cb) => cb(value),
                        Listener::Recalculate(node) => {
                            self.push_outputs(node, depth + 1, &mut stack)
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::{Circuit, CircuitConfig, CircuitError, Listener, NodeId, PinId, Value};

    fn counter(c: &Rc<Cell<usize>>) -> Listener {
        let c = c.clone();
        Listener::callback(move |_| c.set(c.get() + 1))
    }

    #[test]
    fn test_set_value() {
        let mut c = Circuit::new();
        let p = c.add_pin();
        assert_eq!(c.value(p), Value::Unknown);
        c.set_value(p, Value::High).unwrap();
        assert_eq!(c.value(p), Value::High);
    }

    #[test]
    fn test_idempotence() {
        let mut c = Circuit::new();
        let a = c.add_pin();
        let b = c.add_pin();
        c.connect(a, b);
        let count_a = Rc::new(Cell::new(0));
        let count_b = Rc::new(Cell::new(0));
        c.add_change_listener(a, counter(&count_a));
        c.add_change_listener(b, counter(&count_b));

        c.set_value(a, Value::High).unwrap();
        assert_eq!(count_a.get(), 1);
        assert_eq!(count_b.get(), 1);
        c.set_value(a, Value::High).unwrap();
        assert_eq!(count_a.get(), 1);
        assert_eq!(count_b.get(), 1);
        c.set_value(a, Value::Low).unwrap();
        assert_eq!(count_a.get(), 2);
        assert_eq!(count_b.get(), 2);
    }

    #[test]
    fn test_duplicate_listener_called_once() {
        let mut c = Circuit::new();
        let p = c.add_pin();
        let count = Rc::new(Cell::new(0));
        let l = counter(&count);
        c.add_change_listener(p, l.clone());
        c.add_change_listener(p, l.clone());
        c.set_value(p, Value::Low).unwrap();
        assert_eq!(count.get(), 1);
        c.remove_change_listener(p, &l);
        c.set_value(p, Value::High).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_notification_order() {
        // a -> b -> d, a -> e
        let mut c = Circuit::new();
        let a = c.add_pin();
        let b = c.add_pin();
        let d = c.add_pin();
        let e = c.add_pin();
        c.connect(a, b);
        c.connect(b, d);
        c.connect(a, e);
        let log = Rc::new(RefCell::new(Vec::new()));
        for (p, name) in [(a, "a"), (b, "b"), (d, "d"), (e, "e")] {
            let log = log.clone();
            c.add_change_listener(p, Listener::callback(move |v| log.borrow_mut().push((name, v))));
        }
        let log2 = log.clone();
        c.add_change_listener(a, Listener::callback(move |_| log2.borrow_mut().push(("a2", Value::Unknown))));

        c.set_value(a, Value::High).unwrap();
        // Sinks settle before the pin's own listeners, in connection then registration order
        assert_eq!(
            *log.borrow(),
            vec![
                ("d", Value::High),
                ("b", Value::High),
                ("e", Value::High),
                ("a", Value::High),
                ("a2", Value::Unknown),
            ]
        );
    }

    #[test]
    fn test_listener_sees_settled_downstream() {
        let mut c = Circuit::new();
        let a = c.add_pin();
        let b = c.add_pin();
        c.connect(a, b);
        let seen = Rc::new(Cell::new(Value::Unknown));
        let s = seen.clone();
        c.add_change_listener(a, Listener::callback(move |v| s.set(v)));
        c.set_value(a, Value::Low).unwrap();
        assert_eq!(seen.get(), Value::Low);
        assert_eq!(c.value(b), Value::Low);
    }

    #[test]
    fn test_reconnect() {
        let mut c = Circuit::new();
        let a = c.add_pin();
        let b = c.add_pin();
        c.connect(a, b);
        c.set_value(a, Value::High).unwrap();
        assert_eq!(c.value(b), Value::High);

        c.disconnect(a, b);
        c.set_value(a, Value::Low).unwrap();
        assert_eq!(c.value(b), Value::High);

        c.connect(a, b);
        c.set_value(a, Value::High).unwrap();
        assert_eq!(c.value(b), Value::High);
        c.set_value(a, Value::Low).unwrap();
        assert_eq!(c.value(b), Value::Low);
        assert_eq!(c.destinations(a), &[b]);
    }

    #[test]
    fn test_stable_feedback() {
        // An Or gate feeding back into one of its inputs latches once high
        let mut c = Circuit::new();
        let or = c.or(2);
        let out = c.output_pin(or, 0);
        c.connect(out, c.input_pin(or, 1));
        c.set_value(c.input_pin(or, 0), Value::Low).unwrap();
        assert_eq!(c.value(out), Value::Low);
        c.set_value(c.input_pin(or, 0), Value::High).unwrap();
        assert_eq!(c.value(out), Value::High);
        c.set_value(c.input_pin(or, 0), Value::Low).unwrap();
        assert_eq!(c.value(out), Value::High);
        assert_eq!(c.input_values(or), vec![Value::Low, Value::High]);
    }

    #[test]
    fn test_unstable_feedback() {
        // An inverter driving itself never settles
        let mut c = Circuit::with_config(CircuitConfig::default().with_max_depth(1000));
        let not = c.not();
        let input = c.input_pin(not, 0);
        c.connect(c.output_pin(not, 0), input);
        let res = c.set_value(input, Value::High);
        assert_eq!(
            res,
            Err(CircuitError::PropagationLimit {
                pin: input,
                limit: 1000
            })
        );
    }

    #[test]
    fn test_wide_fanout() {
        // Fan-out wider than the limit settles: only depth counts
        let mut c = Circuit::with_config(CircuitConfig::default().with_max_depth(8));
        let a = c.add_pin();
        let sinks: Vec<PinId> = (0..16).map(|_| c.add_pin()).collect();
        for s in &sinks {
            c.connect(a, *s);
        }
        c.set_value(a, Value::High).unwrap();
        for s in &sinks {
            assert_eq!(c.value(*s), Value::High);
        }

        // Same with gates: one driver feeding 16 inverters
        let a = c.add_pin();
        let nots: Vec<NodeId> = (0..16).map(|_| c.not()).collect();
        for n in &nots {
            c.connect(a, c.input_pin(*n, 0));
        }
        c.set_value(a, Value::Low).unwrap();
        for n in &nots {
            assert_eq!(c.output_values(*n), vec![Value::High]);
        }
    }

    #[test]
    fn test_depth_limit() {
        // a -> b -> c is two steps deep
        for (limit, ok) in [(1, false), (2, true)] {
            let mut c = Circuit::with_config(CircuitConfig::default().with_max_depth(limit));
            let a = c.add_pin();
            let b = c.add_pin();
            let d = c.add_pin();
            c.connect(a, b);
            c.connect(b, d);
            let res = c.set_value(a, Value::High);
            assert_eq!(res.is_ok(), ok);
            assert_eq!(c.value(d) == Value::High, ok);
        }
    }

    #[test]
    fn test_long_chain() {
        // Deeper than what a recursive implementation could handle on a small stack
        let mut c = Circuit::new();
        let first = c.not();
        let mut last = first;
        for _ in 0..20_000 {
            let n = c.not();
            c.connect(c.output_pin(last, 0), c.input_pin(n, 0));
            last = n;
        }
        c.set_value(c.input_pin(first, 0), Value::High).unwrap();
        // 20001 inverters
        assert_eq!(c.value(c.output_pin(last, 0)), Value::Low);
        c.set_value(c.input_pin(first, 0), Value::Unknown).unwrap();
        assert_eq!(c.value(c.output_pin(last, 0)), Value::Unknown);
    }

    #[test]
    fn test_recalculate() {
        let mut c = Circuit::new();
        let and = c.and(2);
        assert_eq!(c.output_values(and), vec![Value::Unknown]);
        c.recalculate(and).unwrap();
        assert_eq!(c.output_values(and), vec![Value::Low]);

        let base = c.add_node(1, 1, false);
        c.recalculate(base).unwrap();
        assert_eq!(c.output_values(base), vec![Value::Unknown]);
    }
}
