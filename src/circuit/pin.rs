use std::fmt;
use std::rc::Rc;

use crate::circuit::node::NodeId;
use crate::circuit::value::Value;

/// Handle to a pin in a circuit
///
/// Pins are never removed, so handles stay valid for the lifetime of the circuit.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct PinId {
    a: u32,
}

impl PinId {
    /// Create a handle from a pin index
    pub(crate) fn from_index(i: usize) -> PinId {
        PinId { a: i as u32 }
    }

    /// Obtain the index of the pin in the circuit
    pub fn index(&self) -> usize {
        self.a as usize
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.a)
    }
}

impl fmt::Debug for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// External callback, called with the new value of the pin
pub type Callback = Rc<dyn Fn(Value)>;

/// Observer of a pin's value changes
///
/// Listeners are called in registration order, once the whole downstream subtree has settled.
#[derive(Clone)]
pub enum Listener {
    /// Recompute the outputs of an auto-calculating node
    Recalculate(NodeId),
    /// Call external code
    Callback(Callback),
}

impl Listener {
    /// Wrap a closure as a listener
    ///
    /// Keep a clone of the listener to be able to remove it later: callbacks compare by identity.
    pub fn callback<F: Fn(Value) + 'static>(f: F) -> Listener {
        Listener::Callback(Rc::new(f))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Listener::Recalculate(a), Listener::Recalculate(b)) => a == b,
            (Listener::Callback(a), Listener::Callback(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Recalculate(n) => write!(f, "Recalculate({n})"),
            Listener::Callback(cb) => write!(f, "Callback({:p})", Rc::as_ptr(cb)),
        }
    }
}

/// State of a single pin
///
/// Edges are stored on both ends: the driving pin lists its destinations,
/// and each destination keeps a back-reference to its source.
#[derive(Debug, Clone, Default)]
pub struct Pin {
    pub(crate) value: Value,
    pub(crate) destinations: Vec<PinId>,
    pub(crate) source: Option<PinId>,
    pub(crate) listeners: Vec<Listener>,
}

impl Pin {
    /// Create an unconnected pin
    pub(crate) fn new(value: Value) -> Pin {
        Pin {
            value,
            ..Default::default()
        }
    }

    /// Current value
    pub fn value(&self) -> Value {
        self.value
    }

    /// Pins driven by this one, in connection order
    pub fn destinations(&self) -> &[PinId] {
        &self.destinations
    }

    /// Pin driving this one, if any
    pub fn source(&self) -> Option<PinId> {
        self.source
    }

    /// Registered listeners, in registration order
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Returns whether `other` is a destination of this pin
    pub fn drives(&self, other: PinId) -> bool {
        self.destinations.contains(&other)
    }
}
