use std::fmt;

use crate::circuit::pin::PinId;
use crate::circuit::value::Value;

/// Handle to a node in a circuit
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct NodeId {
    a: u32,
}

impl NodeId {
    /// Create a handle from a node index
    pub(crate) fn from_index(i: usize) -> NodeId {
        NodeId { a: i as u32 }
    }

    /// Obtain the index of the node in the circuit
    pub fn index(&self) -> usize {
        self.a as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.a)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// How the outputs of a node are derived from its inputs
///
/// Primitive gates compute a formula when an input changes.
/// Composite gates have no formula: their boundary pins are wired into the sub-nodes they own.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Logic {
    /// Base node, recalculation does nothing
    Passive,
    /// N-input And, Unknown folds to Low
    And,
    /// N-input Or, Unknown folds to Low
    Or,
    /// Inverter, Unknown stays Unknown
    Not,
    /// Sub-circuit wired between the boundary pins
    Composite(Box<[NodeId]>),
}

impl Logic {
    /// Compute the output values from the input values
    ///
    /// Returns no value for nodes without a formula.
    pub fn compute(&self, inputs: &[Value]) -> Vec<Value> {
        match self {
            Logic::And => vec![inputs.iter().fold(Value::High, |acc, v| acc.and(*v))],
            Logic::Or => vec![inputs.iter().fold(Value::Low, |acc, v| acc.or(*v))],
            Logic::Not => vec![!inputs[0]],
            Logic::Passive | Logic::Composite(_) => Vec::new(),
        }
    }

    /// Returns whether the node computes its outputs directly
    pub fn is_primitive(&self) -> bool {
        matches!(self, Logic::And | Logic::Or | Logic::Not)
    }

    /// Sub-nodes owned by the node
    pub fn children(&self) -> &[NodeId] {
        match self {
            Logic::Composite(c) => c,
            _ => &[],
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Passive => write!(f, "Node"),
            Logic::And => write!(f, "And"),
            Logic::Or => write!(f, "Or"),
            Logic::Not => write!(f, "Not"),
            Logic::Composite(c) => {
                write!(f, "Composite[")?;
                for (i, n) in c.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{n}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Gates that can be built directly
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum GateKind {
    /// N-input And gate
    And,
    /// N-input Or gate
    Or,
    /// Inverter
    Not,
    /// N-input Nand gate, built as Not(And)
    Nand,
    /// N-input Nor gate, built as Not(Or)
    Nor,
}

impl GateKind {
    /// All gate kinds
    pub const ALL: [GateKind; 5] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Not,
        GateKind::Nand,
        GateKind::Nor,
    ];

    /// Width used when none is given
    pub fn default_width(&self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => 2,
        }
    }

    /// Returns whether the width of the gate can be chosen
    pub fn is_nary(&self) -> bool {
        !matches!(self, GateKind::Not)
    }

    /// Returns whether the gate is built from a sub-circuit
    pub fn is_composite(&self) -> bool {
        matches!(self, GateKind::Nand | GateKind::Nor)
    }

    /// Primitive gate whose inversion gives this gate, for composite gates
    pub fn inverted_primitive(&self) -> Option<GateKind> {
        match self {
            GateKind::Nand => Some(GateKind::And),
            GateKind::Nor => Some(GateKind::Or),
            _ => None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::And => "And",
            GateKind::Or => "Or",
            GateKind::Not => "Not",
            GateKind::Nand => "Nand",
            GateKind::Nor => "Nor",
        };
        write!(f, "{name}")
    }
}

/// A node of the circuit, with a fixed number of input and output pins
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) inputs: Box<[PinId]>,
    pub(crate) outputs: Box<[PinId]>,
    pub(crate) logic: Logic,
    pub(crate) auto_calculate: bool,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// Input pins, in order
    pub fn inputs(&self) -> &[PinId] {
        &self.inputs
    }

    /// Output pins, in order
    pub fn outputs(&self) -> &[PinId] {
        &self.outputs
    }

    /// Number of input pins
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output pins
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// How the outputs are derived
    pub fn logic(&self) -> &Logic {
        &self.logic
    }

    /// Whether the node recomputes its outputs when an input changes
    pub fn is_auto_calculate(&self) -> bool {
        self.auto_calculate
    }

    /// Composite node owning this one, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
