use crate::circuit::pin::PinId;

/// Errors reported by circuit operations
///
/// Wiring operations never fail. Only propagation can, when a feedback loop never settles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CircuitError {
    /// A chain of updates got deeper than the limit; the wiring most likely contains an unstable feedback loop
    #[error("propagation from {pin} exceeded depth {limit}; the circuit most likely has a feedback loop without fixed point")]
    PropagationLimit {
        /// Pin whose assignment started the propagation
        pin: PinId,
        /// Configured limit
        limit: usize,
    },

    /// A string could not be parsed as a value
    #[error("invalid value {0:?}, expected 0, 1 or x")]
    InvalidValue(String),
}
