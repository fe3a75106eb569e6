//! Error types for circuit construction and evaluation.

use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while building or running a circuit.
///
/// All of these indicate design-time mistakes in the circuit (a bad type
/// name, mismatched widths, cyclic feedback). They abort the operation that
/// triggered them and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A component type name was not found in the registry.
    #[error("component type not registered: '{0}'")]
    ComponentTypeNotFound(String),

    /// A named child component did not resolve during wiring or lookup.
    #[error("component not found: '{0}'")]
    ComponentNotFound(String),

    /// A named pin did not resolve during wiring or lookup.
    #[error("pin not found: '{0}'")]
    PinNotFound(String),

    /// A child was added under a name the parent already uses.
    #[error("duplicate child name: '{0}'")]
    DuplicateChild(String),

    /// A structural edit targeted a primitive component.
    #[error("component '{0}' is not a composite")]
    NotComposite(String),

    /// Two connected pins (or a write and its target pin) disagree on width.
    #[error("width mismatch on pin '{pin}': expected {expected}, got {actual}")]
    WidthMismatch {
        /// Name of the pin being written.
        pin: String,
        /// The pin's declared width.
        expected: u8,
        /// The width of the offending write or source pin.
        actual: u8,
    },

    /// A written value does not fit in the pin's declared width.
    #[error("value {value} does not fit in {width} bits")]
    ValueTooWide {
        /// The offending value.
        value: u64,
        /// The declared pin width.
        width: u8,
    },

    /// The flattened circuit contains combinational feedback and cannot be
    /// ordered for a single-pass run.
    #[error("circuit contains combinational feedback: {unordered} vertices could not be ordered")]
    CircuitHasCycle {
        /// Number of graph vertices left unordered by the topological sort.
        unordered: usize,
    },

    /// A dotted wire endpoint string was not of the form `component.pin`.
    #[error("wire endpoint '{0}' is not of the form 'component.pin'")]
    MalformedEndpoint(String),

    /// No main component has been set on the system.
    #[error("no main component has been set")]
    NoMainComponent,

    /// `run_logic` was called before a run order was built.
    #[error("run order has not been built; call construct_graph first")]
    GraphNotConstructed,
}
