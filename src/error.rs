//! Error taxonomy (component §7).
//!
//! Most failure modes in this crate are contract violations — negative
//! time, a transition called on an atomic whose domain excludes it, a
//! coupling naming a component or port that does not exist — and those stay
//! `panic!`/`debug_assert!`, exactly as in the reference crate and the
//! original C++ implementation: they are programming errors made by the
//! model author at the same call site, not data the caller should recover
//! from.
//!
//! The one class of failure this crate turns into a typed, recoverable
//! error is *malformed composition discovered while wiring couplings built
//! from external data*: a type mismatch between two ports, or the same
//! coupling registered twice. A driver program assembling a [`Coupled`]
//! from, say, a config file can catch [`CompositionError`] and report it
//! instead of aborting the process.
//!
//! [`Coupled`]: crate::modeling::Coupled

use thiserror::Error;

/// A coupling could not be registered on a [`Coupled`](crate::modeling::Coupled) model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// The source and destination ports carry different concrete message
    /// types, so messages from one could never be delivered to the other.
    #[error("cannot couple port '{from}' to port '{to}': incompatible message types")]
    IncompatiblePorts { from: String, to: String },

    /// The exact same `(from, to)` coupling was already registered.
    #[error("duplicate coupling from port '{from}' to port '{to}'")]
    DuplicateCoupling { from: String, to: String },
}

/// A trace line handed to [`EventStream`](crate::models::EventStream) could
/// not be parsed as `<time> <value>`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed event-stream record {line:?}: {reason}")]
pub struct ParseError {
    pub line: String,
    pub reason: String,
}
