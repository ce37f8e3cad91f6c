#![allow(
    clippy::upper_case_acronyms,
    non_camel_case_types,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Per-line coherence controller for a snooping, bus-based multiprocessor
//! cache simulator implementing the MOESIF protocol.
//!
//! The controller is a pure transition function: given the current
//! [`State`] of a line and one event (a processor [`request::ProcessorRequest`]
//! or a snooped [`request::BusMessage`]) it returns the next state together
//! with the list of [`Action`]s the surrounding simulator must carry out.
//! [`Line`] wraps the transition function for callers that want the state
//! stored for them and the actions applied through an [`env::Environment`].

pub mod bus;
pub mod config;
pub mod env;
pub mod error;
pub mod event;
pub mod line;
pub mod protocol;
pub mod request;
pub mod state;
pub mod sync;

#[cfg(test)]
pub mod testing;

pub use config::Config;
pub use error::ProtocolViolation;
pub use event::Action;
pub use line::Line;
pub use protocol::{moesif::MOESIF, Protocol, Transition};
pub use state::State;
pub use stats::Counter;

#[allow(non_camel_case_types)]
pub type address = u64;

/// Identifier of a cache (module) attached to the bus.
pub type CacheId = usize;
