use crate::{request::Event, state::State, CacheId};

/// Why an event is illegal in the state it arrived in.
#[derive(thiserror::Error, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Reason {
    /// A processor request arrived while a GET is still pending.
    #[error("more than one outstanding request per processor")]
    OutstandingRequest,
    /// DATA was observed for a line that already holds a valid copy.
    #[error("should not see data for this line, line already held")]
    DataWhileValid,
}

impl Reason {
    #[must_use]
    pub fn at(self, cache: CacheId, state: State, event: impl Into<Event>) -> ProtocolViolation {
        ProtocolViolation {
            cache,
            state,
            event: event.into(),
            reason: self,
        }
    }
}

/// An event arrived that the protocol does not allow in the current state.
///
/// Always fatal: past this point the simulated memory state can no longer
/// be trusted.
#[derive(thiserror::Error, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[error("cache {cache}: {reason} (got {event} in state {state})")]
pub struct ProtocolViolation {
    pub cache: CacheId,
    pub state: State,
    pub event: Event,
    pub reason: Reason,
}
