pub mod moesif;

pub use moesif::MOESIF;

use crate::{
    error::Reason,
    event::{Action, Actions},
    request::{BusMessage, ProcessorRequest},
    state::{LabelStyle, State},
};

/// Read side of the wired-OR shared line.
///
/// Sampled by a handler only when DATA completes a transient read.
pub trait SharedLine {
    #[must_use]
    fn is_asserted(&self) -> bool;
}

impl SharedLine for bool {
    #[inline]
    fn is_asserted(&self) -> bool {
        *self
    }
}

/// Outcome of delivering one event to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub actions: Actions,
}

impl Transition {
    /// Keep the current state and emit nothing.
    #[must_use]
    pub fn stay(state: State) -> Self {
        Self::to(state)
    }

    #[must_use]
    pub fn to(next: State) -> Self {
        Self {
            next,
            actions: Actions::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// A cache coherence controller.
///
/// Each protocol variant implements this as a peer. Handlers are pure:
/// they read the current state and one event and describe the next state
/// and the emitted actions. Applying them is up to the caller.
pub trait Protocol: std::fmt::Debug + Send + Sync + 'static {
    #[must_use]
    fn name(&self) -> &'static str;

    /// State of a freshly allocated line.
    #[must_use]
    fn initial_state(&self) -> State {
        State::I
    }

    /// React to a load or store from the owning core.
    fn process_cache_request(
        &self,
        state: State,
        request: &ProcessorRequest,
    ) -> Result<Transition, Reason>;

    /// React to a message observed on the bus.
    fn process_snoop_request(
        &self,
        state: State,
        message: &BusMessage,
        shared_line: &dyn SharedLine,
    ) -> Result<Transition, Reason>;

    /// Diagnostic label of a state.
    #[must_use]
    fn dump(&self, state: State, style: LabelStyle) -> &'static str {
        state.dump(style)
    }
}
