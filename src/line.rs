use crate::{
    address,
    env::{self, Environment},
    error::ProtocolViolation,
    protocol::{Protocol, Transition},
    request::{BusMessage, Event, ProcessorRequest},
    state::{LabelStyle, State},
    CacheId,
};
use console::style;
use itertools::Itertools;

/// Coherence controller of one cache line.
///
/// Owns the line's state exclusively. Events are delivered one at a time
/// and each call runs to completion; waiting for DATA is a transient state,
/// never a blocked call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<P> {
    protocol: P,
    cache: CacheId,
    addr: address,
    state: State,
    log_transitions: bool,
}

impl<P> std::fmt::Display for Line<P>
where
    P: Protocol,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Line")
            .field("cache", &self.cache)
            .field("addr", &format_args!("{:#x}", self.addr))
            .field("state", &self.state)
            .finish()
    }
}

impl<P> Line<P>
where
    P: Protocol,
{
    #[must_use]
    pub fn new(protocol: P, cache: CacheId, addr: address) -> Self {
        let state = protocol.initial_state();
        Self {
            protocol,
            cache,
            addr,
            state,
            log_transitions: true,
        }
    }

    #[must_use]
    pub fn with_transition_logging(mut self, enabled: bool) -> Self {
        self.log_transitions = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn cache(&self) -> CacheId {
        self.cache
    }

    #[inline]
    #[must_use]
    pub fn addr(&self) -> address {
        self.addr
    }

    /// Diagnostic snapshot of the state.
    #[must_use]
    pub fn dump(&self, style: LabelStyle) -> String {
        format!(
            "{} - cache {} @ {:#x} - state: {}",
            self.protocol.name(),
            self.cache,
            self.addr,
            self.protocol.dump(self.state, style)
        )
    }

    /// Deliver a load or store from the owning core.
    pub fn process_cache_request<E>(
        &mut self,
        request: &ProcessorRequest,
        env: &mut E,
    ) -> Result<State, ProtocolViolation>
    where
        E: Environment,
    {
        debug_assert_eq!(request.addr, self.addr);
        let result = self.protocol.process_cache_request(self.state, request);
        self.commit(Event::Processor(*request), result, env)
    }

    /// Deliver a message snooped on the bus.
    pub fn process_snoop_request<E>(
        &mut self,
        message: &BusMessage,
        env: &mut E,
    ) -> Result<State, ProtocolViolation>
    where
        E: Environment,
    {
        debug_assert_eq!(message.addr, self.addr);
        let result = self
            .protocol
            .process_snoop_request(self.state, message, &*env);
        self.commit(Event::Snoop(*message), result, env)
    }

    fn commit<E>(
        &mut self,
        event: Event,
        result: Result<Transition, crate::error::Reason>,
        env: &mut E,
    ) -> Result<State, ProtocolViolation>
    where
        E: Environment + ?Sized,
    {
        let transition = match result {
            Ok(transition) => transition,
            Err(reason) => {
                let violation = reason.at(self.cache, self.state, event);
                env.report_fatal(&violation);
                return Err(violation);
            }
        };
        if self.log_transitions {
            log::debug!(
                "{}: {} --{}--> {} [{}]",
                style(format!("cache {}", self.cache)).cyan(),
                self.state,
                event,
                transition.next,
                transition.actions.iter().join(", "),
            );
        }
        env::apply(env, self.cache, &transition.actions);
        self.state = transition.next;
        Ok(self.state)
    }
}
