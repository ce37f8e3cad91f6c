use crate::{address, CacheId};
use stats::Counter;

/// Actions emitted by one handler call, in emission order.
pub type Actions = smallvec::SmallVec<[Action; 4]>;

#[must_use]
pub fn was_gets_issued(actions: &[Action]) -> bool {
    actions
        .iter()
        .any(|action| matches!(action, Action::IssueGets { .. }))
}

#[must_use]
pub fn was_getm_issued(actions: &[Action]) -> bool {
    actions
        .iter()
        .any(|action| matches!(action, Action::IssueGetm { .. }))
}

/// Whether any GET was put on the bus.
#[must_use]
pub fn was_bus_request_issued(actions: &[Action]) -> bool {
    was_gets_issued(actions) || was_getm_issued(actions)
}

#[must_use]
pub fn was_data_sent_to_proc(actions: &[Action]) -> bool {
    actions
        .iter()
        .any(|action| matches!(action, Action::DataToProcessor { .. }))
}

/// Destination of the DATA put on the bus, if any.
#[must_use]
pub fn was_data_sent_on_bus(actions: &[Action]) -> Option<CacheId> {
    actions.iter().find_map(|action| match action {
        Action::DataOnBus { dest, .. } => Some(*dest),
        _ => None,
    })
}

#[must_use]
pub fn was_shared_line_asserted(actions: &[Action]) -> bool {
    actions
        .iter()
        .any(|action| matches!(action, Action::AssertSharedLine))
}

#[must_use]
pub fn count(actions: &[Action], counter: Counter) -> usize {
    actions
        .iter()
        .filter(|action| matches!(action, Action::Count(c) if *c == counter))
        .count()
}

/// Actuation requested by a handler from the surrounding simulator.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Action {
    /// Enqueue a GETS on the bus.
    IssueGets { addr: address },
    /// Enqueue a GETM on the bus.
    IssueGetm { addr: address },
    /// Complete the pending processor load or store.
    DataToProcessor { addr: address },
    /// Answer a snooped request with data.
    DataOnBus { addr: address, dest: CacheId },
    /// Signal that this cache holds a valid copy.
    AssertSharedLine,
    /// Bump a statistics counter.
    Count(Counter),
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::IssueGets { addr } => write!(f, "GETS@{addr:#x}"),
            Self::IssueGetm { addr } => write!(f, "GETM@{addr:#x}"),
            Self::DataToProcessor { addr } => write!(f, "DATA->proc@{addr:#x}"),
            Self::DataOnBus { addr, dest } => write!(f, "DATA->{dest}@{addr:#x}"),
            Self::AssertSharedLine => write!(f, "SHARED"),
            Self::Count(counter) => write!(f, "{counter}++"),
        }
    }
}
