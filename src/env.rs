use crate::{
    address,
    error::ProtocolViolation,
    event::Action,
    protocol::SharedLine,
    CacheId,
};
use console::style;
use stats::Counter;

/// Collaborators a line controller acts upon.
///
/// The surrounding simulator implements this: the bus model queues GETs and
/// data responses, the processor model completes pending accesses, and the
/// shared line and counters live outside any single line.
pub trait Environment: SharedLine {
    /// Enqueue a GETS on the bus.
    fn issue_gets(&mut self, src: CacheId, addr: address);

    /// Enqueue a GETM on the bus.
    fn issue_getm(&mut self, src: CacheId, addr: address);

    /// Complete the pending load or store of `cache`'s processor.
    fn send_data_to_proc(&mut self, cache: CacheId, addr: address);

    /// Respond to a snooped request with data.
    fn send_data_on_bus(&mut self, src: CacheId, addr: address, dest: CacheId);

    /// Assert the wired-OR shared line for the current transaction.
    ///
    /// Never resets it, that is up to the bus.
    fn assert_shared_line(&mut self, src: CacheId);

    fn increment(&mut self, counter: Counter);

    /// Fatal error sink.
    ///
    /// Called once for each violation before it is returned to the caller,
    /// who must stop the simulation.
    fn report_fatal(&mut self, violation: &ProtocolViolation) {
        log::error!(
            "{}: {}",
            style(format!("PROTOCOL VIOLATION cache={}", violation.cache)).red(),
            violation
        );
    }
}

/// Carry out `actions` emitted by `cache` in order.
pub fn apply<E>(env: &mut E, cache: CacheId, actions: &[Action])
where
    E: Environment + ?Sized,
{
    for action in actions {
        log::trace!("cache {cache}: {action}");
        match *action {
            Action::IssueGets { addr } => env.issue_gets(cache, addr),
            Action::IssueGetm { addr } => env.issue_getm(cache, addr),
            Action::DataToProcessor { addr } => env.send_data_to_proc(cache, addr),
            Action::DataOnBus { addr, dest } => env.send_data_on_bus(cache, addr, dest),
            Action::AssertSharedLine => env.assert_shared_line(cache),
            Action::Count(counter) => env.increment(counter),
        }
    }
}

/// Environment that records everything it is asked to do.
///
/// The shared line reads back whatever was last asserted or preset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorder {
    pub shared_line: bool,
    pub actions: Vec<(CacheId, Action)>,
    pub stats: stats::Coherence,
    pub violations: Vec<ProtocolViolation>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_shared_line(shared_line: bool) -> Self {
        Self {
            shared_line,
            ..Self::default()
        }
    }

    /// Drain recorded actions.
    pub fn take(&mut self) -> Vec<(CacheId, Action)> {
        std::mem::take(&mut self.actions)
    }
}

impl SharedLine for Recorder {
    fn is_asserted(&self) -> bool {
        self.shared_line
    }
}

impl Environment for Recorder {
    fn issue_gets(&mut self, src: CacheId, addr: address) {
        self.actions.push((src, Action::IssueGets { addr }));
    }

    fn issue_getm(&mut self, src: CacheId, addr: address) {
        self.actions.push((src, Action::IssueGetm { addr }));
    }

    fn send_data_to_proc(&mut self, cache: CacheId, addr: address) {
        self.actions.push((cache, Action::DataToProcessor { addr }));
    }

    fn send_data_on_bus(&mut self, src: CacheId, addr: address, dest: CacheId) {
        self.actions.push((src, Action::DataOnBus { addr, dest }));
    }

    fn assert_shared_line(&mut self, src: CacheId) {
        self.shared_line = true;
        self.actions.push((src, Action::AssertSharedLine));
    }

    fn increment(&mut self, counter: Counter) {
        self.stats.inc(counter, 1);
    }

    fn report_fatal(&mut self, violation: &ProtocolViolation) {
        self.violations.push(*violation);
    }
}
