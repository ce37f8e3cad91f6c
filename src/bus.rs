use crate::{
    address,
    config::Config,
    env::Environment,
    error::ProtocolViolation,
    line::Line,
    protocol::{Protocol, SharedLine},
    request::{BusMessage, ProcessorRequest},
    state::State,
    sync::{Arc, Mutex},
    CacheId, MOESIF,
};
use console::style;
use stats::Counter;
use std::collections::{HashMap, VecDeque};

/// Source id used when memory answers a request no cache could supply.
pub const MEMORY: CacheId = CacheId::MAX;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Violation(#[from] ProtocolViolation),

    #[error("bus stopped after earlier protocol violation: {0}")]
    Poisoned(ProtocolViolation),

    #[error("no cache {cache} on a bus with {num_caches} caches")]
    UnknownCache { cache: CacheId, num_caches: usize },
}

/// What happened during one bus transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub request: BusMessage,
    /// Caches that asserted the shared line.
    pub asserted_by: Vec<CacheId>,
    /// Who supplied the data ([`MEMORY`] if no cache did).
    pub data_from: CacheId,
}

/// Result of a processor access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// State of the accessing line once the bus is idle again.
    pub state: State,
    /// Whether the access was completed to the processor.
    pub completed: bool,
    pub transactions: Vec<Record>,
}

impl Outcome {
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Per-transaction view of the bus handed to line controllers.
#[derive(Debug, Default)]
struct Transaction {
    shared_line: bool,
    asserted_by: Vec<CacheId>,
    requests: VecDeque<BusMessage>,
    data: Option<BusMessage>,
    completed: Vec<(CacheId, address)>,
    stats: stats::Coherence,
}

impl Transaction {
    /// Start a new bus transaction.
    ///
    /// The shared line is reset here and only here.
    fn begin(&mut self) {
        self.shared_line = false;
        self.asserted_by.clear();
        self.data = None;
    }
}

impl SharedLine for Transaction {
    fn is_asserted(&self) -> bool {
        self.shared_line
    }
}

impl Environment for Transaction {
    fn issue_gets(&mut self, src: CacheId, addr: address) {
        self.requests.push_back(BusMessage::gets(addr, src));
    }

    fn issue_getm(&mut self, src: CacheId, addr: address) {
        self.requests.push_back(BusMessage::getm(addr, src));
    }

    fn send_data_to_proc(&mut self, cache: CacheId, addr: address) {
        self.completed.push((cache, addr));
    }

    fn send_data_on_bus(&mut self, src: CacheId, addr: address, dest: CacheId) {
        match self.data {
            Some(ref first) => {
                log::warn!(
                    "dropping duplicate data from cache {src} for cache {dest} (already supplied by {})",
                    first.src
                );
            }
            None => self.data = Some(BusMessage::data(addr, src)),
        }
    }

    fn assert_shared_line(&mut self, src: CacheId) {
        self.shared_line = true;
        self.asserted_by.push(src);
    }

    fn increment(&mut self, counter: Counter) {
        self.stats.inc(counter, 1);
    }
}

/// Atomic snooping bus connecting a fixed number of caches.
///
/// A processor access runs to completion before the next one is accepted:
/// every GET it issues is broadcast to all caches (the requester included),
/// then DATA from the supplying cache, or memory, is delivered to the
/// requester. No two transient windows ever overlap.
#[derive(Debug)]
pub struct SnoopBus<P = MOESIF> {
    config: Config,
    protocol: P,
    lines: HashMap<address, Vec<Line<P>>>,
    stats: Arc<Mutex<stats::Stats>>,
    poisoned: Option<ProtocolViolation>,
}

impl SnoopBus<MOESIF> {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_protocol(config, MOESIF)
    }
}

impl<P> SnoopBus<P>
where
    P: Protocol + Clone,
{
    #[must_use]
    pub fn with_protocol(config: Config, protocol: P) -> Self {
        Self {
            config,
            protocol,
            lines: HashMap::new(),
            stats: Arc::new(Mutex::new(stats::Stats::default())),
            poisoned: None,
        }
    }

    #[must_use]
    pub fn num_caches(&self) -> usize {
        self.config.num_caches
    }

    /// Shared statistics handle.
    #[must_use]
    pub fn stats(&self) -> &Arc<Mutex<stats::Stats>> {
        &self.stats
    }

    /// States of all caches for `addr`, indexed by cache id.
    #[must_use]
    pub fn states(&self, addr: address) -> Vec<State> {
        match self.lines.get(&addr) {
            Some(lines) => lines.iter().map(Line::state).collect(),
            None => vec![State::I; self.config.num_caches],
        }
    }

    /// Diagnostic dump of every line for `addr`.
    #[must_use]
    pub fn dump(&self, addr: address) -> Vec<String> {
        self.lines
            .get(&addr)
            .map(|lines| {
                lines
                    .iter()
                    .map(|line| line.dump(self.config.labels))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check(&self, cache: CacheId) -> Result<(), Error> {
        if let Some(violation) = self.poisoned {
            return Err(Error::Poisoned(violation));
        }
        if cache >= self.config.num_caches {
            return Err(Error::UnknownCache {
                cache,
                num_caches: self.config.num_caches,
            });
        }
        Ok(())
    }

    fn lines_mut(&mut self, addr: address) -> &mut Vec<Line<P>> {
        let Self {
            ref config,
            ref protocol,
            ref mut lines,
            ..
        } = *self;
        lines.entry(addr).or_insert_with(|| {
            (0..config.num_caches)
                .map(|cache| {
                    Line::new(protocol.clone(), cache, addr)
                        .with_transition_logging(config.log_transitions)
                })
                .collect()
        })
    }

    fn poison<T>(&mut self, result: Result<T, ProtocolViolation>) -> Result<T, Error> {
        result.map_err(|violation| {
            self.poisoned = Some(violation);
            Error::Violation(violation)
        })
    }

    /// Run a load or store of `cache` to completion.
    pub fn access(
        &mut self,
        cache: CacheId,
        request: ProcessorRequest,
    ) -> Result<Outcome, Error> {
        self.check(cache)?;
        let mut tx = Transaction::default();
        let result = self.lines_mut(request.addr)[cache].process_cache_request(&request, &mut tx);
        self.poison(result)?;

        let mut transactions = Vec::new();
        while let Some(get) = tx.requests.pop_front() {
            transactions.push(self.transaction(get, &mut tx)?);
        }

        let completed = tx.completed.contains(&(cache, request.addr));
        let state = self.lines_mut(request.addr)[cache].state();
        {
            let mut stats = self.stats.lock();
            stats.coherence += tx.stats;
            stats.transactions += transactions.len() as u64;
        }
        Ok(Outcome {
            state,
            completed,
            transactions,
        })
    }

    fn transaction(&mut self, get: BusMessage, tx: &mut Transaction) -> Result<Record, Error> {
        tx.begin();
        log::debug!("{}", style(format!("BUS {get}")).bold());

        let result = self
            .lines_mut(get.addr)
            .iter_mut()
            .try_for_each(|line| line.process_snoop_request(&get, &mut *tx).map(|_| ()));
        self.poison(result)?;

        // memory answers if no cache did
        let data = tx.data.unwrap_or(BusMessage::data(get.addr, MEMORY));
        log::debug!(
            "{} (shared={}, asserted by {:?})",
            style(format!("BUS {data} -> {}", get.src)).bold(),
            tx.shared_line,
            tx.asserted_by
        );
        let result = self.lines_mut(get.addr)[get.src].process_snoop_request(&data, &mut *tx);
        self.poison(result)?;

        Ok(Record {
            request: get,
            asserted_by: tx.asserted_by.clone(),
            data_from: data.src,
        })
    }

    /// Deliver a single bus message to one cache, bypassing arbitration.
    ///
    /// The shared line reads as deasserted.
    pub fn deliver(&mut self, cache: CacheId, message: BusMessage) -> Result<State, Error> {
        self.check(cache)?;
        let mut tx = Transaction::default();
        let result = self.lines_mut(message.addr)[cache].process_snoop_request(&message, &mut tx);
        let state = self.poison(result)?;
        self.stats.lock().coherence += tx.stats;
        Ok(state)
    }
}
