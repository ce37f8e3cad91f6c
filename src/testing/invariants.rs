//! System level properties of the protocol on an atomic snooping bus.

use crate::{
    address,
    bus::{Outcome, SnoopBus},
    config::Config,
    request::{Kind, MessageKind, ProcessorRequest},
    state::State,
    CacheId,
};
use proptest::prelude::*;

const NUM_CACHES: usize = 4;
const ADDRS: [address; 2] = [0x100, 0x140];

/// Check the global configuration of one address.
pub fn check_states(states: &[State]) -> Result<(), String> {
    if let Some(state) = states.iter().find(|s| s.is_transient()) {
        return Err(format!("transient state {state:?} on idle bus: {states:?}"));
    }
    let writers = states.iter().filter(|s| s.claims_exclusive()).count();
    if writers > 1 {
        return Err(format!("{writers} caches claim exclusive access: {states:?}"));
    }
    let has_shared = states.contains(&State::S);
    if has_shared && states.iter().any(|s| matches!(s, State::E | State::M)) {
        return Err(format!("shared copy next to exclusive copy: {states:?}"));
    }
    let responders = states
        .iter()
        .filter(|s| matches!(s, State::E | State::O | State::M | State::F))
        .count();
    if responders > 1 {
        return Err(format!("{responders} caches would answer a GETS: {states:?}"));
    }
    if states.contains(&State::M) && states.iter().filter(|s| s.has_data()).count() > 1 {
        return Err(format!("modified copy is not the only copy: {states:?}"));
    }
    Ok(())
}

/// Check what a single access did.
pub fn check_outcome(cache: CacheId, kind: Kind, outcome: &Outcome) -> Result<(), String> {
    if !outcome.completed {
        return Err(format!("access by cache {cache} never completed"));
    }
    for record in &outcome.transactions {
        if record.request.src != cache {
            return Err(format!("cache {cache} saw foreign request {}", record.request));
        }
        if record.request.kind == MessageKind::GETS {
            // the reader itself never asserts for its own GETS
            if record.asserted_by.contains(&cache) {
                return Err(format!("reader {cache} asserted its own shared line"));
            }
            let expected = if record.asserted_by.is_empty() {
                State::E
            } else {
                State::S
            };
            if outcome.state != expected {
                return Err(format!(
                    "read by {cache} ended in {:?}, asserted by {:?}",
                    outcome.state, record.asserted_by
                ));
            }
        }
    }
    match kind {
        Kind::STORE if outcome.state != State::M => {
            Err(format!("store by {cache} ended in {:?}", outcome.state))
        }
        Kind::LOAD if !outcome.state.has_data() => {
            Err(format!("load by {cache} ended in {:?}", outcome.state))
        }
        _ => Ok(()),
    }
}

fn arb_access() -> impl Strategy<Value = (CacheId, Kind, address)> {
    (
        0..NUM_CACHES,
        prop_oneof![Just(Kind::LOAD), Just(Kind::STORE)],
        prop::sample::select(ADDRS.to_vec()),
    )
}

proptest! {
    #[test]
    fn random_accesses_keep_coherence(accesses in prop::collection::vec(arb_access(), 1..64)) {
        super::init_logging();
        let mut bus = SnoopBus::new(Config {
            num_caches: NUM_CACHES,
            log_transitions: false,
            ..Config::default()
        });

        let mut misses = 0;
        let mut upgrades = 0;
        for (cache, kind, addr) in accesses {
            let before = bus.states(addr)[cache];
            let request = ProcessorRequest { kind, addr };
            let outcome = bus.access(cache, request);
            prop_assert!(outcome.is_ok(), "{:?}", outcome);
            let outcome = outcome.unwrap();

            prop_assert_eq!(check_outcome(cache, kind, &outcome), Ok(()));
            for addr in ADDRS {
                prop_assert_eq!(check_states(&bus.states(addr)), Ok(()));
            }

            misses += outcome.transactions.len() as u64;
            if before == State::E && kind == Kind::STORE {
                prop_assert!(outcome.is_hit());
                upgrades += 1;
            }
        }

        let stats = bus.stats().lock().clone();
        prop_assert_eq!(stats.coherence.cache_misses, misses);
        prop_assert_eq!(stats.coherence.silent_upgrades, upgrades);
        prop_assert_eq!(stats.transactions, misses);
    }
}

#[test]
fn check_states_flags_two_writers() {
    assert!(check_states(&[State::M, State::E]).is_err());
    assert!(check_states(&[State::S, State::E]).is_err());
    assert!(check_states(&[State::O, State::F]).is_err());
    assert!(check_states(&[State::IM, State::I]).is_err());
    assert!(check_states(&[State::O, State::S, State::S]).is_ok());
    assert!(check_states(&[State::F, State::S, State::I]).is_ok());
}
