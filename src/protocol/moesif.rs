//! MOESIF snooping protocol.
//!
//! Processor side:
//!
//! | state | LOAD             | STORE                      |
//! |-------|------------------|----------------------------|
//! | I     | GETS, IS, miss   | GETM, IM, miss             |
//! | S     | hit              | GETM, SM, miss             |
//! | E     | hit              | hit, M, silent upgrade     |
//! | O     | hit              | GETM, OM, miss             |
//! | M     | hit              | hit                        |
//! | F     | hit              | GETM, FM, miss             |
//!
//! Transient states never see a processor request.
//!
//! Snoop side (`shared` asserts the shared line, `data` answers on the bus):
//!
//! | state | GETS           | GETM            | DATA                  |
//! |-------|----------------|-----------------|-----------------------|
//! | I     | -              | -               | -                     |
//! | S     | shared         | shared, I       | error                 |
//! | E     | shared, data, F| shared, data, I | error                 |
//! | O     | shared, data   | shared, data, I | error                 |
//! | M     | shared, data, O| shared, data, I | error                 |
//! | F     | shared, data   | shared, data, I | error                 |
//! | IS    | -              | -               | proc, S or E          |
//! | IM    | -              | -               | proc, M               |
//! | SM    | shared         | shared          | proc, M               |
//! | OM    | shared, data   | shared, data, IM| proc, M               |
//! | FM    | shared, data   | shared, data, IM| proc, O               |

use super::{Protocol, SharedLine, Transition};
use crate::{
    error::Reason,
    event::Action,
    request::{BusMessage, Kind, MessageKind, ProcessorRequest},
    state::State,
};
use stats::Counter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MOESIF;

impl Protocol for MOESIF {
    fn name(&self) -> &'static str {
        "MOESIF"
    }

    fn process_cache_request(
        &self,
        state: State,
        request: &ProcessorRequest,
    ) -> Result<Transition, Reason> {
        process_cache_request(state, request)
    }

    fn process_snoop_request(
        &self,
        state: State,
        message: &BusMessage,
        shared_line: &dyn SharedLine,
    ) -> Result<Transition, Reason> {
        process_snoop_request(state, message, shared_line)
    }
}

fn hit(state: State, addr: crate::address) -> Transition {
    Transition::stay(state).with(Action::DataToProcessor { addr })
}

fn miss(next: State, get: Action) -> Transition {
    Transition::to(next)
        .with(get)
        .with(Action::Count(Counter::CacheMisses))
}

/// Supply our copy to the requester and move to `next`.
fn supply(next: State, message: &BusMessage) -> Transition {
    Transition::to(next)
        .with(Action::AssertSharedLine)
        .with(Action::DataOnBus {
            addr: message.addr,
            dest: message.src,
        })
}

fn complete(next: State, message: &BusMessage) -> Transition {
    Transition::to(next).with(Action::DataToProcessor { addr: message.addr })
}

/// Processor-event handler.
pub fn process_cache_request(
    state: State,
    request: &ProcessorRequest,
) -> Result<Transition, Reason> {
    let addr = request.addr;
    let transition = match (state, request.kind) {
        (State::I, Kind::LOAD) => miss(State::IS, Action::IssueGets { addr }),
        (State::I, Kind::STORE) => miss(State::IM, Action::IssueGetm { addr }),

        (State::S | State::E | State::O | State::M | State::F, Kind::LOAD)
        | (State::M, Kind::STORE) => hit(state, addr),

        (State::S, Kind::STORE) => miss(State::SM, Action::IssueGetm { addr }),
        (State::O, Kind::STORE) => miss(State::OM, Action::IssueGetm { addr }),
        (State::F, Kind::STORE) => miss(State::FM, Action::IssueGetm { addr }),

        // we hold the only copy, no need to tell anyone
        (State::E, Kind::STORE) => Transition::to(State::M)
            .with(Action::DataToProcessor { addr })
            .with(Action::Count(Counter::SilentUpgrades)),

        (State::IS | State::IM | State::SM | State::OM | State::FM, Kind::LOAD | Kind::STORE) => {
            return Err(Reason::OutstandingRequest);
        }
    };
    Ok(transition)
}

/// Snoop-event handler.
///
/// The shared line is sampled only when DATA completes a pending GETS.
pub fn process_snoop_request(
    state: State,
    message: &BusMessage,
    shared_line: &dyn SharedLine,
) -> Result<Transition, Reason> {
    let transition = match (state, message.kind) {
        (State::I, MessageKind::GETS | MessageKind::GETM | MessageKind::DATA) => {
            Transition::stay(state)
        }

        // sharers only signal that the data exists on chip
        (State::S, MessageKind::GETS) => Transition::stay(state).with(Action::AssertSharedLine),
        (State::S, MessageKind::GETM) => Transition::to(State::I).with(Action::AssertSharedLine),

        (State::E, MessageKind::GETS) => supply(State::F, message),
        (State::M, MessageKind::GETS) => supply(State::O, message),
        (State::O | State::F, MessageKind::GETS) => supply(state, message),
        (State::E | State::O | State::M | State::F, MessageKind::GETM) => {
            supply(State::I, message)
        }

        (State::S | State::E | State::O | State::M | State::F, MessageKind::DATA) => {
            return Err(Reason::DataWhileValid);
        }

        // our own request echoed back
        (State::IS | State::IM, MessageKind::GETS | MessageKind::GETM) => Transition::stay(state),

        (State::IS, MessageKind::DATA) => {
            if shared_line.is_asserted() {
                complete(State::S, message)
            } else {
                complete(State::E, message)
            }
        }
        (State::IM | State::SM | State::OM, MessageKind::DATA) => complete(State::M, message),
        (State::FM, MessageKind::DATA) => complete(State::O, message),

        (State::SM, MessageKind::GETS | MessageKind::GETM) => {
            Transition::stay(state).with(Action::AssertSharedLine)
        }

        (State::OM | State::FM, MessageKind::GETS) => supply(state, message),
        // lost the race to another writer: hand over our data and keep
        // waiting for our own GETM
        (State::OM | State::FM, MessageKind::GETM) => supply(State::IM, message),
    };
    Ok(transition)
}
