use crate::{address, CacheId};
use serde::{Deserialize, Serialize};

/// Processor request kind.
#[derive(
    Debug,
    strum::EnumIter,
    strum::EnumCount,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum Kind {
    LOAD,
    STORE,
}

/// Bus message kind.
#[derive(
    Debug,
    strum::EnumIter,
    strum::EnumCount,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum MessageKind {
    GETS,
    GETM,
    DATA,
}

/// A load or store issued by the core owning the cache.
///
/// Consumed exactly once by the processor-event handler.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorRequest {
    pub kind: Kind,
    pub addr: address,
}

impl ProcessorRequest {
    #[must_use]
    pub fn load(addr: address) -> Self {
        Self {
            kind: Kind::LOAD,
            addr,
        }
    }

    #[must_use]
    pub fn store(addr: address) -> Self {
        Self {
            kind: Kind::STORE,
            addr,
        }
    }
}

impl std::fmt::Display for ProcessorRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}@{:#x}", self.kind, self.addr)
    }
}

/// A coherence message observed on the shared bus.
///
/// `src` is the cache that put the message on the bus. Every cache
/// snooping the bus sees the message, including the one that sent it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusMessage {
    pub kind: MessageKind,
    pub addr: address,
    pub src: CacheId,
}

impl BusMessage {
    #[must_use]
    pub fn gets(addr: address, src: CacheId) -> Self {
        Self {
            kind: MessageKind::GETS,
            addr,
            src,
        }
    }

    #[must_use]
    pub fn getm(addr: address, src: CacheId) -> Self {
        Self {
            kind: MessageKind::GETM,
            addr,
            src,
        }
    }

    #[must_use]
    pub fn data(addr: address, src: CacheId) -> Self {
        Self {
            kind: MessageKind::DATA,
            addr,
            src,
        }
    }
}

impl std::fmt::Display for BusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}(src={})@{:#x}", self.kind, self.src, self.addr)
    }
}

/// Any event delivered to a line.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Processor(ProcessorRequest),
    Snoop(BusMessage),
}

impl Event {
    #[must_use]
    pub fn addr(&self) -> address {
        match self {
            Self::Processor(req) => req.addr,
            Self::Snoop(msg) => msg.addr,
        }
    }
}

impl From<ProcessorRequest> for Event {
    fn from(req: ProcessorRequest) -> Self {
        Self::Processor(req)
    }
}

impl From<BusMessage> for Event {
    fn from(msg: BusMessage) -> Self {
        Self::Snoop(msg)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Processor(req) => std::fmt::Display::fmt(req, f),
            Self::Snoop(msg) => std::fmt::Display::fmt(msg, f),
        }
    }
}
