#![allow(non_camel_case_types, clippy::upper_case_acronyms)]

pub mod coherence;

pub use coherence::{Coherence, Counter};

use serde::{Deserialize, Serialize};

#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub coherence: Coherence,
    /// Number of completed bus transactions.
    pub transactions: u64,
}

impl std::ops::AddAssign for Stats {
    fn add_assign(&mut self, other: Self) {
        self.coherence += other.coherence;
        self.transactions += other.transactions;
    }
}
