use serde::{Deserialize, Serialize};

/// Process-wide coherence counter.
#[derive(
    Debug,
    strum::EnumIter,
    strum::Display,
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
pub enum Counter {
    /// Incremented on every transition that puts a GET on the bus.
    #[strum(serialize = "cache_misses")]
    CacheMisses,
    /// Incremented on every E to M write hit.
    #[strum(serialize = "silent_upgrades")]
    SilentUpgrades,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coherence {
    pub cache_misses: u64,
    pub silent_upgrades: u64,
}

impl Coherence {
    pub fn inc(&mut self, counter: Counter, n: u64) {
        match counter {
            Counter::CacheMisses => self.cache_misses += n,
            Counter::SilentUpgrades => self.silent_upgrades += n,
        }
    }

    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::CacheMisses => self.cache_misses,
            Counter::SilentUpgrades => self.silent_upgrades,
        }
    }
}

impl std::ops::AddAssign for Coherence {
    fn add_assign(&mut self, other: Self) {
        self.cache_misses += other.cache_misses;
        self.silent_upgrades += other.silent_upgrades;
    }
}

impl std::fmt::Debug for Coherence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use strum::IntoEnumIterator;
        let mut out = f.debug_struct("CoherenceStats");
        for counter in Counter::iter() {
            let count = self.get(counter);
            if count > 0 {
                out.field(&counter.to_string(), &count);
            }
        }
        out.finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Coherence, Counter};
    use pretty_assertions_sorted as diff;

    #[test]
    fn inc_and_aggregate() {
        let mut a = Coherence::default();
        a.inc(Counter::CacheMisses, 2);
        a.inc(Counter::SilentUpgrades, 1);

        let mut b = Coherence::default();
        b.inc(Counter::CacheMisses, 3);

        a += b;
        diff::assert_eq!(
            a,
            Coherence {
                cache_misses: 5,
                silent_upgrades: 1,
            }
        );
        assert_eq!(a.get(Counter::CacheMisses), 5);
    }

    #[test]
    fn serializes_with_counter_names() {
        let mut stats = Coherence::default();
        stats.inc(Counter::SilentUpgrades, 1);
        let json = serde_json::to_value(&stats).unwrap();
        diff::assert_eq!(
            json,
            serde_json::json!({ "cache_misses": 0, "silent_upgrades": 1 })
        );
        assert_eq!(Counter::CacheMisses.to_string(), "cache_misses");
    }
}
