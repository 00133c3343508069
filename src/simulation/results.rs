// src/simulation/results.rs
use std::collections::BTreeMap;
use std::collections::btree_map::Iter;
use std::fmt;

/// Observation counts keyed by classical bitstring.
///
/// Keys follow the backend convention: the highest-numbered classical bit is
/// the leftmost character. Iteration is in lexicographic key order, which
/// keeps every consumer deterministic for a fixed set of counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Count for `bitstring`, zero if never observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all observations.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, u64> {
        self.counts.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, n) in iter {
            counts.insert(bitstring, n);
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a String, &'a u64);
    type IntoIter = Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

/// What an execution backend hands back: the outcome histogram and how many
/// shots produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    counts: Counts,
    shots: u32,
}

impl ExecutionResult {
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self { counts, shots }
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution Results ({} shots):", self.shots)?;
        if self.counts.is_empty() {
            writeln!(f, "  No outcomes were recorded.")?;
        } else {
            for (bitstring, n) in &self.counts {
                writeln!(f, "    {}: {}", bitstring, n)?;
            }
        }
        Ok(())
    }
}
