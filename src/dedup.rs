/*!
Ordered, bounded deduplication shared by the path, node and link passes.

A [Dedup] pulls keys from an inner iterator and emits each key the first time it is seen. With
a [Limit::AtMost] budget it stops pulling input as soon as the budget is spent, so records past
that point are never decoded.

```text
RUNNING --(duplicate: skip | novel: emit)--> RUNNING
RUNNING --(budget spent)--> EXHAUSTED
RUNNING --(input ended)---> DONE
```
*/
use crate::error::TopologyError;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Output cap of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    #[default]
    Unbounded,
    AtMost(usize),
}

impl Limit {
    /// Maps the integer convention of the command line: negative means unbounded.
    pub fn from_count(count: i64) -> Limit {
        match usize::try_from(count) {
            Ok(n) => Limit::AtMost(n),
            Err(_) => Limit::Unbounded,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Limit::Unbounded)
    }
}

impl FromStr for Limit {
    type Err = TopologyError;

    /// An empty string is unbounded; anything else must be an integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Limit::Unbounded);
        }
        s.parse::<i64>()
            .map(Limit::from_count)
            .map_err(|source| TopologyError::InvalidLimit {
                value: s.to_string(),
                source,
            })
    }
}

impl Display for Limit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Unbounded => write!(f, "unbounded"),
            Limit::AtMost(n) => write!(f, "{}", n),
        }
    }
}

/// Keys emitted so far by one pass. It only grows.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    keys: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        SeenSet::default()
    }

    /// Records the key, returning true if it was not seen before.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupState {
    Running,
    /// The output budget is spent; the inner iterator is no longer polled.
    Exhausted,
    /// The inner iterator ended.
    Done,
}

/// Iterator adapter emitting first occurrences of keys, bounded by a [Limit].
pub struct Dedup<I> {
    inner: I,
    seen: SeenSet,
    remaining: Option<usize>,
    state: DedupState,
    duplicates: u64,
}

impl<I> Dedup<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(inner: I, seen: SeenSet, limit: Limit) -> Self {
        let remaining = match limit {
            Limit::Unbounded => None,
            Limit::AtMost(n) => Some(n),
        };
        let state = match remaining {
            Some(0) => DedupState::Exhausted,
            _ => DedupState::Running,
        };
        Dedup {
            inner,
            seen,
            remaining,
            state,
            duplicates: 0,
        }
    }

    pub fn state(&self) -> DedupState {
        self.state
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Number of keys skipped because they were already emitted.
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Gives back the seen set, e.g. to continue deduplicating against another input.
    pub fn into_seen(self) -> SeenSet {
        self.seen
    }
}

impl<I> Iterator for Dedup<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.state != DedupState::Running {
            return None;
        }

        for key in self.inner.by_ref() {
            if !self.seen.insert(&key) {
                self.duplicates += 1;
                continue;
            }
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
                if *remaining == 0 {
                    self.state = DedupState::Exhausted;
                }
            }
            return Some(key);
        }

        self.state = DedupState::Done;
        None
    }
}

/// Extension trait to deduplicate any stream of string keys.
pub trait DedupExt: Iterator<Item = String> + Sized {
    fn dedup_keys(self, seen: SeenSet, limit: Limit) -> Dedup<Self> {
        Dedup::new(self, seen, limit)
    }
}

impl<I: Iterator<Item = String>> DedupExt for I {}
