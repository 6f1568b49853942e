//! Retention-capped event logs.
//!
//! Every activity log (XP history, catch-scroll taps, journal entries,
//! timer sessions) is a JSON array stored as a string under one key in the
//! key-value store. This accessor centralizes the load / insert / truncate /
//! write-back cycle so all logs share one retention policy implementation.
//!
//! Absent or corrupt values decode to the empty log: malformed data is
//! treated the same as missing data.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

use super::Kv;

/// Which end of the array new records are inserted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    /// Newest record first (journal, timer sessions, catch-scroll taps).
    Front,
    /// Newest record last (XP history).
    Back,
}

/// A JSON-array log under a single store key with a fixed retention bound.
pub struct EventLog<T> {
    key: &'static str,
    cap: usize,
    insert: Insert,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EventLog<T>
where
    T: Serialize + DeserializeOwned,
{
    pub const fn new(key: &'static str, cap: usize, insert: Insert) -> Self {
        Self {
            key,
            cap,
            insert,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Load the full decoded log, oldest data included.
    ///
    /// Returns the empty vector when the key is absent or its value does not
    /// decode.
    pub fn load(&self, kv: &dyn Kv) -> Result<Vec<T>> {
        let raw = match kv.get(self.key)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(key = self.key, %err, "discarding undecodable log");
                Ok(Vec::new())
            }
        }
    }

    /// Append a record, enforce the retention bound, and write back.
    ///
    /// Retention drops the oldest records by recency order: the tail of a
    /// `Front` log, the head of a `Back` log.
    pub fn append(&self, kv: &dyn Kv, record: T) -> Result<Vec<T>> {
        let mut records = self.load(kv)?;
        match self.insert {
            Insert::Front => records.insert(0, record),
            Insert::Back => records.push(record),
        }
        if records.len() > self.cap {
            let excess = records.len() - self.cap;
            match self.insert {
                Insert::Front => records.truncate(self.cap),
                Insert::Back => {
                    records.drain(..excess);
                }
            }
        }
        self.replace(kv, &records)?;
        Ok(records)
    }

    /// Overwrite the log with exactly `records`.
    ///
    /// Callers that need a non-recency eviction rule (the XP history drops
    /// the oldest record by date) mutate the loaded vector and replace it.
    pub fn replace(&self, kv: &dyn Kv, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        kv.set(self.key, &raw)?;
        Ok(())
    }

    /// Remove the log entirely.
    pub fn clear(&self, kv: &dyn Kv) -> Result<()> {
        kv.remove(self.key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;

    const FRONT: EventLog<u32> = EventLog::new("front_log", 3, Insert::Front);
    const BACK: EventLog<u32> = EventLog::new("back_log", 3, Insert::Back);

    #[test]
    fn absent_key_loads_empty() {
        let store = Store::open_memory().unwrap();
        assert!(FRONT.load(&store).unwrap().is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty() {
        let store = Store::open_memory().unwrap();
        store.set("front_log", "{not json").unwrap();
        assert!(FRONT.load(&store).unwrap().is_empty());
    }

    #[test]
    fn front_log_keeps_newest_first_and_drops_tail() {
        let store = Store::open_memory().unwrap();
        for n in 1..=4 {
            FRONT.append(&store, n).unwrap();
        }
        // Cap is 3: the oldest record (1) fell off the tail.
        assert_eq!(FRONT.load(&store).unwrap(), vec![4, 3, 2]);
    }

    #[test]
    fn back_log_keeps_newest_last_and_drops_head() {
        let store = Store::open_memory().unwrap();
        for n in 1..=4 {
            BACK.append(&store, n).unwrap();
        }
        assert_eq!(BACK.load(&store).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn append_at_cap_always_yields_cap_records() {
        let store = Store::open_memory().unwrap();
        for n in 0..10 {
            let records = FRONT.append(&store, n).unwrap();
            assert_eq!(records.len(), (n as usize + 1).min(3));
        }
    }

    #[test]
    fn replace_overwrites() {
        let store = Store::open_memory().unwrap();
        FRONT.append(&store, 1).unwrap();
        FRONT.replace(&store, &[7, 8]).unwrap();
        assert_eq!(FRONT.load(&store).unwrap(), vec![7, 8]);
    }

    #[test]
    fn clear_removes_key() {
        let store = Store::open_memory().unwrap();
        BACK.append(&store, 1).unwrap();
        BACK.clear(&store).unwrap();
        assert!(store.get("back_log").unwrap().is_none());
    }
}
