//! Enforcement locks - at-most-one in-flight enforcement per (guild, actor)
//!
//! The lock table is in-memory and process-wide. Running multiple engine
//! processes would need a distributed mutex or actor sharding instead.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use guard_core::value_objects::Snowflake;

type LockKey = (Snowflake, Snowflake);

/// Keyed lock table guarding punishment execution.
///
/// Acquisition is an atomic insert-if-absent; release happens in the guard's
/// `Drop`, so every exit path (success, error, panic unwind) frees the key.
#[derive(Debug, Default)]
pub struct EnforcementLocks {
    active: DashMap<LockKey, ()>,
}

impl EnforcementLocks {
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    /// Try to take the lock for (guild, actor). Returns `None` when an
    /// enforcement for the same actor is already in flight.
    pub fn try_acquire(&self, guild_id: Snowflake, actor_id: Snowflake) -> Option<EnforcementGuard<'_>> {
        let key = (guild_id, actor_id);
        match self.active.entry(key) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(());
                Some(EnforcementGuard { locks: self, key })
            }
        }
    }

    /// True when an enforcement is currently in flight for (guild, actor)
    pub fn is_locked(&self, guild_id: Snowflake, actor_id: Snowflake) -> bool {
        self.active.contains_key(&(guild_id, actor_id))
    }

    fn release(&self, key: &LockKey) {
        self.active.remove(key);
    }
}

/// RAII guard holding one enforcement lock
#[derive(Debug)]
pub struct EnforcementGuard<'a> {
    locks: &'a EnforcementLocks,
    key: LockKey,
}

impl Drop for EnforcementGuard<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}
