//! Sequential identifier allocation with in-memory reservations.
//!
//! A caller composing a record that is not saved yet reserves its tentative
//! id. `next_id` takes reservations into account, so two concurrent editors
//! in the same process never get the same id. Reservations are never
//! persisted.

use crate::error::{CoreError, CoreResult};
use crate::types::IdScope;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Computes next ids and tracks reservations per scope.
#[derive(Debug)]
pub struct IdAllocator {
    first_id: u64,
    reserved: Mutex<HashMap<IdScope, BTreeSet<String>>>,
}

impl IdAllocator {
    /// Creates an allocator that starts empty scopes at `first_id`.
    #[must_use]
    pub fn new(first_id: u64) -> Self {
        Self {
            first_id,
            reserved: Mutex::new(HashMap::new()),
        }
    }

    /// Next free id for `scope` given the ids currently persisted in it.
    ///
    /// Returns one more than the highest numeric id among persisted and
    /// reserved ids, or `first_id` if there are none.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonNumericId`] if ids are persisted but none of
    /// them is numeric, or [`CoreError::IdsExhausted`] if the highest id is
    /// `u64::MAX`.
    pub fn next_id<I, S>(&self, scope: &IdScope, persisted: I) -> CoreResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reserved = self.reserved.lock();
        self.compute_next(scope, persisted, &reserved)
    }

    /// Computes the next id and reserves it in one step.
    pub fn claim_next<I, S>(&self, scope: &IdScope, persisted: I) -> CoreResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reserved = self.reserved.lock();
        let id = self.compute_next(scope, persisted, &reserved)?;
        reserved
            .entry(scope.clone())
            .or_default()
            .insert(id.to_string());
        debug!(%scope, id, "claimed id");
        Ok(id)
    }

    fn compute_next<I, S>(
        &self,
        scope: &IdScope,
        persisted: I,
        reserved: &HashMap<IdScope, BTreeSet<String>>,
    ) -> CoreResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut any_persisted = None;
        let mut max_persisted = None;
        for id in persisted {
            let id = id.as_ref();
            if any_persisted.is_none() {
                any_persisted = Some(id.to_string());
            }
            if let Ok(n) = id.trim().parse::<u64>() {
                max_persisted = max_persisted.max(Some(n));
            }
        }

        if let (Some(id), None) = (&any_persisted, max_persisted) {
            return Err(CoreError::NonNumericId {
                scope: scope.to_string(),
                id: id.clone(),
            });
        }

        let max_reserved = reserved
            .get(scope)
            .into_iter()
            .flatten()
            .filter_map(|id| id.parse::<u64>().ok())
            .max();

        match max_persisted.max(max_reserved) {
            Some(max) => max.checked_add(1).ok_or_else(|| CoreError::IdsExhausted {
                scope: scope.to_string(),
                max,
            }),
            None => Ok(self.first_id),
        }
    }

    /// Atomically replaces a reservation.
    ///
    /// Removes `old` if held and, if `new` is not empty, reserves `new`.
    /// Passing an empty `old` only reserves; passing an empty `new` only
    /// releases.
    pub fn update_reservation(&self, scope: &IdScope, old: &str, new: &str) {
        let mut reserved = self.reserved.lock();
        let set = reserved.entry(scope.clone()).or_default();
        if !old.is_empty() {
            set.remove(old);
        }
        if !new.is_empty() {
            set.insert(new.to_string());
        }
        if set.is_empty() {
            reserved.remove(scope);
        }
        debug!(%scope, old, new, "updated reservation");
    }

    /// Reserves an id.
    pub fn reserve(&self, scope: &IdScope, id: &str) {
        self.update_reservation(scope, "", id);
    }

    /// Releases a reservation.
    pub fn release(&self, scope: &IdScope, id: &str) {
        self.update_reservation(scope, id, "");
    }

    /// Returns true if the id is reserved in the scope.
    #[must_use]
    pub fn is_reserved(&self, scope: &IdScope, id: &str) -> bool {
        self.reserved
            .lock()
            .get(scope)
            .is_some_and(|set| set.contains(id))
    }

    /// All ids reserved in the scope, sorted.
    #[must_use]
    pub fn reserved(&self, scope: &IdScope) -> Vec<String> {
        self.reserved
            .lock()
            .get(scope)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}
