//! Ordered, bounded set of active tax rows.
//!
//! The registry hands out row ids from a monotonic counter, so an id is
//! never reused within one registry, even after its row is removed. Rows
//! keep their insertion order. The live count always stays within
//! `min_rows..=max_rows`; adds and removes that would break that bound are
//! rejected as no-ops.

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::RowId;

/// Default ceiling on active tax rows.
pub const MAX_TAX_ROWS: usize = 25;

/// Default floor on active tax rows.
pub const MIN_TAX_ROWS: usize = 1;

/// Errors returned by [`RowRegistry::add_row`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("cannot add more than {max} tax rows")]
    AtCapacity { max: usize },
}

/// Result of a successful [`RowRegistry::add_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedRow {
    pub id: RowId,
    /// `true` when this row filled the registry to its ceiling.
    pub at_capacity: bool,
}

/// Active rows in insertion order, each carrying a payload `T`.
#[derive(Debug, Clone)]
pub struct RowRegistry<T> {
    rows: Vec<(RowId, T)>,
    next_id: RowId,
    min_rows: usize,
    max_rows: usize,
}

impl<T: Default> Default for RowRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> RowRegistry<T> {
    /// Creates a registry with the default limits and a single empty row.
    pub fn new() -> Self {
        Self::with_limits(MIN_TAX_ROWS, MAX_TAX_ROWS)
    }

    /// Creates a registry with custom limits.
    ///
    /// The registry starts with `min_rows` empty rows. A floor of zero is
    /// raised to one, and a ceiling below the floor is raised to the floor.
    pub fn with_limits(
        min_rows: usize,
        max_rows: usize,
    ) -> Self {
        let min_rows = min_rows.max(1);
        let mut registry = Self {
            rows: Vec::with_capacity(min_rows),
            next_id: RowId::FIRST,
            min_rows,
            max_rows: max_rows.max(min_rows),
        };
        registry.fill_to_floor();
        registry
    }

    /// Registers a new empty row at the end.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AtCapacity`] when the registry is already
    /// full; nothing changes in that case.
    pub fn add_row(&mut self) -> Result<AddedRow, RegistryError> {
        if self.rows.len() >= self.max_rows {
            warn!(max = self.max_rows, "Tax row limit reached; add ignored");
            return Err(RegistryError::AtCapacity { max: self.max_rows });
        }

        let id = self.allocate_id();
        self.rows.push((id, T::default()));
        let at_capacity = self.is_at_capacity();

        debug!(%id, count = self.rows.len(), at_capacity, "Added tax row");
        Ok(AddedRow { id, at_capacity })
    }

    /// Drops every row and starts over with fresh rows numbered from 1.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.next_id = RowId::FIRST;
        self.fill_to_floor();
    }

    fn fill_to_floor(&mut self) {
        while self.rows.len() < self.min_rows {
            let id = self.allocate_id();
            self.rows.push((id, T::default()));
        }
    }
}

impl<T> RowRegistry<T> {
    /// Deregisters a row.
    ///
    /// Returns `false` without changing anything when the registry is at its
    /// floor or `id` is not active.
    pub fn remove_row(
        &mut self,
        id: RowId,
    ) -> bool {
        if self.rows.len() <= self.min_rows {
            debug!(%id, min = self.min_rows, "Tax row floor reached; remove ignored");
            return false;
        }

        match self.rows.iter().position(|(row, _)| *row == id) {
            Some(index) => {
                self.rows.remove(index);
                debug!(%id, count = self.rows.len(), "Removed tax row");
                true
            }
            None => {
                warn!(%id, "Remove requested for unknown tax row");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never `true`: the floor is at least one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.rows.len() >= self.max_rows
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn contains(
        &self,
        id: RowId,
    ) -> bool {
        self.rows.iter().any(|(row, _)| *row == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &T)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    pub fn get(
        &self,
        id: RowId,
    ) -> Option<&T> {
        self.rows.iter().find(|(row, _)| *row == id).map(|(_, t)| t)
    }

    pub fn get_mut(
        &mut self,
        id: RowId,
    ) -> Option<&mut T> {
        self.rows
            .iter_mut()
            .find(|(row, _)| *row == id)
            .map(|(_, t)| t)
    }

    fn allocate_id(&mut self) -> RowId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn id(n: u32) -> RowId {
        RowId::new(n).unwrap()
    }

    #[test]
    fn starts_with_one_row() {
        let registry: RowRegistry<()> = RowRegistry::new();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![RowId::FIRST]);
    }

    #[test]
    fn add_allocates_sequential_ids() {
        let mut registry: RowRegistry<()> = RowRegistry::new();

        let second = registry.add_row().unwrap();
        let third = registry.add_row().unwrap();

        assert_eq!(second, AddedRow { id: id(2), at_capacity: false });
        assert_eq!(third.id, id(3));
    }

    #[test]
    fn twenty_sixth_row_is_rejected() {
        let mut registry: RowRegistry<()> = RowRegistry::new();
        for _ in 1..24 {
            assert!(!registry.add_row().unwrap().at_capacity);
        }

        let last = registry.add_row().unwrap();
        let rejected = registry.add_row();

        assert!(last.at_capacity);
        assert_eq!(rejected, Err(RegistryError::AtCapacity { max: 25 }));
        assert_eq!(registry.len(), 25);
        assert!(registry.is_at_capacity());
    }

    #[test]
    fn removing_last_remaining_row_is_rejected() {
        let mut registry: RowRegistry<()> = RowRegistry::new();

        assert!(!registry.remove_row(RowId::FIRST));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_keeps_other_ids_and_order() {
        let mut registry: RowRegistry<()> = RowRegistry::new();
        registry.add_row().unwrap();
        registry.add_row().unwrap();

        assert!(registry.remove_row(id(2)));

        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![id(1), id(3)]);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut registry: RowRegistry<()> = RowRegistry::new();
        registry.add_row().unwrap();

        assert!(!registry.remove_row(id(9)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut registry: RowRegistry<()> = RowRegistry::new();
        registry.add_row().unwrap();
        registry.remove_row(id(2));

        let next = registry.add_row().unwrap();

        assert_eq!(next.id, id(3));
        assert!(!registry.contains(id(2)));
    }

    #[test]
    fn count_stays_within_bounds_over_mixed_operations() {
        let mut registry: RowRegistry<()> = RowRegistry::new();

        for step in 0..200u32 {
            if step % 3 == 0 {
                let first = registry.ids().next().unwrap();
                registry.remove_row(first);
            } else {
                let _ = registry.add_row();
            }
            assert!((1..=25).contains(&registry.len()));
        }
    }

    #[test]
    fn payload_is_reachable_by_id() {
        let mut registry: RowRegistry<String> = RowRegistry::new();
        let added = registry.add_row().unwrap();

        registry.get_mut(added.id).unwrap().push_str("YQ");

        assert_eq!(registry.get(added.id).map(String::as_str), Some("YQ"));
        assert_eq!(registry.get(RowId::FIRST).map(String::as_str), Some(""));
    }

    #[test]
    fn reset_restores_single_row_numbered_from_one() {
        let mut registry: RowRegistry<()> = RowRegistry::new();
        registry.add_row().unwrap();
        registry.add_row().unwrap();
        registry.remove_row(RowId::FIRST);

        registry.reset();

        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![RowId::FIRST]);
    }

    #[test]
    fn custom_limits_are_sanitized() {
        let registry: RowRegistry<()> = RowRegistry::with_limits(0, 0);

        assert_eq!(registry.min_rows(), 1);
        assert_eq!(registry.max_rows(), 1);
        assert!(registry.is_at_capacity());
    }
}
