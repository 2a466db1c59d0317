//! Keyed storage for aggregates.
//!
//! Services take a [`Repository`] by reference so callers decide where records
//! live. [`InMemoryRepository`] is the plain implementation; persistence to
//! disk wraps it elsewhere.

use std::fmt::Debug;
use std::hash::Hash;

use quill_types::{BlueprintId, ContractId};

use crate::{Blueprint, Contract};

/// An aggregate addressed by a stable id.
pub trait Keyed {
    type Id: Clone + Eq + Hash + Debug;

    fn key(&self) -> &Self::Id;
}

impl Keyed for Blueprint {
    type Id = BlueprintId;

    fn key(&self) -> &BlueprintId {
        self.id()
    }
}

impl Keyed for Contract {
    type Id = ContractId;

    fn key(&self) -> &ContractId {
        self.id()
    }
}

pub trait Repository<T: Keyed> {
    /// Lookups never fail; a miss is `None`.
    fn get(&self, id: &T::Id) -> Option<&T>;

    /// Insert, or replace the record with the same id.
    fn put(&mut self, item: T);

    fn list(&self) -> &[T];
}

/// Insertion-ordered repository. Replacing a record keeps its slot.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    items: Vec<T>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> InMemoryRepository<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Keyed> FromIterator<T> for InMemoryRepository<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut repo = Self::new();
        for item in iter {
            repo.put(item);
        }
        repo
    }
}

impl<T: Keyed> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    fn put(&mut self, item: T) {
        match self.items.iter().position(|existing| existing.key() == item.key()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    fn list(&self) -> &[T] {
        &self.items
    }
}
