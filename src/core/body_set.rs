use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a body inside a [`BodySet`].
///
/// Bodies are never removed from the world (a retired body is put to sleep),
/// so a plain index is enough to stay valid for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Dense, append-only storage handing out [`BodyHandle`]s.
#[derive(Debug, Clone)]
pub struct BodySet<T> {
    items: Vec<T>,
}

impl<T> Default for BodySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BodySet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn insert(&mut self, item: T) -> BodyHandle {
        let handle = BodyHandle(self.items.len() as u32);
        self.items.push(item);
        handle
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&T> {
        self.items.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Two distinct mutable borrows, returned in argument order.
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut T, &mut T)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia.max(ib) >= self.items.len() {
            return None;
        }

        if ia < ib {
            let (left, right) = self.items.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.items.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (BodyHandle(index as u32), item))
    }

    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_borrow_respects_argument_order() {
        let mut set = BodySet::new();
        let a = set.insert(1);
        let b = set.insert(2);

        let (second, first) = set.get_pair_mut(b, a).expect("distinct handles");
        assert_eq!((*second, *first), (2, 1));
        *second += 10;
        assert_eq!(set.get(b), Some(&12));
    }

    #[test]
    fn pair_borrow_rejects_aliasing_and_unknown_handles() {
        let mut set = BodySet::new();
        let a = set.insert(1);
        assert!(set.get_pair_mut(a, a).is_none());
        assert!(set.get_pair_mut(a, BodyHandle(9)).is_none());
    }
}
