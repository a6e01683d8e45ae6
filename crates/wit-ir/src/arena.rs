//! Minimal index-addressed arena used throughout the IR.
//!
//! Every cross-reference in a [`crate::Resolve`] is a small `Copy` index
//! rather than a pointer, mirroring the entity-reference pattern used across
//! the rest of the Wasmtime code base: no cycles, trivial `Clone`, and
//! deterministic iteration order.

use std::fmt;
use std::marker::PhantomData;

/// A typed index into an [`Arena<T>`].
///
/// `Id<T>` is `Copy` and carries no lifetime, so it can be stored anywhere in
/// the graph (including inside the very `T` it indexes) without borrow-
/// checker friction. Two ids are equal only if they index the same arena slot
/// *and* carry the same marker type, so a `WorldId` can never be confused
/// with an `InterfaceId` at the type level.
pub struct Id<T> {
    index: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Constructs an id from a raw arena index. Only the decoder and
    /// [`Arena::alloc`] should call this directly.
    pub fn from_index(index: u32) -> Self {
        Id { index, marker: PhantomData }
    }

    /// Returns the raw index backing this id.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Id<T> {}
impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
impl<T> Eq for Id<T> {}
impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}
impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index)
    }
}
impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

/// A dense, insertion-ordered collection of `T`, addressed by [`Id<T>`].
///
/// This is the only container used for `worlds`, `interfaces`, `typedefs`
/// and `packages` in [`crate::Resolve`]: forward references from the JSON
/// decoder are resolved by pre-growing the arena with placeholders (see
/// `crate::decode`), never by patching pointers after the fact.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, item: T) -> Id<T> {
        let id = Id::from_index(self.items.len() as u32);
        self.items.push(item);
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Id::from_index(i as u32), item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Id<T>, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(i, item)| (Id::from_index(i as u32), item))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Grows the arena to at least `len` slots, filling new slots with
    /// `make_placeholder()`. Used by the decoder when a forward reference to
    /// index `i` is seen before index `i`'s own definition.
    pub fn ensure_len(&mut self, len: usize, mut make_placeholder: impl FnMut() -> T) {
        while self.items.len() < len {
            self.items.push(make_placeholder());
        }
    }

    pub fn next_id(&self) -> Id<T> {
        Id::from_index(self.items.len() as u32)
    }
}

impl<T> std::ops::Index<Id<T>> for Arena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.items
            .get(id.index())
            .unwrap_or_else(|| panic!("id {id:?} out of bounds in arena of len {}", self.items.len()))
    }
}

impl<T> std::ops::IndexMut<Id<T>> for Arena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        let len = self.items.len();
        self.items
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("id out of bounds in arena of len {len}"))
    }
}
