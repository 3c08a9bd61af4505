use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

// The ID (Handle)
// It's just an index into the owning `Assets`. Copyable, typed by what it points at.
pub struct Handle<T> {
    pub id: u64,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.id as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

// Implemented by hand so `T` needs no bounds of its own
impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

/// Append-only storage that hands out [`Handle`]s.
///
/// Ids are dense and assigned in insertion order, so a handle stays valid for
/// the lifetime of the storage that produced it.
pub struct Assets<T> {
    storage: Vec<T>,
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self {
            storage: Vec::new(),
        }
    }
}

impl<T> Assets<T> {
    pub fn add(&mut self, asset: T) -> Handle<T> {
        let id = self.storage.len() as u64;
        self.storage.push(asset);
        Handle::new(id)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.storage.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.storage.get_mut(handle.index())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for Assets<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.storage.iter()).finish()
    }
}
