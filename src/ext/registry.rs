//! Instance registry: id → instance, with a per-extension id counter.
//!
//! Elements only carry the id (in the instance-id attribute); the registry
//! owns the instances and remembers which element each one is rooted on, so
//! an id read from some other element does not resolve. Ids start at 0, increase for the life of the
//! extension, and are never reissued, even after removal.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::instance::InstanceRef;
use crate::dom::ElementId;

struct Entry<T> {
    root: ElementId,
    instance: InstanceRef<T>,
}

pub struct Registry<T> {
    next_id: u64,
    instances: BTreeMap<u64, Entry<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            instances: BTreeMap::new(),
        }
    }

    /// Reserve the next id. Reserved ids are consumed even if the instance
    /// is never inserted.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: u64, root: ElementId, instance: InstanceRef<T>) {
        self.instances.insert(id, Entry { root, instance });
    }

    pub fn get(&self, id: u64) -> Option<InstanceRef<T>> {
        self.instances.get(&id).map(|entry| Rc::clone(&entry.instance))
    }

    /// The instance `id`, only if it is rooted on `element`.
    pub fn find(&self, id: u64, element: ElementId) -> Option<InstanceRef<T>> {
        self.instances
            .get(&id)
            .filter(|entry| entry.root == element)
            .map(|entry| Rc::clone(&entry.instance))
    }

    pub fn remove(&mut self, id: u64) -> Option<InstanceRef<T>> {
        self.instances.remove(&id).map(|entry| entry.instance)
    }

    /// Live ids, ascending.
    pub fn ids(&self) -> Vec<u64> {
        self.instances.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
