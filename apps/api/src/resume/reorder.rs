#![allow(dead_code)]

//! Ordered, id-keyed container behind every repeating section.
//!
//! Ids are assigned on insert and never reused within a list, so a drag
//! gesture can name items independently of their current index.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(u64);

/// End of a drag gesture. `over` is `None` when dropped outside any target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub active: ItemId,
    pub over: Option<ItemId>,
}

#[derive(Debug, Clone)]
pub struct SectionList<T> {
    entries: Vec<(ItemId, T)>,
    next_id: u64,
}

impl<T> Default for SectionList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> SectionList<T> {
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut list = Self::default();
        for item in items {
            list.append(item);
        }
        list
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items().cloned().collect()
    }
}

impl<T> SectionList<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, item: T) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, item));
        id
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.entries.len()).then(|| self.entries.remove(index).1)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(|(_, item)| item)
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, item)| item)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| *entry_id == id)
    }

    /// Single-element move: remove at `from`, reinsert at `to`.
    /// Returns false when either index is out of range or they are equal.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// Applies a drop. Dropping outside a target, on itself, or naming an
    /// unknown id leaves the order untouched.
    pub fn handle_drag_end(&mut self, event: DragEnd) -> bool {
        let Some(over) = event.over else {
            return false;
        };
        if over == event.active {
            return false;
        }
        match (self.position(event.active), self.position(over)) {
            (Some(from), Some(to)) => self.move_item(from, to),
            _ => false,
        }
    }
}
