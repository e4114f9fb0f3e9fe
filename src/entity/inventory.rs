//! Bounded list of equipped items

use crate::core::error::{Result, RpgError};
use crate::entity::item::ItemRef;

/// Equipped items in the order their boosts apply
#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<ItemRef>,
    max_items: usize,
}

impl Inventory {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_items),
            max_items,
        }
    }

    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    pub fn contains_named(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name() == name)
    }

    pub fn add_item(&mut self, item: ItemRef) -> Result<()> {
        if self.is_full() {
            return Err(RpgError::Inventory(format!(
                "cannot carry {}: inventory is full ({} items)",
                item.name(),
                self.max_items
            )));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the first item with this name
    pub fn remove_item(&mut self, name: &str) -> Option<ItemRef> {
        let index = self.items.iter().position(|item| item.name() == name)?;
        Some(self.items.remove(index))
    }

    /// Swap the item at `index` for `item`, returning the old one
    pub fn replace(&mut self, index: usize, item: ItemRef) -> Result<ItemRef> {
        let slot = self.items.get_mut(index).ok_or_else(|| {
            RpgError::Inventory(format!("no item in slot {}", index + 1))
        })?;
        Ok(std::mem::replace(slot, item))
    }
}
