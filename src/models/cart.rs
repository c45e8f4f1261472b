//! Local-only ordering state.
//!
//! The cart never leaves the client: adding an item is purely UI state,
//! nothing is written back to the remote database.

use super::Item;

/// One line in the cart: an item at a chosen price tier.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    /// Display value of the chosen tier ("30" out of "30, 40, 55").
    pub tier: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn amount(&self) -> f64 {
        self.tier.trim().parse::<f64>().unwrap_or(0.0)
    }

    pub fn line_total(&self) -> f64 {
        self.amount() * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Add one of `item` at the given tier, merging into an existing line
    /// when the same item/tier pair is already present.
    pub fn add(&mut self, item: &Item, tier: &str) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == item.id && l.tier == tier)
        {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            tier: tier.to_string(),
            quantity: 1,
        });
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items across all lines.
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}
