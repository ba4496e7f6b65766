//! Bounded context dictionaries for the Markov-chain and LZ78Y predictors.
//!
//! A [`ContextTable`] maps the trailing `order` symbols to an [`McvTracker`].
//! Binary samples use [`DenseTable`], a flat array indexed by the packed
//! context bits; byte samples use [`SparseTable`], a hash map keyed by the
//! context itself. [`ContextDictionary`] holds one table per order and
//! charges every new context to an [`EntryBudget`]; once the budget is spent,
//! unseen contexts are dropped.

use std::collections::HashMap;

use super::mcv_tracker::McvTracker;

/// Storage for the trackers of one context order.
pub trait ContextTable {
    fn for_order(order: usize) -> Self;

    fn get(&self, context: &[u8]) -> Option<&McvTracker>;

    fn get_mut(&mut self, context: &[u8]) -> Option<&mut McvTracker>;

    fn insert(&mut self, context: &[u8], tracker: McvTracker);

    /// Number of contexts stored.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat table for binary contexts of up to 16 bits.
#[derive(Debug, Clone)]
pub struct DenseTable {
    slots: Vec<Option<McvTracker>>,
    len: usize,
}

fn pack_bits(context: &[u8]) -> usize {
    context
        .iter()
        .fold(0usize, |key, &bit| (key << 1) | (bit & 1) as usize)
}

impl ContextTable for DenseTable {
    fn for_order(order: usize) -> Self {
        Self {
            slots: vec![None; 1 << order],
            len: 0,
        }
    }

    fn get(&self, context: &[u8]) -> Option<&McvTracker> {
        self.slots[pack_bits(context)].as_ref()
    }

    fn get_mut(&mut self, context: &[u8]) -> Option<&mut McvTracker> {
        self.slots[pack_bits(context)].as_mut()
    }

    fn insert(&mut self, context: &[u8], tracker: McvTracker) {
        let slot = &mut self.slots[pack_bits(context)];
        if slot.is_none() {
            self.len += 1;
        }
        *slot = Some(tracker);
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Hash table for byte contexts.
#[derive(Debug, Clone, Default)]
pub struct SparseTable {
    map: HashMap<Box<[u8]>, McvTracker>,
}

impl ContextTable for SparseTable {
    fn for_order(_order: usize) -> Self {
        Self::default()
    }

    fn get(&self, context: &[u8]) -> Option<&McvTracker> {
        self.map.get(context)
    }

    fn get_mut(&mut self, context: &[u8]) -> Option<&mut McvTracker> {
        self.map.get_mut(context)
    }

    fn insert(&mut self, context: &[u8], tracker: McvTracker) {
        self.map.insert(context.into(), tracker);
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Cap on the number of contexts a dictionary may create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryBudget {
    used: usize,
    capacity: usize,
}

impl EntryBudget {
    pub fn new(capacity: usize) -> Self {
        Self { used: 0, capacity }
    }

    /// Reserve one entry; false once the capacity is reached.
    pub fn try_take(&mut self) -> bool {
        if self.used < self.capacity {
            self.used += 1;
            true
        } else {
            false
        }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One table per context order `1..=max_order`.
#[derive(Debug, Clone)]
pub struct ContextDictionary<T> {
    tables: Vec<T>,
}

impl<T: ContextTable> ContextDictionary<T> {
    pub fn new(max_order: usize) -> Self {
        Self {
            tables: (1..=max_order).map(T::for_order).collect(),
        }
    }

    pub fn max_order(&self) -> usize {
        self.tables.len()
    }

    /// Tracker for `context`, whose length selects the order.
    pub fn get(&self, context: &[u8]) -> Option<&McvTracker> {
        self.tables[context.len() - 1].get(context)
    }

    /// Count `symbol` after `context`, creating the context if `budget`
    /// allows. Returns false if the context is unknown and was dropped.
    pub fn observe(&mut self, context: &[u8], symbol: u8, budget: &mut EntryBudget) -> bool {
        let table = &mut self.tables[context.len() - 1];
        if let Some(tracker) = table.get_mut(context) {
            tracker.update(symbol);
            return true;
        }
        if budget.try_take() {
            table.insert(context, McvTracker::new(symbol));
            return true;
        }
        false
    }

    /// Contexts stored at `order`.
    pub fn entries_at(&self, order: usize) -> usize {
        self.tables[order - 1].len()
    }

    /// Contexts stored over all orders.
    pub fn entries(&self) -> usize {
        self.tables.iter().map(|t| t.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_and_sparse_agree() {
        let mut dense: ContextDictionary<DenseTable> = ContextDictionary::new(3);
        let mut sparse: ContextDictionary<SparseTable> = ContextDictionary::new(3);
        let mut budget_a = EntryBudget::new(100);
        let mut budget_b = EntryBudget::new(100);
        let bits = [0u8, 1, 1, 0, 1, 1, 1, 0, 0, 1];
        for i in 3..bits.len() {
            for order in 1..=3 {
                let ctx = &bits[i - order..i];
                dense.observe(ctx, bits[i], &mut budget_a);
                sparse.observe(ctx, bits[i], &mut budget_b);
            }
        }
        assert_eq!(dense.entries(), sparse.entries());
        assert_eq!(budget_a, budget_b);
        for ctx in [&[1u8][..], &[0, 1], &[1, 1, 0]] {
            assert_eq!(dense.get(ctx), sparse.get(ctx));
        }
    }

    #[test]
    fn test_budget_drops_new_contexts() {
        let mut dict: ContextDictionary<SparseTable> = ContextDictionary::new(1);
        let mut budget = EntryBudget::new(2);
        assert!(dict.observe(&[1], 5, &mut budget));
        assert!(dict.observe(&[2], 5, &mut budget));
        assert!(!dict.observe(&[3], 5, &mut budget));
        // known contexts still learn
        assert!(dict.observe(&[1], 6, &mut budget));
        assert_eq!(dict.entries(), 2);
        assert!(dict.get(&[3]).is_none());
        assert_eq!(dict.get(&[1]).map(McvTracker::mode), Some(6));
    }

    #[test]
    fn test_dense_keys_pack_msb_first() {
        assert_eq!(pack_bits(&[1, 0, 1]), 5);
        assert_eq!(pack_bits(&[0, 0, 0, 1]), 1);
    }
}
