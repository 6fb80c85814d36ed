use std::{
    collections::{HashMap, VecDeque},
    hash::Hash,
};

/// Saturating occurrence count. Only "none", "exactly one" and "more than
/// one" matter for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Counter {
    #[default]
    Zero,
    One,
    Many,
}

impl Counter {
    pub fn incremented(self) -> Self {
        match self {
            Counter::Zero => Counter::One,
            Counter::One | Counter::Many => Counter::Many,
        }
    }
}

/// Matching state shared by every element with the same identity.
#[derive(Debug, Clone, Default)]
pub struct Symbol {
    pub old_counter: Counter,
    pub new_counter: Counter,

    /// Old positions of this identity which haven't been paired yet, in
    /// ascending order.
    pub old_indexes: VecDeque<usize>,
}

impl Symbol {
    pub fn occurs_in_both(&self) -> bool {
        self.old_counter != Counter::Zero && self.new_counter != Counter::Zero
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolId(usize);

/// A slot of either sequence: still pointing at its identity's symbol or
/// already paired with a position of the other sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Symbol(SymbolId),
    Index(usize),
}

/// Arena of symbols keyed by identity. Lives for a single diff.
#[derive(Debug)]
pub struct SymbolTable<K> {
    ids: HashMap<K, SymbolId>,
    symbols: Vec<Symbol>,
}

impl<K> SymbolTable<K>
where
    K: Hash + Eq,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashMap::with_capacity(capacity),
            symbols: Vec::with_capacity(capacity),
        }
    }

    /// Returns the symbol for `key`, creating an empty one the first time the
    /// key is seen.
    pub fn id_for(&mut self, key: K) -> SymbolId {
        let symbols = &mut self.symbols;
        *self.ids.entry(key).or_insert_with(|| {
            symbols.push(Symbol::default());
            SymbolId(symbols.len() - 1)
        })
    }

    pub fn get(&self, id: SymbolId) -> &Symbol { &self.symbols[id.0] }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol { &mut self.symbols[id.0] }
}
