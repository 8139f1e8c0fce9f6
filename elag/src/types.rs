use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Position of a state in its automaton's state array.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[serde(transparent)]
pub struct StateIndex(pub(crate) u32);

impl StateIndex {
    /// Wraps a raw array position. Positions are below
    /// [`crate::automaton::MAX_STATES`].
    #[inline(always)]
    pub fn new(index: usize) -> Self {
        debug_assert!(index < crate::automaton::MAX_STATES);
        StateIndex(index as u32)
    }

    /// The raw array position.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Callers check the shifted size against the state limit first.
    #[inline(always)]
    pub(crate) fn shift(&self, offset: usize) -> Self {
        StateIndex(self.0 + offset as u32)
    }
}

impl From<usize> for StateIndex {
    fn from(index: usize) -> Self {
        StateIndex::new(index)
    }
}

impl Display for StateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an automaton taking part in a product construction: its
/// position in the list handed to [`crate::product::ProductBuilder`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[serde(transparent)]
pub struct AutomatonId(pub(crate) u32);

impl AutomatonId {
    /// Wraps a position in the product's automaton list.
    #[inline(always)]
    pub fn new(index: usize) -> Self {
        AutomatonId(index as u32)
    }

    /// The position in the product's automaton list.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for AutomatonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_index_ordering() {
        assert!(StateIndex::new(1) < StateIndex::new(2));
        assert_eq!(StateIndex::new(3).shift(4), StateIndex::new(7));
        assert_eq!(StateIndex::from(5).index(), 5);
        assert_eq!(StateIndex::new(0).to_string(), "0");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&StateIndex::new(12)).unwrap();
        assert_eq!(json, "12");
        let id: AutomatonId = serde_json::from_str("3").unwrap();
        assert_eq!(id, AutomatonId::new(3));
    }
}
