//! Symbol algebra consumed by the automaton transforms.
//!
//! Transition labels are not characters but predicates over tagged tokens
//! (inflected form, lemma, grammatical code). The core never looks inside a
//! label: it only asks the algebra to intersect and subtract labels, and to
//! complete a set of labels up to the whole lexical universe.
use std::fmt::Debug;
use std::hash::Hash;

pub mod lexical;

pub use self::lexical::{LexicalSymbol, LexicalToken, SymbolParseError, Tagset};

/// Set operations over transition labels.
///
/// Implementations must keep symbols canonical: two symbols denoting the same
/// set of tokens compare equal. Any two symbols are then either equal,
/// disjoint, or split by [`intersect`](SymbolAlgebra::intersect) and
/// [`difference`](SymbolAlgebra::difference) into disjoint pieces.
pub trait SymbolAlgebra {
    /// Transition label.
    type Symbol: Clone + Eq + Ord + Hash + Debug;
    /// Input item a label can match.
    type Token;

    /// The tokens matched by both `a` and `b`, or `None` if there are none.
    fn intersect(&self, a: &Self::Symbol, b: &Self::Symbol) -> Option<Self::Symbol>;

    /// The tokens matched by `a` but not by `b`, as pairwise disjoint
    /// symbols. An empty list is the empty set.
    fn difference(&self, a: &Self::Symbol, b: &Self::Symbol) -> Vec<Self::Symbol>;

    /// Every token of the universe matched by none of `labels`, as pairwise
    /// disjoint symbols.
    fn universal_minus(&self, labels: &[Self::Symbol]) -> Vec<Self::Symbol>;

    /// Whether `symbol` matches `token`.
    fn matches(&self, symbol: &Self::Symbol, token: &Self::Token) -> bool;

    /// Whether `a` and `b` share at least one token.
    #[inline]
    fn overlaps(&self, a: &Self::Symbol, b: &Self::Symbol) -> bool {
        self.intersect(a, b).is_some()
    }
}
