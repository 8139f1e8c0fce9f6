/*! Finite-state automata over lexical symbols.

Transition labels are sets of tagged tokens (lemma and grammatical code)
rather than characters. This crate implements the structural algebra of such
automata, as used to combine and constrain local grammars:

- [`Automaton::trim`] removes states off every initial-to-terminal path,
- [`Automaton::topological_sort`] renumbers an acyclic automaton,
- [`Automaton::union`] absorbs another automaton,
- [`Automaton::complement`] complements a deterministic automaton,
- [`ProductBuilder::build_product_state`] synchronizes several automata one
  product state at a time, refining their alphabets so overlapping labels
  are split into disjoint pieces.

Labels are only handled through a [`SymbolAlgebra`]. The [`Tagset`] algebra
over [`LexicalSymbol`] labels is provided.

# Usage examples

```
use elag::{Automaton, LexicalSymbol, LexicalToken, Tagset};

let tagset = Tagset::new(["N", "V"]);
let mut a = Automaton::new("cat");
let q0 = a.add_state(true, false);
let q1 = a.add_state(false, true);
a.add_transition(q0, LexicalSymbol::atom("cat", "N"), q1).unwrap();

a.complement(&tagset).unwrap();
assert!(!a.accepts(&tagset, &[LexicalToken::new("cats", "cat", "N")]));
assert!(a.accepts(&tagset, &[LexicalToken::new("dogs", "dog", "N")]));
```
*/

pub mod automaton;
pub mod config;
pub mod product;
pub mod symbol;
pub mod types;

pub use crate::automaton::{Automaton, AutomatonError, State, Transition};
pub use crate::config::AlgebraConfig;
pub use crate::product::{
    ProductBuilder, ProductError, ProductState, ProductTransition, StateRef, StateSet,
};
pub use crate::symbol::{LexicalSymbol, LexicalToken, SymbolAlgebra, Tagset};
pub use crate::types::{AutomatonId, StateIndex};
