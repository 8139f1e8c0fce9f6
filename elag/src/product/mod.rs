//! Synchronized product of several automata, one state at a time.
//!
//! A [`StateSet`] names one state in each of several automata (or several
//! states of the same automaton). [`ProductBuilder::build_product_state`]
//! turns it into a [`ProductState`] whose transitions follow every member at
//! once. The fixpoint loop that keeps feeding new state sets back into the
//! builder belongs to the caller.
use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

mod error;
pub mod refine;

pub use self::error::ProductError;
pub use self::refine::{refine, refine_within, SplitBudget};

use crate::automaton::{Automaton, State, Transition};
use crate::config::AlgebraConfig;
use crate::symbol::SymbolAlgebra;
use crate::types::{AutomatonId, StateIndex};

/// A state of one of the automata registered with a [`ProductBuilder`].
///
/// Ordered by state index first, then by automaton.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateRef {
    pub state: StateIndex,
    pub automaton: AutomatonId,
}

impl StateRef {
    pub fn new(automaton: AutomatonId, state: StateIndex) -> StateRef {
        StateRef { state, automaton }
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.automaton, self.state)
    }
}

/// A sorted set of [`StateRef`]s without duplicates. Two sets with the same
/// members are equal and hash alike, so a set can key a table of product
/// states.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct StateSet(Vec<StateRef>);

impl StateSet {
    pub fn new() -> StateSet {
        StateSet(Vec::new())
    }

    /// Adds a member, returning `false` if it was already there.
    pub fn insert(&mut self, member: StateRef) -> bool {
        match self.0.binary_search(&member) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, member);
                true
            }
        }
    }

    pub fn contains(&self, member: &StateRef) -> bool {
        self.0.binary_search(member).is_ok()
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, StateRef> {
        self.0.iter()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[StateRef] {
        &self.0
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StateRef> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateRef>>(iter: I) -> StateSet {
        let mut members = iter.into_iter().collect::<Vec<_>>();
        members.sort_unstable();
        members.dedup();
        StateSet(members)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a StateRef;
    type IntoIter = std::slice::Iter<'a, StateRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, member) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", member)?;
        }
        write!(f, "}}")
    }
}

/// A transition of a product state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTransition<S> {
    label: S,
    target: StateSet,
}

impl<S> ProductTransition<S> {
    #[inline(always)]
    pub fn label(&self) -> &S {
        &self.label
    }

    #[inline(always)]
    pub fn target(&self) -> &StateSet {
        &self.target
    }
}

/// The synchronized state built from a [`StateSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState<S> {
    state_set: StateSet,
    initial: bool,
    terminal: bool,
    transitions: Vec<ProductTransition<S>>,
    default_target: StateSet,
}

impl<S> ProductState<S> {
    /// The state set this state was built from.
    pub fn state_set(&self) -> &StateSet {
        &self.state_set
    }

    /// Every member is initial.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Some member is terminal.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Transitions with pairwise disjoint labels, in the order their labels
    /// were first met.
    pub fn transitions(&self) -> &[ProductTransition<S>] {
        &self.transitions
    }

    /// Default targets of the members; empty when no member has one.
    pub fn default_target(&self) -> &StateSet {
        &self.default_target
    }

    /// Where `token` leads: the target of the transition matching it, else
    /// the default target. `None` if neither exists.
    pub fn follow<A>(&self, algebra: &A, token: &A::Token) -> Option<&StateSet>
    where
        A: SymbolAlgebra<Symbol = S>,
    {
        self.transitions
            .iter()
            .find(|t| algebra.matches(&t.label, token))
            .map(|t| &t.target)
            .or_else(|| Some(&self.default_target).filter(|d| !d.is_empty()))
    }
}

/// Builds product states over a fixed list of automata.
///
/// The automata are only read: refinement works on copies of their
/// transition lists.
pub struct ProductBuilder<'a, A: SymbolAlgebra> {
    algebra: &'a A,
    automata: Vec<&'a Automaton<A::Symbol>>,
    config: AlgebraConfig,
}

impl<'a, A: SymbolAlgebra> ProductBuilder<'a, A> {
    /// Registers `automata`; the i-th one is known as `AutomatonId::new(i)`.
    pub fn new<I>(algebra: &'a A, automata: I) -> ProductBuilder<'a, A>
    where
        I: IntoIterator<Item = &'a Automaton<A::Symbol>>,
    {
        ProductBuilder {
            algebra,
            automata: automata.into_iter().collect(),
            config: AlgebraConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AlgebraConfig) -> ProductBuilder<'a, A> {
        self.config = config;
        self
    }

    pub fn automaton(&self, id: AutomatonId) -> Option<&'a Automaton<A::Symbol>> {
        self.automata.get(id.index()).copied()
    }

    /// Every initial state of every registered automaton.
    pub fn initial_state_set(&self) -> StateSet {
        self.automata
            .iter()
            .enumerate()
            .flat_map(|(i, automaton)| {
                automaton
                    .initials()
                    .iter()
                    .map(move |&q| StateRef::new(AutomatonId::new(i), q))
            })
            .collect()
    }

    fn lookup(&self, member: StateRef) -> Result<&'a State<A::Symbol>, ProductError> {
        self.automaton(member.automaton)
            .and_then(|automaton| automaton.state(member.state))
            .ok_or(ProductError::UnknownState(member))
    }

    /// Builds the product state of `key`.
    ///
    /// The members' transition lists are refined until all their labels are
    /// pairwise equal or disjoint. A member with a default transition then
    /// gets an explicit transition to its default target for every label
    /// some other member has and it lacks. Transitions are finally grouped
    /// by label, each label leading to the set of member targets.
    pub fn build_product_state(
        &self,
        key: &StateSet,
    ) -> Result<ProductState<A::Symbol>, ProductError> {
        if key.is_empty() {
            return Err(ProductError::EmptyStateSet);
        }

        let members = key
            .iter()
            .map(|&member| self.lookup(member).map(|state| (member, state)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut lists = members
            .iter()
            .map(|(_, state)| state.transitions().to_vec())
            .collect::<Vec<_>>();

        let mut budget = SplitBudget::new(self.config.max_refinement_steps);
        self.refine_members(&mut lists, &mut budget)?;

        let mut labels: Vec<A::Symbol> = Vec::new();
        for transition in lists.iter().flatten() {
            if !labels.contains(transition.label()) {
                labels.push(transition.label().clone());
            }
        }

        for ((_, state), list) in members.iter().zip(lists.iter_mut()) {
            let default = match state.default_target() {
                Some(default) => default,
                None => continue,
            };
            let missing = labels
                .iter()
                .filter(|label| !list.iter().any(|t| t.label() == *label))
                .cloned()
                .collect::<Vec<_>>();
            list.extend(missing.into_iter().map(|label| Transition::new(label, default)));
        }

        let mut index: HashMap<A::Symbol, usize> = HashMap::new();
        let mut transitions: Vec<ProductTransition<A::Symbol>> = Vec::new();
        for ((member, _), list) in members.iter().zip(lists) {
            for transition in list {
                let target = StateRef::new(member.automaton, transition.target());
                let slot = *index.entry(transition.label().clone()).or_insert_with(|| {
                    transitions.push(ProductTransition {
                        label: transition.label().clone(),
                        target: StateSet::new(),
                    });
                    transitions.len() - 1
                });
                transitions[slot].target.insert(target);
            }
        }

        let default_target = members
            .iter()
            .filter_map(|(member, state)| {
                state
                    .default_target()
                    .map(|d| StateRef::new(member.automaton, d))
            })
            .collect::<StateSet>();

        let initial = members.iter().all(|(_, state)| state.is_initial());
        let terminal = members.iter().any(|(_, state)| state.is_terminal());

        log::debug!(
            "product state {}: {} transition(s), {} split(s), default {}",
            key,
            transitions.len(),
            budget.spent(),
            default_target
        );

        Ok(ProductState {
            state_set: key.clone(),
            initial,
            terminal,
            transitions,
            default_target,
        })
    }

    /// Refines every list on its own and against every other list, until a
    /// whole sweep changes nothing.
    fn refine_members(
        &self,
        lists: &mut [Vec<Transition<A::Symbol>>],
        budget: &mut SplitBudget,
    ) -> Result<(), ProductError> {
        loop {
            let mut changed = false;

            for list in lists.iter_mut() {
                changed |= refine_within(self.algebra, list, budget)?;
            }

            for j in 1..lists.len() {
                let (head, tail) = lists.split_at_mut(j);
                for left in head.iter_mut() {
                    changed |= refine(self.algebra, left, &mut tail[0], budget)?;
                }
            }

            if !changed {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{LexicalSymbol, LexicalToken, Tagset};

    fn sym(s: &str) -> LexicalSymbol {
        s.parse().unwrap()
    }

    fn q(n: usize) -> StateIndex {
        StateIndex::new(n)
    }

    fn r(automaton: usize, state: usize) -> StateRef {
        StateRef::new(AutomatonId::new(automaton), q(state))
    }

    #[test]
    fn state_set_is_canonical() {
        let mut a = StateSet::new();
        assert!(a.insert(r(1, 0)));
        assert!(a.insert(r(0, 1)));
        assert!(a.insert(r(0, 0)));
        assert!(!a.insert(r(1, 0)));

        let b = [r(0, 1), r(0, 0), r(1, 0), r(0, 0)]
            .into_iter()
            .collect::<StateSet>();
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), &[r(0, 0), r(1, 0), r(0, 1)]);
        assert!(a.contains(&r(0, 1)));
        assert_eq!(a.to_string(), "{(#0, 0), (#1, 0), (#0, 1)}");
    }

    #[test]
    fn empty_and_unknown_keys_are_rejected() {
        let tagset = Tagset::new(["N"]);
        let mut a = Automaton::<LexicalSymbol>::new("a");
        a.add_state(true, true);
        let builder = ProductBuilder::new(&tagset, [&a]);

        assert_eq!(
            builder.build_product_state(&StateSet::new()),
            Err(ProductError::EmptyStateSet)
        );
        let key = [r(0, 3)].into_iter().collect();
        assert_eq!(
            builder.build_product_state(&key),
            Err(ProductError::UnknownState(r(0, 3)))
        );
        let key = [r(2, 0)].into_iter().collect();
        assert_eq!(
            builder.build_product_state(&key),
            Err(ProductError::UnknownState(r(2, 0)))
        );
    }

    #[test]
    fn flags_and_initial_set() {
        let tagset = Tagset::new(["N"]);
        let mut a = Automaton::<LexicalSymbol>::new("a");
        a.add_state(true, false);
        a.add_state(false, true);
        let mut b = Automaton::<LexicalSymbol>::new("b");
        b.add_state(true, false);

        let builder = ProductBuilder::new(&tagset, [&a, &b]);
        let init = builder.initial_state_set();
        assert_eq!(init.as_slice(), &[r(0, 0), r(1, 0)]);

        let p = builder.build_product_state(&init).unwrap();
        assert!(p.is_initial());
        assert!(!p.is_terminal());
        assert!(p.transitions().is_empty());
        assert!(p.default_target().is_empty());

        let key = [r(0, 1), r(1, 0)].into_iter().collect();
        let p = builder.build_product_state(&key).unwrap();
        assert!(!p.is_initial());
        assert!(p.is_terminal());
    }

    #[test]
    fn default_completes_missing_labels() {
        let tagset = Tagset::new(["N", "V"]);
        // a: 0 -<cat.N>-> 1, default 0 -> 2
        let mut a = Automaton::new("a");
        a.add_state(true, false);
        a.add_state(false, true);
        a.add_state(false, true);
        a.add_transition(q(0), sym("<cat.N>"), q(1)).unwrap();
        a.set_default(q(0), q(2)).unwrap();
        // b: 0 -<V>-> 0
        let mut b = Automaton::new("b");
        b.add_state(true, true);
        b.add_transition(q(0), sym("<V>"), q(0)).unwrap();

        let builder = ProductBuilder::new(&tagset, [&a, &b]);
        let p = builder.build_product_state(&builder.initial_state_set()).unwrap();

        let targets = p
            .transitions()
            .iter()
            .map(|t| (t.label().to_string(), t.target().clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            targets,
            vec![
                ("<cat.N>".to_string(), [r(0, 1)].into_iter().collect()),
                ("<V>".to_string(), [r(0, 2), r(1, 0)].into_iter().collect()),
            ]
        );
        assert_eq!(p.default_target().as_slice(), &[r(0, 2)]);

        let dog = LexicalToken::new("dog", "dog", "N");
        assert_eq!(p.follow(&tagset, &dog), Some(p.default_target()));
        let run = LexicalToken::new("run", "run", "V");
        assert_eq!(p.follow(&tagset, &run).map(|s| s.len()), Some(2));
    }

    #[test]
    fn sources_are_not_mutated() {
        let tagset = Tagset::new(["N"]);
        let mut a = Automaton::new("a");
        a.add_state(true, true);
        a.add_transition(q(0), sym("<N>"), q(0)).unwrap();
        let mut b = Automaton::new("b");
        b.add_state(true, true);
        b.add_transition(q(0), sym("<cat.N>"), q(0)).unwrap();
        let (a0, b0) = (a.clone(), b.clone());

        let builder = ProductBuilder::new(&tagset, [&a, &b]);
        let p = builder.build_product_state(&builder.initial_state_set()).unwrap();
        assert_eq!(p.transitions().len(), 2);

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn refinement_limit_surfaces() {
        let tagset = Tagset::new(["N"]);
        let mut a = Automaton::new("a");
        a.add_state(true, true);
        a.add_transition(q(0), sym("<N>"), q(0)).unwrap();
        a.add_transition(q(0), sym("<cat.N>"), q(0)).unwrap();

        let config = AlgebraConfig {
            max_refinement_steps: Some(0),
            ..AlgebraConfig::default()
        };
        let builder = ProductBuilder::new(&tagset, [&a]).with_config(config);
        assert_eq!(
            builder.build_product_state(&builder.initial_state_set()),
            Err(ProductError::RefinementLimit(0))
        );
    }
}
