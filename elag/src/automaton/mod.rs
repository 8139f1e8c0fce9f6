//! Finite-state automata over symbolic labels.
//!
//! States live in one array and refer to each other by [`StateIndex`]. A
//! state may carry a default transition, taken by every token that none of
//! its explicit transitions matches. The structural transforms (trim,
//! topological sort, union, complementation) all rewrite the state array in
//! place.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

mod complement;
mod topo;
mod transition;
mod trim;
mod union;

pub use self::transition::Transition;

use crate::symbol::SymbolAlgebra;
use crate::types::StateIndex;

/// Error with automaton construction or transformation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AutomatonError {
    /// A state index points outside the state array
    #[error("State {0} does not exist")]
    InvalidState(StateIndex),

    /// A state can only have one default transition
    #[error("State {0} already has a default transition")]
    DuplicateDefault(StateIndex),

    /// Topological sort hit a cycle
    #[error("No zero in-degree state remains but {remaining} unsorted states exist")]
    Cyclic {
        /// states left unsorted when the sort stalled
        remaining: usize,
    },

    /// Complementation needs a deterministic automaton
    #[error("Automaton is not deterministic at state {0}")]
    NotDeterministic(StateIndex),

    /// State indices are 32 bits wide
    #[error("{0} states do not fit in one automaton")]
    TooManyStates(usize),
}

/// Most states one automaton can hold, so that every index fits in a `u32`.
pub const MAX_STATES: usize = u32::MAX as usize;

#[inline(always)]
pub(crate) fn check_capacity(total: usize) -> Result<(), AutomatonError> {
    if total > MAX_STATES {
        Err(AutomatonError::TooManyStates(total))
    } else {
        Ok(())
    }
}

/// A state with its outgoing transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State<S> {
    pub(crate) transitions: Vec<Transition<S>>,
    pub(crate) default_target: Option<StateIndex>,
    pub(crate) initial: bool,
    pub(crate) terminal: bool,
}

impl<S> State<S> {
    fn new(initial: bool, terminal: bool) -> State<S> {
        State {
            transitions: Vec::new(),
            default_target: None,
            initial,
            terminal,
        }
    }

    #[inline(always)]
    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    #[inline(always)]
    pub fn default_target(&self) -> Option<StateIndex> {
        self.default_target
    }

    #[inline(always)]
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Targets of every explicit transition, then the default target.
    pub(crate) fn successors(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.transitions
            .iter()
            .map(Transition::target)
            .chain(self.default_target)
    }
}

/// An automaton: a state array and the list of its initial states.
///
/// Deserialization applies the checks of the builders: every target and
/// initial index must name a state, and the `initial` flags are taken from
/// the initial list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAutomaton<S>")]
pub struct Automaton<S> {
    name: Option<SmolStr>,
    states: Vec<State<S>>,
    initials: Vec<StateIndex>,
}

#[derive(Deserialize)]
struct RawAutomaton<S> {
    name: Option<SmolStr>,
    states: Vec<State<S>>,
    initials: Vec<StateIndex>,
}

impl<S> TryFrom<RawAutomaton<S>> for Automaton<S> {
    type Error = AutomatonError;

    fn try_from(raw: RawAutomaton<S>) -> Result<Self, Self::Error> {
        let RawAutomaton {
            name,
            mut states,
            initials,
        } = raw;

        check_capacity(states.len())?;
        let len = states.len();
        let check = |q: StateIndex| {
            if q.index() < len {
                Ok(())
            } else {
                Err(AutomatonError::InvalidState(q))
            }
        };

        for state in &states {
            state.successors().try_for_each(check)?;
        }
        initials.iter().copied().try_for_each(check)?;

        let initials = initials.into_iter().unique().collect::<Vec<_>>();
        for state in &mut states {
            state.initial = false;
        }
        for q in &initials {
            states[q.index()].initial = true;
        }

        Ok(Automaton {
            name,
            states,
            initials,
        })
    }
}

impl<S> Automaton<S> {
    /// A named automaton without states.
    pub fn new(name: &str) -> Automaton<S> {
        Automaton {
            name: Some(name.into()),
            states: Vec::new(),
            initials: Vec::new(),
        }
    }

    /// The canonical empty automaton: no name, no state, no initial state.
    pub fn empty() -> Automaton<S> {
        Automaton {
            name: None,
            states: Vec::new(),
            initials: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline(always)]
    pub fn states(&self) -> &[State<S>] {
        &self.states
    }

    #[inline(always)]
    pub fn state(&self, q: StateIndex) -> Option<&State<S>> {
        self.states.get(q.index())
    }

    #[inline(always)]
    pub fn initials(&self) -> &[StateIndex] {
        &self.initials
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of explicit transitions, default transitions not included.
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Turns the automaton into the canonical empty automaton.
    pub fn clear(&mut self) {
        self.name = None;
        self.states.clear();
        self.initials.clear();
    }

    /// Appends a state and returns its index. An automaton holds at most
    /// [`MAX_STATES`] states.
    pub fn add_state(&mut self, initial: bool, terminal: bool) -> StateIndex {
        let q = StateIndex::new(self.states.len());
        self.states.push(State::new(initial, terminal));
        if initial {
            self.initials.push(q);
        }
        q
    }

    /// Adds `from --label--> to`.
    pub fn add_transition(
        &mut self,
        from: StateIndex,
        label: S,
        to: StateIndex,
    ) -> Result<(), AutomatonError> {
        self.check(to)?;
        self.state_mut(from)?
            .transitions
            .push(Transition::new(label, to));
        Ok(())
    }

    /// Gives `from` a default transition to `to`.
    pub fn set_default(&mut self, from: StateIndex, to: StateIndex) -> Result<(), AutomatonError> {
        self.check(to)?;
        let state = self.state_mut(from)?;
        if state.default_target.is_some() {
            return Err(AutomatonError::DuplicateDefault(from));
        }
        state.default_target = Some(to);
        Ok(())
    }

    pub fn set_initial(&mut self, q: StateIndex) -> Result<(), AutomatonError> {
        self.state_mut(q)?.initial = true;
        if !self.initials.contains(&q) {
            self.initials.push(q);
        }
        Ok(())
    }

    pub fn unset_initial(&mut self, q: StateIndex) -> Result<(), AutomatonError> {
        self.state_mut(q)?.initial = false;
        self.initials.retain(|&i| i != q);
        Ok(())
    }

    pub fn set_terminal(&mut self, q: StateIndex, terminal: bool) -> Result<(), AutomatonError> {
        self.state_mut(q)?.terminal = terminal;
        Ok(())
    }

    /// Whether the token sequence leads from an initial state to a terminal one.
    pub fn accepts<A>(&self, algebra: &A, tokens: &[A::Token]) -> bool
    where
        A: SymbolAlgebra<Symbol = S>,
    {
        let mut active = vec![false; self.states.len()];
        for q in &self.initials {
            active[q.index()] = true;
        }

        for token in tokens {
            let mut next = vec![false; self.states.len()];

            for (state, _) in self.states.iter().zip(&active).filter(|(_, on)| **on) {
                let mut matched = false;
                for transition in &state.transitions {
                    if algebra.matches(&transition.label, token) {
                        next[transition.target.index()] = true;
                        matched = true;
                    }
                }
                if !matched {
                    if let Some(default) = state.default_target {
                        next[default.index()] = true;
                    }
                }
            }

            if !next.iter().any(|&on| on) {
                return false;
            }
            active = next;
        }

        self.states
            .iter()
            .zip(&active)
            .any(|(state, &on)| on && state.terminal)
    }

    #[inline(always)]
    fn check(&self, q: StateIndex) -> Result<(), AutomatonError> {
        if q.index() < self.states.len() {
            Ok(())
        } else {
            Err(AutomatonError::InvalidState(q))
        }
    }

    #[inline(always)]
    fn state_mut(&mut self, q: StateIndex) -> Result<&mut State<S>, AutomatonError> {
        self.states
            .get_mut(q.index())
            .ok_or(AutomatonError::InvalidState(q))
    }
}
