use itertools::Itertools;

use super::{Automaton, AutomatonError, Transition};
use crate::config::AlgebraConfig;
use crate::symbol::SymbolAlgebra;
use crate::types::StateIndex;

impl<S: Clone> Automaton<S> {
    /// At most one initial state, and no state with two overlapping labels.
    pub fn is_deterministic<A>(&self, algebra: &A) -> bool
    where
        A: SymbolAlgebra<Symbol = S>,
    {
        self.first_nondeterministic_state(algebra).is_none()
    }

    fn first_nondeterministic_state<A>(&self, algebra: &A) -> Option<StateIndex>
    where
        A: SymbolAlgebra<Symbol = S>,
    {
        if self.initials.len() > 1 {
            return Some(self.initials[1]);
        }

        self.states
            .iter()
            .position(|state| {
                state
                    .transitions
                    .iter()
                    .tuple_combinations()
                    .any(|(a, b)| algebra.overlaps(&a.label, &b.label))
            })
            .map(StateIndex::new)
    }

    /// Complements a deterministic automaton, with the default configuration.
    pub fn complement<A>(&mut self, algebra: &A) -> Result<(), AutomatonError>
    where
        A: SymbolAlgebra<Symbol = S>,
    {
        self.complement_with_config(algebra, &AlgebraConfig::default())
    }

    /// Replaces the automaton by one recognizing every token sequence it did
    /// not recognize.
    ///
    /// A trap state looping on itself through its default transition is
    /// added. Every state without a default transition gets transitions to
    /// the trap for whatever its labels leave uncovered, then every state,
    /// trap included, has its terminal flag flipped.
    ///
    /// The input must be deterministic. With `config.verify_determinism`
    /// this is checked up front and the automaton is left untouched on
    /// failure; without it, the result on a non-deterministic input is not
    /// a complement.
    pub fn complement_with_config<A>(
        &mut self,
        algebra: &A,
        config: &AlgebraConfig,
    ) -> Result<(), AutomatonError>
    where
        A: SymbolAlgebra<Symbol = S>,
    {
        if config.verify_determinism {
            if let Some(q) = self.first_nondeterministic_state(algebra) {
                return Err(AutomatonError::NotDeterministic(q));
            }
        }

        let trap = self.add_state(self.initials.is_empty(), false);
        self.states[trap.index()].default_target = Some(trap);

        let mut completed = 0;
        for state in &mut self.states {
            state.terminal = !state.terminal;

            if state.default_target.is_some() {
                continue;
            }

            let labels = state
                .transitions
                .iter()
                .map(|t| t.label.clone())
                .collect::<Vec<_>>();
            let rest = algebra.universal_minus(&labels);
            if !rest.is_empty() {
                completed += 1;
            }
            state
                .transitions
                .extend(rest.into_iter().map(|label| Transition::new(label, trap)));
        }

        log::debug!(
            "complement: trap state {}, {} state(s) completed",
            trap,
            completed
        );

        Ok(())
    }
}
