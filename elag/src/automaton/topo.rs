use std::collections::VecDeque;

use super::{Automaton, AutomatonError};
use crate::types::StateIndex;

impl<S> Automaton<S> {
    /// Renumbers the states so that every transition, default transitions
    /// included, goes from a lower to a higher index.
    ///
    /// The order is computed before anything is rewritten: on a cyclic
    /// automaton this returns [`AutomatonError::Cyclic`] and leaves the
    /// automaton as it was.
    pub fn topological_sort(&mut self) -> Result<(), AutomatonError> {
        let len = self.states.len();

        let mut in_degree = vec![0usize; len];
        for state in &self.states {
            for target in state.successors() {
                in_degree[target.index()] += 1;
            }
        }

        let mut ready = (0..len)
            .filter(|&q| in_degree[q] == 0)
            .collect::<VecDeque<_>>();
        let mut order = Vec::with_capacity(len);

        while let Some(q) = ready.pop_front() {
            order.push(q);
            for target in self.states[q].successors() {
                let degree = &mut in_degree[target.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(target.index());
                }
            }
        }

        if order.len() < len {
            return Err(AutomatonError::Cyclic {
                remaining: len - order.len(),
            });
        }

        let mut renumber = vec![StateIndex::new(0); len];
        for (new, &old) in order.iter().enumerate() {
            renumber[old] = StateIndex::new(new);
        }

        log::trace!("topological order: {:?}", order);

        let mut states = std::mem::take(&mut self.states)
            .into_iter()
            .zip(renumber.iter().copied())
            .map(|(mut state, new)| {
                for transition in &mut state.transitions {
                    let to = renumber[transition.target.index()];
                    transition.retarget(to);
                }
                state.default_target = state.default_target.map(|d| renumber[d.index()]);
                (new, state)
            })
            .collect::<Vec<_>>();
        states.sort_by_key(|(new, _)| *new);
        self.states = states.into_iter().map(|(_, state)| state).collect();

        for q in &mut self.initials {
            *q = renumber[q.index()];
        }

        Ok(())
    }
}
