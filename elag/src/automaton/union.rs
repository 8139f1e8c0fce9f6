use super::{check_capacity, Automaton, AutomatonError};

impl<S> Automaton<S> {
    /// Absorbs `other`: its states are appended after this automaton's own
    /// states, with every target shifted accordingly, and its initial states
    /// stay initial. The result recognizes the union of both languages.
    ///
    /// Fails with [`AutomatonError::TooManyStates`], leaving both operands
    /// untouched, when the result would exceed [`super::MAX_STATES`].
    pub fn union(&mut self, other: Automaton<S>) -> Result<(), AutomatonError> {
        let offset = self.states.len();
        check_capacity(offset + other.states.len())?;

        log::debug!(
            "union: appending {} state(s) at offset {}",
            other.states.len(),
            offset
        );

        self.states.reserve(other.states.len());
        self.states
            .extend(other.states.into_iter().map(|mut state| {
                for transition in &mut state.transitions {
                    let to = transition.target.shift(offset);
                    transition.retarget(to);
                }
                state.default_target = state.default_target.map(|d| d.shift(offset));
                state
            }));

        self.initials
            .extend(other.initials.into_iter().map(|q| q.shift(offset)));

        Ok(())
    }
}
