use super::Automaton;
use crate::types::StateIndex;

const ACCESSIBLE: u8 = 1;
const CO_ACCESSIBLE: u8 = ACCESSIBLE << 1;
const USEFUL: u8 = ACCESSIBLE | CO_ACCESSIBLE;

impl<S> Automaton<S> {
    /// Removes every state that is not on a path from an initial state to a
    /// terminal state.
    ///
    /// Surviving states keep their relative order and are renumbered from 0.
    /// Transitions into removed states are dropped, and so are default
    /// transitions into removed states. Without any useful state the
    /// automaton becomes [`Automaton::empty`].
    pub fn trim(&mut self) {
        let len = self.states.len();

        let mut incoming: Vec<Vec<StateIndex>> = vec![Vec::new(); len];
        for (q, state) in self.states.iter().enumerate() {
            for target in state.successors() {
                incoming[target.index()].push(StateIndex::new(q));
            }
        }

        let mut marks = vec![0u8; len];

        let mut stack = self.initials.clone();
        while let Some(q) = stack.pop() {
            if marks[q.index()] & ACCESSIBLE != 0 {
                continue;
            }
            marks[q.index()] |= ACCESSIBLE;
            stack.extend(self.states[q.index()].successors());
        }

        let mut stack = (0..len)
            .filter(|&q| self.states[q].terminal)
            .map(StateIndex::new)
            .collect::<Vec<_>>();
        while let Some(q) = stack.pop() {
            if marks[q.index()] & CO_ACCESSIBLE != 0 {
                continue;
            }
            marks[q.index()] |= CO_ACCESSIBLE;
            stack.extend(incoming[q.index()].iter().copied());
        }

        let mut renumber: Vec<Option<StateIndex>> = vec![None; len];
        let mut useful = 0;
        for (q, &mark) in marks.iter().enumerate() {
            if mark == USEFUL {
                renumber[q] = Some(StateIndex::new(useful));
                useful += 1;
            }
        }

        log::debug!(
            "trim {}: {}/{} useful states",
            self.name().unwrap_or("<anonymous>"),
            useful,
            len
        );

        if useful == 0 {
            self.clear();
            return;
        }

        if useful == len {
            return;
        }

        let states = std::mem::take(&mut self.states);
        self.states = states
            .into_iter()
            .zip(&renumber)
            .filter(|(_, new)| new.is_some())
            .map(|(mut state, _)| {
                let before = state.transitions.len();
                state.transitions = state
                    .transitions
                    .into_iter()
                    .filter_map(|mut transition| {
                        let to = renumber[transition.target.index()]?;
                        transition.retarget(to);
                        Some(transition)
                    })
                    .collect();

                state.default_target = state.default_target.and_then(|d| renumber[d.index()]);
                if state.default_target.is_some() && state.transitions.len() < before {
                    log::warn!(
                        "trim: dropped {} transition(s) of a state with a default transition",
                        before - state.transitions.len()
                    );
                }
                state
            })
            .collect();

        self.initials = self
            .initials
            .iter()
            .filter_map(|q| renumber[q.index()])
            .collect();
    }
}
