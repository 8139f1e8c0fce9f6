use serde::{Deserialize, Serialize};

use crate::types::StateIndex;

/// A labelled edge to another state of the same automaton.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<S> {
    pub(crate) label: S,
    pub(crate) target: StateIndex,
}

impl<S> Transition<S> {
    pub fn new(label: S, target: StateIndex) -> Transition<S> {
        Transition { label, target }
    }

    #[inline(always)]
    pub fn label(&self) -> &S {
        &self.label
    }

    #[inline(always)]
    pub fn target(&self) -> StateIndex {
        self.target
    }

    #[inline(always)]
    pub(crate) fn retarget(&mut self, target: StateIndex) {
        self.target = target;
    }

    /// Same target, different label.
    #[inline(always)]
    pub fn clone_with_label(&self, label: S) -> Transition<S> {
        Transition {
            label,
            target: self.target,
        }
    }
}
