use super::StateRef;

/// Error while building a product state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProductError {
    /// A product state needs at least one member
    #[error("Cannot build a product state from an empty state set")]
    EmptyStateSet,

    /// The state set names an automaton or a state the builder does not know
    #[error("Unknown state {0}")]
    UnknownState(StateRef),

    /// Alphabet refinement needed more label splits than allowed
    #[error("Alphabet refinement exceeded {0} label splits")]
    RefinementLimit(usize),
}
