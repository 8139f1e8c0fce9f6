//! Alphabet refinement.
//!
//! Two labels that overlap without being equal are split into their
//! intersection and their remainders, each fragment keeping the target of
//! the label it came from. Once a list (or a pair of lists) is refined, any
//! two of its labels are either equal or disjoint, and every original
//! transition is exactly covered by its fragments.
use super::ProductError;
use crate::automaton::Transition;
use crate::symbol::SymbolAlgebra;

/// Counts label splits against an optional limit.
#[derive(Debug, Clone)]
pub struct SplitBudget {
    spent: usize,
    limit: Option<usize>,
}

impl SplitBudget {
    pub fn new(limit: Option<usize>) -> SplitBudget {
        SplitBudget { spent: 0, limit }
    }

    pub fn unlimited() -> SplitBudget {
        SplitBudget::new(None)
    }

    /// Splits performed so far.
    pub fn spent(&self) -> usize {
        self.spent
    }

    fn spend(&mut self) -> Result<(), ProductError> {
        if let Some(limit) = self.limit {
            if self.spent >= limit {
                return Err(ProductError::RefinementLimit(limit));
            }
        }
        self.spent += 1;
        Ok(())
    }
}

/// `transition` cut down to `inter`, followed by whatever of its label lies
/// outside `other`.
fn fragments<A>(
    algebra: &A,
    transition: &Transition<A::Symbol>,
    inter: &A::Symbol,
    other: &A::Symbol,
) -> Vec<Transition<A::Symbol>>
where
    A: SymbolAlgebra,
{
    std::iter::once(transition.clone_with_label(inter.clone()))
        .chain(
            algebra
                .difference(transition.label(), other)
                .into_iter()
                .map(|label| transition.clone_with_label(label)),
        )
        .collect()
}

#[inline]
fn split_point<A>(algebra: &A, a: &A::Symbol, b: &A::Symbol) -> Option<A::Symbol>
where
    A: SymbolAlgebra,
{
    if a == b {
        None
    } else {
        algebra.intersect(a, b)
    }
}

/// Refines `left` against `right` until every label of one list is equal to
/// or disjoint from every label of the other. Returns whether anything was
/// split.
///
/// Each pass scans the pairs once, resuming after every split. Passes repeat
/// until one splits nothing.
pub fn refine<A>(
    algebra: &A,
    left: &mut Vec<Transition<A::Symbol>>,
    right: &mut Vec<Transition<A::Symbol>>,
    budget: &mut SplitBudget,
) -> Result<bool, ProductError>
where
    A: SymbolAlgebra,
{
    let mut changed = false;

    loop {
        let mut split = false;
        let mut i = 0;
        while i < left.len() {
            let mut j = 0;
            while j < right.len() {
                let inter = match split_point(algebra, left[i].label(), right[j].label()) {
                    Some(inter) => inter,
                    None => {
                        j += 1;
                        continue;
                    }
                };

                budget.spend()?;
                log::trace!(
                    "refine: {:?} / {:?} -> {:?}",
                    left[i].label(),
                    right[j].label(),
                    inter
                );

                let left_pieces = fragments(algebra, &left[i], &inter, right[j].label());
                let right_pieces = fragments(algebra, &right[j], &inter, left[i].label());
                let skip = right_pieces.len();
                left.splice(i..=i, left_pieces);
                right.splice(j..=j, right_pieces);
                // left[i] is now the intersection: equal to right[j], disjoint
                // from the rest of its pieces
                j += skip;
                split = true;
            }
            i += 1;
        }

        if !split {
            return Ok(changed);
        }
        changed = true;
    }
}

/// Refines the labels of a single list against each other.
pub fn refine_within<A>(
    algebra: &A,
    list: &mut Vec<Transition<A::Symbol>>,
    budget: &mut SplitBudget,
) -> Result<bool, ProductError>
where
    A: SymbolAlgebra,
{
    let mut changed = false;

    loop {
        let mut split = false;
        let mut i = 0;
        while i < list.len() {
            let mut j = i + 1;
            while j < list.len() {
                let inter = match split_point(algebra, list[i].label(), list[j].label()) {
                    Some(inter) => inter,
                    None => {
                        j += 1;
                        continue;
                    }
                };

                budget.spend()?;
                log::trace!(
                    "refine within: {:?} / {:?} -> {:?}",
                    list[i].label(),
                    list[j].label(),
                    inter
                );

                let first = fragments(algebra, &list[i], &inter, list[j].label());
                let second = fragments(algebra, &list[j], &inter, list[i].label());
                let skip = first.len() - 1 + second.len();
                // i < j: replace the later one first so `i` stays valid
                list.splice(j..=j, second);
                list.splice(i..=i, first);
                j += skip;
                split = true;
            }
            i += 1;
        }

        if !split {
            return Ok(changed);
        }
        changed = true;
    }
}
