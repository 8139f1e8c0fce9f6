//! Shared fixtures and generators for the integration tests.

#![allow(dead_code)]

use elag::{Automaton, LexicalSymbol, LexicalToken, StateIndex, Tagset};
use proptest::collection::vec;
use proptest::prelude::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tagset() -> Tagset {
    Tagset::new(["N", "V"])
}

pub fn sym(s: &str) -> LexicalSymbol {
    s.parse().unwrap()
}

pub fn q(n: usize) -> StateIndex {
    StateIndex::new(n)
}

/// Labels the generators draw from. They overlap in every possible way.
pub const LABELS: &[&str] = &[
    "<.>", "<N>", "<V>", "<PNC>", "<cat.N>", "<dog.N>", "<!cat.N>", "<!cat!dog.N>", "<run.V>",
    "<..PNC>",
];

/// Label lists that are pairwise disjoint, for deterministic automata.
pub const DISJOINT_FAMILIES: &[&[&str]] = &[
    &[],
    &["<.>"],
    &["<N>", "<V>"],
    &["<cat.N>", "<!cat.N>"],
    &["<cat.N>", "<V>"],
    &["<dog.N>", "<run.V>", "<PNC>"],
    &["<!cat.N>", "<..PNC>"],
    &["<!cat!dog.N>", "<cat.N>", "<V>", "<PNC>"],
];

/// Every token of the modelled universe the tests look at.
pub fn tokens() -> Vec<LexicalToken> {
    vec![
        LexicalToken::new("cats", "cat", "N"),
        LexicalToken::new("dogs", "dog", "N"),
        LexicalToken::new("eels", "eel", "N"),
        LexicalToken::new("runs", "run", "V"),
        LexicalToken::new("walks", "walk", "V"),
        LexicalToken::new(".", ".", "PNC"),
        LexicalToken::new(",", ",", "PNC"),
    ]
}

/// Every token sequence of length at most `max_len`.
pub fn sequences(max_len: usize) -> Vec<Vec<LexicalToken>> {
    let alphabet = tokens();
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix: &Vec<LexicalToken>| {
                alphabet.iter().map(move |token| {
                    let mut next = prefix.clone();
                    next.push(token.clone());
                    next
                })
            })
            .collect();
        all.extend(frontier.iter().cloned());
    }
    all
}

#[derive(Debug, Clone)]
pub struct AutomatonSpec {
    pub initial: Vec<bool>,
    pub terminal: Vec<bool>,
    pub transitions: Vec<(usize, &'static str, usize)>,
    pub defaults: Vec<Option<usize>>,
}

impl AutomatonSpec {
    pub fn build(&self, name: &str) -> Automaton<LexicalSymbol> {
        let mut a = Automaton::new(name);
        for (&initial, &terminal) in self.initial.iter().zip(&self.terminal) {
            a.add_state(initial, terminal);
        }
        for &(from, label, to) in &self.transitions {
            a.add_transition(q(from), sym(label), q(to)).unwrap();
        }
        for (from, default) in self.defaults.iter().enumerate() {
            if let Some(to) = default {
                a.set_default(q(from), q(*to)).unwrap();
            }
        }
        a
    }
}

/// Arbitrary, possibly non-deterministic automata with up to `max_states`
/// states. Without `with_defaults` no state has a default transition.
pub fn arb_automaton(max_states: usize, with_defaults: bool) -> impl Strategy<Value = AutomatonSpec> {
    (1..=max_states).prop_flat_map(move |n| {
        let default = if with_defaults {
            prop::option::of(0..n).boxed()
        } else {
            Just(None::<usize>).boxed()
        };
        (
            vec(any::<bool>(), n),
            vec(any::<bool>(), n),
            vec((0..n, prop::sample::select(LABELS), 0..n), 0..=3 * n),
            vec(default, n),
        )
            .prop_map(|(initial, terminal, transitions, defaults)| AutomatonSpec {
                initial,
                terminal,
                transitions,
                defaults,
            })
    })
}

/// Deterministic automata: one initial state, pairwise disjoint labels on
/// every state, optional defaults.
pub fn arb_deterministic(max_states: usize) -> impl Strategy<Value = AutomatonSpec> {
    (1..=max_states).prop_flat_map(|n| {
        (
            vec(any::<bool>(), n),
            vec(
                (
                    prop::sample::select(DISJOINT_FAMILIES),
                    vec(0..n, 4),
                    prop::option::of(0..n),
                ),
                n,
            ),
        )
            .prop_map(move |(terminal, states)| {
                let mut transitions = Vec::new();
                let mut defaults = Vec::new();
                for (from, (family, targets, default)) in states.into_iter().enumerate() {
                    for (&label, &to) in family.iter().zip(&targets) {
                        transitions.push((from, label, to));
                    }
                    defaults.push(default);
                }
                AutomatonSpec {
                    initial: (0..n).map(|i| i == 0).collect(),
                    terminal,
                    transitions,
                    defaults,
                }
            })
    })
}
