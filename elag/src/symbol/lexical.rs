//! Lexical labels over a closed tagset.
//!
//! A label denotes a set of tagged tokens. The universe is every token whose
//! grammatical code belongs to the [`Tagset`]; punctuation is the reserved
//! code [`PUNCTUATION`].
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::SymbolAlgebra;

/// Grammatical code given to punctuation tokens.
pub const PUNCTUATION: &str = "PNC";

/// Label of a transition in a lexical automaton.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LexicalSymbol {
    /// Any token of the universe.
    Lexic,
    /// Any token with the given code whose lemma is not excluded. With an
    /// empty exclusion set this is a plain grammatical code, otherwise a
    /// negated code.
    Code {
        /// grammatical code
        pos: SmolStr,
        /// forbidden lemmas
        excluded: BTreeSet<SmolStr>,
    },
    /// Every token with the given lemma and code.
    Atom {
        /// grammatical code
        pos: SmolStr,
        /// lemma
        lemma: SmolStr,
    },
}

impl LexicalSymbol {
    /// `<pos>`
    pub fn code(pos: &str) -> LexicalSymbol {
        LexicalSymbol::Code {
            pos: pos.into(),
            excluded: BTreeSet::new(),
        }
    }

    /// `<!lemma1!lemma2.pos>`
    pub fn negated_code<'a, I>(pos: &str, excluded: I) -> LexicalSymbol
    where
        I: IntoIterator<Item = &'a str>,
    {
        LexicalSymbol::Code {
            pos: pos.into(),
            excluded: excluded.into_iter().map(SmolStr::from).collect(),
        }
    }

    /// `<lemma.pos>`
    pub fn atom(lemma: &str, pos: &str) -> LexicalSymbol {
        LexicalSymbol::Atom {
            pos: pos.into(),
            lemma: lemma.into(),
        }
    }

    /// A punctuation literal.
    pub fn punc(mark: &str) -> LexicalSymbol {
        LexicalSymbol::atom(mark, PUNCTUATION)
    }

    /// The grammatical code, `None` for the universal label.
    pub fn pos(&self) -> Option<&str> {
        match self {
            LexicalSymbol::Lexic => None,
            LexicalSymbol::Code { pos, .. } | LexicalSymbol::Atom { pos, .. } => Some(pos.as_str()),
        }
    }
}

impl fmt::Display for LexicalSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalSymbol::Lexic => write!(f, "<.>"),
            LexicalSymbol::Code { pos, excluded } if excluded.is_empty() => write!(f, "<{}>", pos),
            LexicalSymbol::Code { pos, excluded } => {
                write!(f, "<")?;
                for lemma in excluded {
                    write!(f, "!{}", lemma)?;
                }
                write!(f, ".{}>", pos)
            }
            LexicalSymbol::Atom { pos, lemma } => write!(f, "<{}.{}>", lemma, pos),
        }
    }
}

/// Error while reading a label written as `<lemma.CODE>`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SymbolParseError {
    /// The label is not enclosed in `<` and `>`
    #[error("label must be enclosed in angle brackets: {0}")]
    MissingBrackets(String),
    /// Nothing after the last dot
    #[error("empty grammatical code in {0}")]
    EmptyCode(String),
    /// A lemma (or forbidden lemma) is empty
    #[error("empty lemma in {0}")]
    EmptyLemma(String),
}

impl FromStr for LexicalSymbol {
    type Err = SymbolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .ok_or_else(|| SymbolParseError::MissingBrackets(s.to_string()))?;

        if inner == "." {
            return Ok(LexicalSymbol::Lexic);
        }

        let (lemmas, pos) = match inner.rsplit_once('.') {
            Some(split) => split,
            None => ("", inner),
        };

        if pos.is_empty() {
            return Err(SymbolParseError::EmptyCode(s.to_string()));
        }

        if lemmas.is_empty() {
            if inner.contains('.') {
                return Err(SymbolParseError::EmptyLemma(s.to_string()));
            }
            return Ok(LexicalSymbol::code(pos));
        }

        match lemmas.strip_prefix('!') {
            Some(negated) => {
                let excluded = negated.split('!').collect::<Vec<_>>();
                if excluded.iter().any(|lemma| lemma.is_empty()) {
                    return Err(SymbolParseError::EmptyLemma(s.to_string()));
                }
                Ok(LexicalSymbol::negated_code(pos, excluded))
            }
            None => Ok(LexicalSymbol::atom(lemmas, pos)),
        }
    }
}

/// A token of tagged text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LexicalToken {
    /// inflected form
    pub form: SmolStr,
    /// lemma
    pub lemma: SmolStr,
    /// grammatical code
    pub pos: SmolStr,
}

impl LexicalToken {
    /// Creates a token.
    pub fn new(form: &str, lemma: &str, pos: &str) -> LexicalToken {
        LexicalToken {
            form: form.into(),
            lemma: lemma.into(),
            pos: pos.into(),
        }
    }
}

/// The grammatical codes of a language. Acts as the [`SymbolAlgebra`] for
/// [`LexicalSymbol`] labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tagset {
    codes: Vec<SmolStr>,
    code_to_index: HashMap<SmolStr, usize>,
}

impl Tagset {
    /// Builds a tagset from a list of codes. [`PUNCTUATION`] is always part of it.
    pub fn new<'a, I>(codes: I) -> Tagset
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tagset = Tagset {
            codes: Vec::new(),
            code_to_index: HashMap::new(),
        };
        tagset.add_code(PUNCTUATION);
        for code in codes {
            tagset.add_code(code);
        }
        tagset
    }

    /// Adds a code, returning `false` if it was already known.
    pub fn add_code(&mut self, code: &str) -> bool {
        if self.code_to_index.contains_key(code) {
            return false;
        }
        self.code_to_index.insert(code.into(), self.codes.len());
        self.codes.push(code.into());
        true
    }

    /// Known codes, punctuation first.
    #[inline(always)]
    pub fn codes(&self) -> &[SmolStr] {
        &self.codes
    }

    /// Whether `code` is part of the tagset.
    #[inline(always)]
    pub fn contains(&self, code: &str) -> bool {
        self.code_to_index.contains_key(code)
    }

    /// Number of codes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Never true: punctuation is always present.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn in_universe(&self, symbol: &LexicalSymbol) -> bool {
        symbol.pos().map_or(true, |pos| self.contains(pos))
    }

    /// Full codes of every category but `pos`.
    fn other_codes<'a>(&'a self, pos: &'a str) -> impl Iterator<Item = LexicalSymbol> + 'a {
        self.codes
            .iter()
            .filter(move |code| code.as_str() != pos)
            .map(|code| LexicalSymbol::code(code))
    }

    /// `outer` minus `inner`, where `inner` is a strict, non-empty subset of `outer`.
    fn subtract_subset(&self, outer: &LexicalSymbol, inner: &LexicalSymbol) -> Vec<LexicalSymbol> {
        use LexicalSymbol::*;

        match (outer, inner) {
            (Lexic, Code { pos, excluded }) => self
                .other_codes(pos)
                .chain(excluded.iter().map(|lemma| LexicalSymbol::atom(lemma, pos)))
                .collect(),
            (Lexic, Atom { pos, lemma }) => self
                .other_codes(pos)
                .chain(std::iter::once(LexicalSymbol::negated_code(
                    pos,
                    std::iter::once(lemma.as_str()),
                )))
                .collect(),
            (
                Code {
                    pos,
                    excluded: outer_excluded,
                },
                Code {
                    excluded: inner_excluded,
                    ..
                },
            ) => inner_excluded
                .difference(outer_excluded)
                .map(|lemma| LexicalSymbol::atom(lemma, pos))
                .collect(),
            (Code { pos, excluded }, Atom { lemma, .. }) => {
                let mut excluded = excluded.clone();
                excluded.insert(lemma.clone());
                vec![Code {
                    pos: pos.clone(),
                    excluded,
                }]
            }
            _ => vec![],
        }
    }
}

impl SymbolAlgebra for Tagset {
    type Symbol = LexicalSymbol;
    type Token = LexicalToken;

    fn intersect(&self, a: &LexicalSymbol, b: &LexicalSymbol) -> Option<LexicalSymbol> {
        use LexicalSymbol::*;

        match (a, b) {
            (Lexic, other) | (other, Lexic) => {
                if self.in_universe(other) {
                    Some(other.clone())
                } else {
                    None
                }
            }
            (
                Code {
                    pos: p,
                    excluded: e1,
                },
                Code {
                    pos: q,
                    excluded: e2,
                },
            ) => {
                if p != q {
                    return None;
                }
                Some(Code {
                    pos: p.clone(),
                    excluded: e1.union(e2).cloned().collect(),
                })
            }
            (Code { pos: p, excluded }, Atom { pos: q, lemma })
            | (Atom { pos: q, lemma }, Code { pos: p, excluded }) => {
                if p == q && !excluded.contains(lemma) {
                    Some(Atom {
                        pos: q.clone(),
                        lemma: lemma.clone(),
                    })
                } else {
                    None
                }
            }
            (Atom { .. }, Atom { .. }) => {
                if a == b {
                    Some(a.clone())
                } else {
                    None
                }
            }
        }
    }

    fn difference(&self, a: &LexicalSymbol, b: &LexicalSymbol) -> Vec<LexicalSymbol> {
        let inter = match self.intersect(a, b) {
            Some(inter) => inter,
            None => return vec![a.clone()],
        };

        if &inter == a {
            return vec![];
        }

        self.subtract_subset(a, &inter)
    }

    fn universal_minus(&self, labels: &[LexicalSymbol]) -> Vec<LexicalSymbol> {
        let mut rest = self
            .codes
            .iter()
            .map(|code| LexicalSymbol::code(code))
            .collect::<Vec<_>>();

        for label in labels {
            if rest.is_empty() {
                break;
            }
            rest = rest
                .iter()
                .flat_map(|piece| self.difference(piece, label))
                .collect();
        }

        rest
    }

    fn matches(&self, symbol: &LexicalSymbol, token: &LexicalToken) -> bool {
        match symbol {
            LexicalSymbol::Lexic => self.contains(&token.pos),
            LexicalSymbol::Code { pos, excluded } => {
                *pos == token.pos && !excluded.contains(&token.lemma)
            }
            LexicalSymbol::Atom { pos, lemma } => *pos == token.pos && *lemma == token.lemma,
        }
    }
}
