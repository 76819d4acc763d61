use indexmap::IndexSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The textual separator between a rule's head and its body.
const RULE_SEPARATOR: &str = "<--";

/// The textual separator between atoms in a rule body.
const BODY_SEPARATOR: char = '&';

/// Errors produced while constructing atoms and parsing rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The string does not match the atom grammar `letter (letter | digit)*`,
    /// where a letter is `_` or an ASCII letter.
    #[error("{0:?} is not a valid atom")]
    InvalidAtom(String),
    /// The line does not contain exactly one `<--` separator.
    #[error("malformed rule: {0:?}")]
    MalformedRule(String),
}

/// Returns true only if `s` is a valid atom identifier.
///
/// An atom is a non-empty string whose first character is a letter (`_` or an
/// ASCII letter) and whose remaining characters are letters or ASCII digits.
#[must_use]
pub fn is_atom(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_letter(first) => chars.all(|c| is_letter(c) || c.is_ascii_digit()),
        _ => false,
    }
}

/// A letter in the domain language.
fn is_letter(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// A validated propositional atom (e.g., `rain`, `wet_grass`).
///
/// Atoms are immutable and compare by their identifier string, so they can be
/// used directly as set and map keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Atom(String);

impl Atom {
    /// Create an atom from an identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAtom`] carrying the offending string when it
    /// does not match the atom grammar.
    pub fn new(atom: impl Into<String>) -> Result<Self, Error> {
        let atom = atom.into();
        if is_atom(&atom) {
            Ok(Self(atom))
        } else {
            Err(Error::InvalidAtom(atom))
        }
    }

    /// The atom's identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Atom {
    /// Renders the identifier double-quoted, for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl FromStr for Atom {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Atom {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Atom> for String {
    fn from(atom: Atom) -> Self {
        atom.0
    }
}

/// A definite clause `head <-- body1 & body2 & ...`.
///
/// The body is a conjunction of atoms; an empty body means the head is
/// unconditionally derivable. Empty-body rules can only be built directly,
/// never parsed, since the empty string is not a valid atom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// The conclusion of the rule.
    pub head: Atom,
    /// The conditions that must all be known true for the rule to fire.
    pub body: IndexSet<Atom>,
}

impl Rule {
    /// Create a rule from an explicit head and body.
    #[must_use]
    pub fn new(head: Atom, body: IndexSet<Atom>) -> Self {
        Self { head, body }
    }

    /// Parse one line of text of the form `HEAD <-- BODY1 & BODY2 & ...`.
    ///
    /// The head and each body segment are trimmed of surrounding whitespace
    /// and validated as atoms; duplicate body atoms collapse into one. A line
    /// whose body text is empty fails atom validation rather than producing a
    /// zero-body rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRule`] unless the line contains exactly one
    /// `<--` separator, and [`Error::InvalidAtom`] when the head or a body
    /// segment is not a valid atom.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let parts: Vec<&str> = line.split(RULE_SEPARATOR).collect();
        let [head_text, body_text] = parts.as_slice() else {
            return Err(Error::MalformedRule(line.to_string()));
        };

        let head = Atom::new(head_text.trim())?;
        let body = body_text
            .split(BODY_SEPARATOR)
            .map(|segment| Atom::new(segment.trim()))
            .collect::<Result<IndexSet<Atom>, Error>>()?;

        Ok(Self { head, body })
    }

    /// Returns true if every body atom is a member of `known`.
    ///
    /// An empty body is always satisfied.
    #[must_use]
    pub fn is_satisfied(&self, known: &IndexSet<Atom>) -> bool {
        self.body.is_subset(known)
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    /// Renders `head <-- b1 & b2 & ...` with body atoms in the set's
    /// iteration order. The order carries no meaning.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {RULE_SEPARATOR}", self.head)?;
        for (i, atom) in self.body.iter().enumerate() {
            if i == 0 {
                write!(f, " {atom}")?;
            } else {
                write!(f, " {BODY_SEPARATOR} {atom}")?;
            }
        }
        Ok(())
    }
}

/// The store of known-true atoms plus the rules used to derive more.
///
/// Both collections are instance-owned and only mutated through the methods
/// below. Rule order is preserved from loading; it affects how many passes
/// saturation needs, never the final fixpoint.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    atoms: IndexSet<Atom>,
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    #[must_use]
    pub fn new() -> Self {
        Self {
            atoms: IndexSet::new(),
            rules: Vec::new(),
        }
    }

    /// The atoms currently known to be true.
    #[must_use]
    pub fn atoms(&self) -> &IndexSet<Atom> {
        &self.atoms
    }

    /// The loaded rules, in load order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Append a single rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Replace the rule list wholesale. Known atoms are untouched.
    pub fn set_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    /// Add a single atom to the known set.
    ///
    /// Returns true if the atom was newly added, false if it was already
    /// known.
    pub fn tell(&mut self, atom: Atom) -> bool {
        self.atoms.insert(atom)
    }

    /// Saturate the known-atom set to its least fixpoint and return the atoms
    /// derived by this call.
    ///
    /// Each pass walks the rules in load order: a rule whose head is already
    /// known (or derived earlier in this call) is skipped; a rule whose body
    /// is fully contained in the known and derived atoms fires, adding its
    /// head to the derived set. Passes repeat until one derives nothing,
    /// which is guaranteed to happen since each non-final pass adds at least
    /// one of the finitely many rule heads.
    ///
    /// Rule order only changes how many passes are needed: a rule skipped in
    /// one pass is reconsidered on every later pass until it fires or the
    /// fixpoint is reached, so the final atom set is order-independent.
    pub fn infer_all(&mut self) -> IndexSet<Atom> {
        let mut derived: IndexSet<Atom> = IndexSet::new();
        let mut passes = 0usize;
        loop {
            let before = derived.len();
            for rule in &self.rules {
                if self.atoms.contains(&rule.head) || derived.contains(&rule.head) {
                    continue;
                }
                // Membership is checked against both sets rather than
                // materializing their union every pass.
                let satisfied = rule
                    .body
                    .iter()
                    .all(|atom| self.atoms.contains(atom) || derived.contains(atom));
                if satisfied {
                    derived.insert(rule.head.clone());
                }
            }
            passes += 1;
            if derived.len() == before {
                break;
            }
        }
        log::debug!(
            "saturation reached fixpoint after {passes} passes, {} new atoms",
            derived.len()
        );

        self.atoms.extend(derived.iter().cloned());
        derived
    }

    /// Forget all known atoms. Rules are untouched.
    pub fn clear_atoms(&mut self) {
        self.atoms.clear();
    }
}
