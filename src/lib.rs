//! # Proplog
//!
//! A minimal forward-chaining inference engine for propositional definite
//! clauses (`head <-- body1 & body2 & ...`).
//!
//! ## Features
//!
//! - Fixpoint saturation over a set of known-true atoms
//!
//! ## Example
//!
//! ```rust
//! use proplog::{Atom, KnowledgeBase, Rule};
//!
//! let mut kb = KnowledgeBase::new();
//! kb.set_rules(vec![Rule::parse("wet <-- rain").unwrap()]);
//! kb.tell(Atom::new("rain").unwrap());
//!
//! let derived = kb.infer_all();
//! assert!(derived.contains(&Atom::new("wet").unwrap()));
//! ```

/// Definite-clause inference engine.
pub mod engine;
pub use engine::{is_atom, Atom, Error, KnowledgeBase, Rule};
