//! Query compilation: from raw strings to field-expanded clause trees.
//!
//! [`QueryCompiler`] turns a query string into a [`QueryPlan`], an
//! immutable tree of term and phrase clauses with occurrence constraints.
//! The plan records the field set it was compiled against; executors use
//! the functions in [`expand`] to fan each leaf out across those fields
//! with the weights a [`crate::params::FieldParams`] table resolves.
//!
//! # Example
//!
//! ```rust
//! use fieldrank::params::FieldParams;
//! use fieldrank::query::{expand_term, Clause, PlanNode, QueryCompiler};
//!
//! let params = FieldParams::builder()
//!     .weight("title", 5.0)
//!     .weight("body", 1.0)
//!     .build()
//!     .unwrap();
//!
//! let compiler = QueryCompiler::new(vec!["title".to_string(), "body".to_string()]);
//! let plan = compiler.compile("hello");
//!
//! if let PlanNode::Clause(Clause::Term(term)) = &plan.root {
//!     let lookups = expand_term(term, &plan.fields, &params);
//!     assert_eq!(lookups.len(), 2);
//!     assert_eq!(lookups[0].weight, 5.0);
//! }
//! ```

/// The clause tree a compiled query evaluates to.
pub mod clause;
/// The query-string compiler and its operator setting.
pub mod compiler;
/// Expansion of clauses across the weighted field set.
pub mod expand;

pub use clause::{
  BooleanGroup, Clause, FuzzyClause, Occur, PhraseClause, PlanNode, PrefixClause, QueryPlan,
  RangeClause, TermClause, WildcardClause,
};
pub use compiler::{DefaultOperator, QueryCompiler};
pub use expand::{
  expand_leaf, expand_phrase, expand_term, walk_leaves, FieldedClause, FieldedPhrase, FieldedTerm,
};
