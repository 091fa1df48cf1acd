//! Expansion of compiled clauses across the weighted field set.
//!
//! A plan stays field-agnostic until an executor expands its leaves: one
//! clause becomes one instance per configured field, each carrying the
//! weight the parameter table resolves for that field. Dispatch is plain
//! functions keyed on clause kind; there is no parser hierarchy to
//! subclass.
//!
//! Term clauses are the only kind whose per-field statistics are folded
//! through the combined-field formula. Phrase, fuzzy, prefix, wildcard and
//! range clauses evaluate per field (with that field's `k1`/`b`, see
//! [`crate::scoring::Bm25fScorer::for_field`]) and combine as a boolean
//! OR of field hits.

use crate::params::FieldParams;
use crate::query::clause::{Clause, PhraseClause, PlanNode, QueryPlan, TermClause};

/// One field's instance of an expanded term clause.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldedTerm {
  /// Target field.
  pub field: String,
  /// The term to look up in that field.
  pub term: String,
  /// The field's weight from the parameter table.
  pub weight: f32,
}

/// One field's instance of an expanded phrase clause.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldedPhrase {
  /// Target field.
  pub field: String,
  /// The phrase terms, in order.
  pub terms: Vec<String>,
  /// Position slack inherited from the clause.
  pub slop: u32,
  /// The field's weight from the parameter table.
  pub weight: f32,
}

/// One field's instance of any expanded leaf clause.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldedClause {
  /// Target field.
  pub field: String,
  /// The field's weight from the parameter table.
  pub weight: f32,
  /// A copy of the leaf clause to evaluate against the field.
  pub clause: Clause,
}

/// Expands a term clause into one lookup per field.
pub fn expand_term(
  clause: &TermClause,
  fields: &[String],
  params: &FieldParams,
) -> Vec<FieldedTerm> {
  fields
    .iter()
    .map(|field| FieldedTerm {
      field: field.clone(),
      term: clause.term.clone(),
      weight: params.weight(field),
    })
    .collect()
}

/// Expands a phrase clause into one fielded phrase per field.
pub fn expand_phrase(
  clause: &PhraseClause,
  fields: &[String],
  params: &FieldParams,
) -> Vec<FieldedPhrase> {
  fields
    .iter()
    .map(|field| FieldedPhrase {
      field: field.clone(),
      terms: clause.terms.clone(),
      slop: clause.slop,
      weight: params.weight(field),
    })
    .collect()
}

/// Expands any leaf clause into one copy per field.
///
/// Covers the kinds without a dedicated expansion (fuzzy, prefix,
/// wildcard, range) and works for terms and phrases too. Groups are not
/// leaves and expand to nothing; recurse with [`walk_leaves`] first.
pub fn expand_leaf(clause: &Clause, fields: &[String], params: &FieldParams) -> Vec<FieldedClause> {
  if matches!(clause, Clause::Group(_)) {
    return Vec::new();
  }

  fields
    .iter()
    .map(|field| FieldedClause {
      field: field.clone(),
      weight: params.weight(field),
      clause: clause.clone(),
    })
    .collect()
}

/// Visits every leaf clause of a plan in query order, recursing through
/// groups. Match-all and match-none plans have no leaves.
pub fn walk_leaves<F>(plan: &QueryPlan, mut visit: F)
where
  F: FnMut(&Clause),
{
  if let PlanNode::Clause(root) = &plan.root {
    walk_clause(root, &mut visit);
  }
}

fn walk_clause<F>(clause: &Clause, visit: &mut F)
where
  F: FnMut(&Clause),
{
  match clause {
    Clause::Group(group) => {
      for member in &group.clauses {
        walk_clause(member, visit);
      }
    }
    leaf => visit(leaf),
  }
}
