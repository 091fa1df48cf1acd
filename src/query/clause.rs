//! The clause tree a compiled query evaluates to.
//!
//! A query plan is an immutable tree built once per query string and read
//! concurrently afterwards. Leaf clauses carry their own occurrence
//! constraint; groups record the default combinator their children were
//! compiled under. Only structural equality is meaningful, and the derived
//! `PartialEq` provides it.

/// Whether a clause must, may, or must not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occur {
  /// The clause must match for a document to qualify.
  Must,
  /// The clause contributes to scoring without being mandatory.
  Should,
  /// Any document matching the clause is excluded.
  MustNot,
}

/// A single term with an occurrence constraint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermClause {
  /// The analyzed term text.
  pub term: String,
  /// Occurrence constraint for this clause.
  pub occur: Occur,
}

impl TermClause {
  /// Creates a term clause.
  pub fn new(term: impl Into<String>, occur: Occur) -> Self {
    Self {
      term: term.into(),
      occur,
    }
  }
}

/// An ordered sequence of terms that must appear together.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhraseClause {
  /// The analyzed terms, in order.
  pub terms: Vec<String>,
  /// How many position moves the executor may spend rearranging the
  /// phrase. 0 demands exact adjacency.
  pub slop: u32,
  /// Occurrence constraint for this clause.
  pub occur: Occur,
}

impl PhraseClause {
  /// Creates a phrase clause with slop 0.
  pub fn new(terms: Vec<String>, occur: Occur) -> Self {
    Self {
      terms,
      slop: 0,
      occur,
    }
  }

  /// Sets the slop.
  pub fn slop(mut self, slop: u32) -> Self {
    self.slop = slop;
    self
  }
}

/// A term matched approximately, within an edit-distance budget.
///
/// The compiler never emits fuzzy clauses; they are built programmatically
/// by callers layering a richer grammar on top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzyClause {
  /// The term to match approximately.
  pub term: String,
  /// Maximum Levenshtein distance a candidate may have.
  pub max_edits: u32,
  /// Occurrence constraint for this clause.
  pub occur: Occur,
}

impl FuzzyClause {
  /// Creates a fuzzy clause.
  pub fn new(term: impl Into<String>, max_edits: u32, occur: Occur) -> Self {
    Self {
      term: term.into(),
      max_edits,
      occur,
    }
  }
}

#[cfg(feature = "fuzzy")]
impl FuzzyClause {
  /// Does `candidate` lie within `max_edits` of the clause term?
  pub fn matches(&self, candidate: &str) -> bool {
    let max = self.max_edits as usize;

    // Length difference is a lower bound on edit distance.
    let term_len = self.term.chars().count();
    let candidate_len = candidate.chars().count();
    if term_len.abs_diff(candidate_len) > max {
      return false;
    }

    strsim::levenshtein(&self.term, candidate) <= max
  }
}

/// Matches every term starting with a fixed prefix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixClause {
  /// The required prefix.
  pub prefix: String,
  /// Occurrence constraint for this clause.
  pub occur: Occur,
}

impl PrefixClause {
  /// Creates a prefix clause.
  pub fn new(prefix: impl Into<String>, occur: Occur) -> Self {
    Self {
      prefix: prefix.into(),
      occur,
    }
  }

  /// Does `candidate` start with the clause prefix?
  pub fn matches(&self, candidate: &str) -> bool {
    candidate.starts_with(&self.prefix)
  }
}

/// Matches terms against a glob pattern with `*` and `?`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WildcardClause {
  /// Pattern where `*` matches any run of characters (including none) and
  /// `?` matches exactly one.
  pub pattern: String,
  /// Occurrence constraint for this clause.
  pub occur: Occur,
}

impl WildcardClause {
  /// Creates a wildcard clause.
  pub fn new(pattern: impl Into<String>, occur: Occur) -> Self {
    Self {
      pattern: pattern.into(),
      occur,
    }
  }

  /// Does `candidate` match the glob pattern?
  pub fn matches(&self, candidate: &str) -> bool {
    glob_match(&self.pattern, candidate)
  }
}

// Two-pointer glob matching over characters, backtracking to the most
// recent `*` on mismatch.
fn glob_match(pattern: &str, candidate: &str) -> bool {
  let pattern: Vec<char> = pattern.chars().collect();
  let text: Vec<char> = candidate.chars().collect();

  let mut p = 0;
  let mut t = 0;
  let mut star: Option<usize> = None;
  let mut star_t = 0;

  while t < text.len() {
    if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
      p += 1;
      t += 1;
    } else if p < pattern.len() && pattern[p] == '*' {
      star = Some(p);
      star_t = t;
      p += 1;
    } else if let Some(sp) = star {
      // Let the last `*` swallow one more character and retry.
      p = sp + 1;
      star_t += 1;
      t = star_t;
    } else {
      return false;
    }
  }

  while p < pattern.len() && pattern[p] == '*' {
    p += 1;
  }
  p == pattern.len()
}

/// Matches terms inside a lexicographic range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeClause {
  /// Lower bound; `None` leaves the range open downwards.
  pub lower: Option<String>,
  /// Upper bound; `None` leaves the range open upwards.
  pub upper: Option<String>,
  /// Whether the lower bound itself is inside the range.
  pub lower_inclusive: bool,
  /// Whether the upper bound itself is inside the range.
  pub upper_inclusive: bool,
  /// Occurrence constraint for this clause.
  pub occur: Occur,
}

impl RangeClause {
  /// Creates a range clause with inclusive bounds.
  pub fn new(lower: Option<String>, upper: Option<String>, occur: Occur) -> Self {
    Self {
      lower,
      upper,
      lower_inclusive: true,
      upper_inclusive: true,
      occur,
    }
  }

  /// Sets whether the lower bound is inside the range.
  pub fn lower_inclusive(mut self, inclusive: bool) -> Self {
    self.lower_inclusive = inclusive;
    self
  }

  /// Sets whether the upper bound is inside the range.
  pub fn upper_inclusive(mut self, inclusive: bool) -> Self {
    self.upper_inclusive = inclusive;
    self
  }

  /// Does `term` fall inside the range?
  pub fn contains(&self, term: &str) -> bool {
    if let Some(lower) = &self.lower {
      let above = if self.lower_inclusive {
        term >= lower.as_str()
      } else {
        term > lower.as_str()
      };
      if !above {
        return false;
      }
    }
    if let Some(upper) = &self.upper {
      let below = if self.upper_inclusive {
        term <= upper.as_str()
      } else {
        term < upper.as_str()
      };
      if !below {
        return false;
      }
    }
    true
  }
}

/// An ordered group of clauses compiled under one default combinator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BooleanGroup {
  /// The member clauses, in query order.
  pub clauses: Vec<Clause>,
  /// The occurrence unmarked members were assigned at compile time.
  pub default_occur: Occur,
}

impl BooleanGroup {
  /// Creates a group from already-built clauses.
  pub fn new(clauses: Vec<Clause>, default_occur: Occur) -> Self {
    Self {
      clauses,
      default_occur,
    }
  }
}

/// One node of the clause tree.
///
/// The query compiler only ever emits `Term`, `Phrase` and `Group`; the
/// remaining kinds exist for callers assembling plans programmatically on
/// top of a richer grammar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Clause {
  /// A single-term clause.
  Term(TermClause),
  /// An ordered multi-term phrase.
  Phrase(PhraseClause),
  /// An approximate term match.
  Fuzzy(FuzzyClause),
  /// A term-prefix match.
  Prefix(PrefixClause),
  /// A glob-pattern match.
  Wildcard(WildcardClause),
  /// A lexicographic term range.
  Range(RangeClause),
  /// A nested group of clauses.
  Group(BooleanGroup),
}

impl Clause {
  /// Shortcut for a term clause.
  pub fn term(term: impl Into<String>, occur: Occur) -> Self {
    Clause::Term(TermClause::new(term, occur))
  }

  /// Shortcut for a phrase clause with slop 0.
  pub fn phrase(terms: Vec<String>, occur: Occur) -> Self {
    Clause::Phrase(PhraseClause::new(terms, occur))
  }

  /// The occurrence constraint of this clause.
  ///
  /// For groups this is the default combinator the group was built with.
  pub fn occur(&self) -> Occur {
    match self {
      Clause::Term(c) => c.occur,
      Clause::Phrase(c) => c.occur,
      Clause::Fuzzy(c) => c.occur,
      Clause::Prefix(c) => c.occur,
      Clause::Wildcard(c) => c.occur,
      Clause::Range(c) => c.occur,
      Clause::Group(g) => g.default_occur,
    }
  }
}

/// The root of a compiled query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanNode {
  /// Match every document.
  MatchAll,
  /// Match nothing.
  MatchNone,
  /// Evaluate a clause tree.
  Clause(Clause),
}

/// A compiled query: the clause tree plus the field set it targets.
///
/// The field list travels with the plan so an executor can expand clauses
/// across fields and resolve their weights without consulting the compiler
/// again.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryPlan {
  /// The root node.
  pub root: PlanNode,
  /// The fields the query was compiled against, in configuration order.
  pub fields: Vec<String>,
}

impl QueryPlan {
  /// Is this the match-everything plan?
  pub fn is_match_all(&self) -> bool {
    matches!(self.root, PlanNode::MatchAll)
  }

  /// Is this the match-nothing plan?
  pub fn is_match_none(&self) -> bool {
    matches!(self.root, PlanNode::MatchNone)
  }
}
