//! Compiles raw query strings into clause trees.
//!
//! The compiler is a single-pass character state machine. All of its
//! configuration (field set, analyzer, default operator) is fixed at
//! construction, so one instance can compile any number of queries from
//! any number of threads concurrently.

use std::str::FromStr;

use tracing::debug;

#[cfg(feature = "analysis")]
use crate::analysis::SimpleAnalyzer;
use crate::analysis::Analyzer;
use crate::error::ConfigError;
use crate::query::clause::{
  BooleanGroup, Clause, Occur, PhraseClause, PlanNode, QueryPlan, TermClause,
};

/// The occurrence assigned to clauses that carry no explicit marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefaultOperator {
  /// Unmarked clauses are optional (`Should`).
  Or,
  /// Unmarked clauses are required (`Must`).
  And,
}

impl Default for DefaultOperator {
  /// Defaults to OR semantics.
  fn default() -> Self {
    DefaultOperator::Or
  }
}

impl DefaultOperator {
  /// The occurrence this operator assigns to unmarked clauses.
  pub fn occur(self) -> Occur {
    match self {
      DefaultOperator::Or => Occur::Should,
      DefaultOperator::And => Occur::Must,
    }
  }
}

impl FromStr for DefaultOperator {
  type Err = ConfigError;

  /// Parses `or`/`should` and `and`/`must`, ignoring ASCII case.
  ///
  /// Anything else is rejected with [`ConfigError::InvalidOperator`].
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "or" | "should" => Ok(DefaultOperator::Or),
      "and" | "must" => Ok(DefaultOperator::And),
      _ => Err(ConfigError::InvalidOperator(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy)]
enum State {
  Default,
  InToken,
  InPhrase,
  Escaped { in_phrase: bool },
}

/// Compiles query strings over a fixed set of fields.
///
/// Syntax recognized by the compiler:
///
/// - bare words become term clauses, split and normalized by the analyzer;
/// - `"..."` groups words into a phrase clause (an unterminated quote at
///   the end of the input still completes its phrase);
/// - a leading `+` or `-` marks the next clause required or prohibited;
///   elsewhere both characters are ordinary text;
/// - `\` makes the following character literal, suppressing all of the
///   above;
/// - a query that is exactly `*` compiles to the match-all plan, and a
///   query with no extractable terms compiles to the match-none plan.
///
/// Compilation is total: there is no such thing as a malformed query
/// string. Richer grammars (field prefixes, ranges, AND/OR keywords) are
/// expected to be layered on top by the caller; their tokens pass through
/// as literal text.
///
/// # Examples
///
/// ```rust
/// use fieldrank::query::{DefaultOperator, QueryCompiler};
///
/// let compiler = QueryCompiler::new(vec!["title".to_string(), "body".to_string()])
///     .default_operator(DefaultOperator::Or);
///
/// let plan = compiler.compile("+rust \"inverted index\" -slow");
/// assert!(!plan.is_match_none());
/// ```
pub struct QueryCompiler {
  fields: Vec<String>,
  default_operator: DefaultOperator,
  analyzer: Box<dyn Analyzer>,
}

#[cfg(feature = "analysis")]
impl QueryCompiler {
  /// Creates a compiler over `fields` using [`SimpleAnalyzer`].
  pub fn new(fields: Vec<String>) -> Self {
    Self::with_analyzer(fields, SimpleAnalyzer)
  }
}

impl QueryCompiler {
  /// Creates a compiler with a custom analyzer.
  ///
  /// Terms are analyzed against the first configured field, which keeps
  /// field-sensitive analyzers deterministic; the compiled plan itself is
  /// field-agnostic until expanded.
  pub fn with_analyzer(fields: Vec<String>, analyzer: impl Analyzer + 'static) -> Self {
    Self {
      fields,
      default_operator: DefaultOperator::default(),
      analyzer: Box::new(analyzer),
    }
  }

  /// Sets the default operator.
  pub fn default_operator(mut self, operator: DefaultOperator) -> Self {
    self.default_operator = operator;
    self
  }

  /// Compiles a raw query string into a plan.
  ///
  /// Never fails; see the type-level docs for the degradation rules on
  /// unusual input.
  pub fn compile(&self, raw: &str) -> QueryPlan {
    if raw.trim() == "*" {
      debug!("compiled match-all plan from {:?}", raw);
      return QueryPlan {
        root: PlanNode::MatchAll,
        fields: self.fields.clone(),
      };
    }

    let mut clauses = self.parse_clauses(raw);
    debug!("compiled {} clause(s) from {:?}", clauses.len(), raw);

    let root = match clauses.pop() {
      None => PlanNode::MatchNone,
      Some(only) if clauses.is_empty() && only.occur() != Occur::MustNot => {
        PlanNode::Clause(only)
      }
      Some(last) => {
        clauses.push(last);
        PlanNode::Clause(Clause::Group(BooleanGroup::new(
          clauses,
          self.default_operator.occur(),
        )))
      }
    };

    QueryPlan {
      root,
      fields: self.fields.clone(),
    }
  }

  fn parse_clauses(&self, raw: &str) -> Vec<Clause> {
    let analysis_field = self.fields.first().map(String::as_str).unwrap_or("");
    let default_occur = self.default_operator.occur();

    let mut clauses = Vec::new();
    let mut token = String::new();
    let mut phrase = String::new();
    let mut pending: Option<Occur> = None;
    let mut state = State::Default;

    for ch in raw.chars() {
      match state {
        State::Default => {
          if ch == '\\' {
            state = State::Escaped { in_phrase: false };
          } else if ch == '"' {
            state = State::InPhrase;
          } else if ch == '+' {
            pending = Some(Occur::Must);
          } else if ch == '-' {
            pending = Some(Occur::MustNot);
          } else if ch.is_whitespace() {
            // A marker not followed directly by its clause is dropped.
            pending = None;
          } else {
            token.push(ch);
            state = State::InToken;
          }
        }
        State::InToken => {
          if ch == '\\' {
            state = State::Escaped { in_phrase: false };
          } else if ch == '"' {
            self.flush_token(&mut token, &mut pending, default_occur, analysis_field, &mut clauses);
            state = State::InPhrase;
          } else if ch.is_whitespace() {
            self.flush_token(&mut token, &mut pending, default_occur, analysis_field, &mut clauses);
            state = State::Default;
          } else {
            token.push(ch);
          }
        }
        State::InPhrase => {
          if ch == '\\' {
            state = State::Escaped { in_phrase: true };
          } else if ch == '"' {
            self.flush_phrase(&mut phrase, &mut pending, default_occur, analysis_field, &mut clauses);
            state = State::Default;
          } else {
            phrase.push(ch);
          }
        }
        State::Escaped { in_phrase } => {
          if in_phrase {
            phrase.push(ch);
            state = State::InPhrase;
          } else {
            token.push(ch);
            state = State::InToken;
          }
        }
      }
    }

    // End of input: a dangling escape contributes nothing, buffered text
    // flushes, and an unterminated phrase still completes.
    match state {
      State::InPhrase | State::Escaped { in_phrase: true } => {
        self.flush_phrase(&mut phrase, &mut pending, default_occur, analysis_field, &mut clauses);
      }
      _ => {
        self.flush_token(&mut token, &mut pending, default_occur, analysis_field, &mut clauses);
      }
    }

    clauses
  }

  /// Analyzes the buffered token into term clauses, one per sub-term the
  /// analyzer produces, each carrying the pending occurrence.
  fn flush_token(
    &self,
    token: &mut String,
    pending: &mut Option<Occur>,
    default_occur: Occur,
    analysis_field: &str,
    clauses: &mut Vec<Clause>,
  ) {
    let occur = pending.take().unwrap_or(default_occur);
    if token.is_empty() {
      return;
    }

    let text = std::mem::take(token);
    for term in self.analyzer.analyze(analysis_field, &text) {
      clauses.push(Clause::Term(TermClause::new(term, occur)));
    }
  }

  /// Analyzes the buffered phrase text into one phrase clause; a phrase
  /// the analyzer reduces to nothing is dropped.
  fn flush_phrase(
    &self,
    phrase: &mut String,
    pending: &mut Option<Occur>,
    default_occur: Occur,
    analysis_field: &str,
    clauses: &mut Vec<Clause>,
  ) {
    let occur = pending.take().unwrap_or(default_occur);
    if phrase.is_empty() {
      return;
    }

    let text = std::mem::take(phrase);
    let terms = self.analyzer.analyze(analysis_field, &text);
    if terms.is_empty() {
      return;
    }

    clauses.push(Clause::Phrase(PhraseClause::new(terms, occur)));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analysis::WhitespaceAnalyzer;

  fn compiler() -> QueryCompiler {
    QueryCompiler::with_analyzer(
      vec!["title".to_string(), "body".to_string()],
      WhitespaceAnalyzer,
    )
  }

  fn term(text: &str, occur: Occur) -> Clause {
    Clause::term(text, occur)
  }

  #[test]
  fn test_star_compiles_to_match_all() {
    assert!(compiler().compile("*").is_match_all());
    assert!(compiler().compile("  *  ").is_match_all());
  }

  #[test]
  fn test_star_mixed_with_text_is_ordinary() {
    let plan = compiler().compile("* foo");
    assert!(!plan.is_match_all());
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(group.clauses.len(), 2);
        assert_eq!(group.clauses[0], term("*", Occur::Should));
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_empty_input_compiles_to_match_none() {
    assert!(compiler().compile("").is_match_none());
    assert!(compiler().compile("   \t  ").is_match_none());
  }

  #[test]
  fn test_analyzer_dropping_everything_compiles_to_match_none() {
    let silent =
      QueryCompiler::with_analyzer(vec!["title".to_string()], |_: &str, _: &str| Vec::new());
    assert!(silent.compile("some words here").is_match_none());
  }

  #[test]
  fn test_single_term_is_unwrapped() {
    let plan = compiler().compile("hello");
    assert_eq!(plan.root, PlanNode::Clause(term("hello", Occur::Should)));
    assert_eq!(plan.fields, vec!["title", "body"]);
  }

  #[test]
  fn test_single_prohibited_term_stays_grouped() {
    let plan = compiler().compile("-spam");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(group.clauses, vec![term("spam", Occur::MustNot)]);
        assert_eq!(group.default_occur, Occur::Should);
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_required_and_optional_markers() {
    let plan = compiler().compile("+required optional");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses,
          vec![term("required", Occur::Must), term("optional", Occur::Should)]
        );
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_prohibited_marker() {
    let plan = compiler().compile("allowed -prohibited");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses,
          vec![term("allowed", Occur::Should), term("prohibited", Occur::MustNot)]
        );
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_quoted_phrase() {
    let plan = compiler().compile("\"search engine\"");
    assert_eq!(
      plan.root,
      PlanNode::Clause(Clause::phrase(
        vec!["search".to_string(), "engine".to_string()],
        Occur::Should
      ))
    );
  }

  #[test]
  fn test_phrase_slop_defaults_to_zero() {
    let plan = compiler().compile("\"a b\"");
    match plan.root {
      PlanNode::Clause(Clause::Phrase(phrase)) => assert_eq!(phrase.slop, 0),
      other => panic!("expected a phrase, got {:?}", other),
    }
  }

  #[test]
  fn test_marked_phrase() {
    let plan = compiler().compile("+\"exact words\" extra");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses[0],
          Clause::phrase(vec!["exact".to_string(), "words".to_string()], Occur::Must)
        );
        assert_eq!(group.clauses[1], term("extra", Occur::Should));
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_opening_quote_flushes_pending_token() {
    let plan = compiler().compile("abc\"def ghi\"");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(group.clauses[0], term("abc", Occur::Should));
        assert_eq!(
          group.clauses[1],
          Clause::phrase(vec!["def".to_string(), "ghi".to_string()], Occur::Should)
        );
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_unterminated_phrase_still_completes() {
    let plan = compiler().compile("\"lenient parsing");
    assert_eq!(
      plan.root,
      PlanNode::Clause(Clause::phrase(
        vec!["lenient".to_string(), "parsing".to_string()],
        Occur::Should
      ))
    );
  }

  #[test]
  fn test_empty_phrase_is_dropped() {
    assert!(compiler().compile("\"\"").is_match_none());

    let plan = compiler().compile("\"\" kept");
    assert_eq!(plan.root, PlanNode::Clause(term("kept", Occur::Should)));
  }

  #[test]
  fn test_escaped_plus_is_literal() {
    let plan = compiler().compile("\\+literal");
    assert_eq!(plan.root, PlanNode::Clause(term("+literal", Occur::Should)));
  }

  #[test]
  fn test_escaped_quote_is_literal() {
    let plan = compiler().compile("\\\"abc");
    assert_eq!(plan.root, PlanNode::Clause(term("\"abc", Occur::Should)));
  }

  #[test]
  fn test_escape_inside_phrase() {
    let plan = compiler().compile("\"a \\\"quoted\\\" phrase\"");
    assert_eq!(
      plan.root,
      PlanNode::Clause(Clause::phrase(
        vec!["a".to_string(), "\"quoted\"".to_string(), "phrase".to_string()],
        Occur::Should
      ))
    );
  }

  #[test]
  fn test_trailing_backslash_is_dropped() {
    let plan = compiler().compile("abc\\");
    assert_eq!(plan.root, PlanNode::Clause(term("abc", Occur::Should)));
  }

  #[test]
  fn test_marker_without_clause_resets_on_whitespace() {
    let plan = compiler().compile("+ foo");
    assert_eq!(plan.root, PlanNode::Clause(term("foo", Occur::Should)));
  }

  #[test]
  fn test_repeated_markers_last_one_wins() {
    let plan = compiler().compile("-+foo");
    assert_eq!(plan.root, PlanNode::Clause(term("foo", Occur::Must)));

    let plan = compiler().compile("+-foo");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(group.clauses, vec![term("foo", Occur::MustNot)]);
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_mid_token_plus_and_minus_are_literal() {
    let plan = compiler().compile("full-text c++");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses,
          vec![term("full-text", Occur::Should), term("c++", Occur::Should)]
        );
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_and_operator_requires_unmarked_clauses() {
    let compiler = compiler().default_operator(DefaultOperator::And);

    let plan = compiler.compile("alpha beta -gamma");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses,
          vec![
            term("alpha", Occur::Must),
            term("beta", Occur::Must),
            term("gamma", Occur::MustNot),
          ]
        );
        assert_eq!(group.default_occur, Occur::Must);
      }
      other => panic!("expected a group, got {:?}", other),
    }

    let single = compiler.compile("alpha");
    assert_eq!(single.root, PlanNode::Clause(term("alpha", Occur::Must)));
  }

  #[test]
  fn test_splitting_analyzer_expands_to_multiple_terms() {
    let dotted = QueryCompiler::with_analyzer(vec!["title".to_string()], |_: &str, text: &str| {
      text.split('.').map(str::to_string).collect()
    });

    let plan = dotted.compile("+a.b");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses,
          vec![term("a", Occur::Must), term("b", Occur::Must)]
        );
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }

  #[test]
  fn test_operator_from_str() {
    assert_eq!("or".parse::<DefaultOperator>(), Ok(DefaultOperator::Or));
    assert_eq!("SHOULD".parse::<DefaultOperator>(), Ok(DefaultOperator::Or));
    assert_eq!("and".parse::<DefaultOperator>(), Ok(DefaultOperator::And));
    assert_eq!("Must".parse::<DefaultOperator>(), Ok(DefaultOperator::And));

    assert_eq!(
      "xor".parse::<DefaultOperator>(),
      Err(ConfigError::InvalidOperator("xor".to_string()))
    );
  }

  #[cfg(feature = "analysis")]
  #[test]
  fn test_default_analyzer_strips_punctuation() {
    let compiler = QueryCompiler::new(vec!["title".to_string()]);
    let plan = compiler.compile("Hello, World!");
    match plan.root {
      PlanNode::Clause(Clause::Group(group)) => {
        assert_eq!(
          group.clauses,
          vec![term("hello", Occur::Should), term("world", Occur::Should)]
        );
      }
      other => panic!("expected a group, got {:?}", other),
    }
  }
}
