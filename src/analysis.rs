//! The analyzer seam between raw query text and terms.

#[cfg(feature = "analysis")]
use unicode_segmentation::UnicodeSegmentation;

/// A pluggable text analyzer.
///
/// The query compiler invokes the analyzer once per flushed token and once
/// per quoted phrase, passing the name of the field the terms are destined
/// for. Tokenization, stemming and stop-word filtering all live behind this
/// trait; the crate only assumes an ordered sequence of terms comes back,
/// and an empty sequence drops the token or phrase entirely.
///
/// The `Send + Sync` bounds let a single compiler serve concurrent callers.
pub trait Analyzer: Send + Sync {
  /// Analyze `text` destined for `field` into an ordered term sequence.
  fn analyze(&self, field: &str, text: &str) -> Vec<String>;
}

impl<F> Analyzer for F
where
  F: Fn(&str, &str) -> Vec<String> + Send + Sync,
{
  /// Any `Fn(&str, &str) -> Vec<String>` closure can serve as an analyzer.
  fn analyze(&self, field: &str, text: &str) -> Vec<String> {
    self(field, text)
  }
}

/// Splits on Unicode word boundaries and lowercases each word.
///
/// Punctuation and operator characters do not survive this analyzer; use
/// [`WhitespaceAnalyzer`] or a custom closure when they should.
#[cfg(feature = "analysis")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAnalyzer;

#[cfg(feature = "analysis")]
impl Analyzer for SimpleAnalyzer {
  fn analyze(&self, _field: &str, text: &str) -> Vec<String> {
    text
      .unicode_words()
      .map(|word| word.to_lowercase())
      .collect()
  }
}

/// Splits on whitespace and lowercases, leaving punctuation attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceAnalyzer;

impl Analyzer for WhitespaceAnalyzer {
  fn analyze(&self, _field: &str, text: &str) -> Vec<String> {
    text
      .split_whitespace()
      .map(|word| word.to_lowercase())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[cfg(feature = "analysis")]
  #[test]
  fn test_simple_analyzer_segments_and_lowercases() {
    let terms = SimpleAnalyzer.analyze("body", "Hello, World! engine-room");
    assert_eq!(terms, vec!["hello", "world", "engine", "room"]);
  }

  #[cfg(feature = "analysis")]
  #[test]
  fn test_simple_analyzer_drops_bare_punctuation() {
    assert!(SimpleAnalyzer.analyze("body", "+-*").is_empty());
  }

  #[test]
  fn test_whitespace_analyzer_keeps_punctuation() {
    let terms = WhitespaceAnalyzer.analyze("body", "+Literal  c++ ");
    assert_eq!(terms, vec!["+literal", "c++"]);
  }

  #[test]
  fn test_closure_is_an_analyzer() {
    let upper = |_field: &str, text: &str| vec![text.to_uppercase()];
    assert_eq!(upper.analyze("title", "abc"), vec!["ABC"]);
  }
}
