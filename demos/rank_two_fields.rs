//! Two-field ranking walkthrough: compile a query, split its plan into
//! scored and prohibited terms, aggregate per-field statistics and print
//! explained scores.

use std::collections::HashMap;

use fieldrank::prelude::*;

/// A documentation page for demonstration.
#[derive(Debug, Clone)]
pub struct Page {
  pub title: String,
  pub body: String,
}

impl Page {
  /// Create a new page.
  pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      body: body.into(),
    }
  }
}

/// Create sample pages for the walkthrough.
pub fn sample_pages() -> Vec<Page> {
  vec![
    Page::new(
      "Getting Started with Rust",
      "Rust is a systems programming language focused on safety and speed.",
    ),
    Page::new(
      "Building a Search Engine",
      "How to build a search engine in Rust, covering indexing, ranking and query parsing.",
    ),
    Page::new(
      "Ranking with BM25",
      "BM25 scores documents by term frequency, document length and term rarity.",
    ),
    Page::new(
      "Slow Queries and How to Avoid Them",
      "Profiling slow search queries in large deployments.",
    ),
  ]
}

const FIELDS: [&str; 2] = ["title", "body"];

fn field_text<'a>(page: &'a Page, field: &str) -> &'a str {
  match field {
    "title" => &page.title,
    _ => &page.body,
  }
}

fn mentions(per_field: &HashMap<&str, Vec<String>>, term: &str) -> bool {
  per_field
    .values()
    .any(|terms| terms.iter().any(|t| t.as_str() == term))
}

fn doc_frequency(tokens: &[HashMap<&str, Vec<String>>], term: &str) -> u64 {
  tokens.iter().filter(|doc| mentions(doc, term)).count() as u64
}

fn occurrences_for(
  per_field: &HashMap<&str, Vec<String>>,
  term: &str,
) -> Vec<FieldOccurrence<'static>> {
  FIELDS
    .iter()
    .map(|&field| {
      let (tf, len) = per_field
        .get(field)
        .map(|terms| {
          (
            terms.iter().filter(|t| t.as_str() == term).count() as u32,
            terms.len() as u32,
          )
        })
        .unwrap_or((0, 0));
      FieldOccurrence::new(field, tf, len)
    })
    .collect()
}

fn main() -> Result<(), ConfigError> {
  println!("=== Two-field BM25F walkthrough ===\n");

  let pages = sample_pages();
  let analyzer = SimpleAnalyzer;

  // A title hit is worth five body hits.
  let params = FieldParams::builder()
    .weight("title", 5.0)
    .weight("body", 1.0)
    .build()?;

  let compiler = QueryCompiler::new(FIELDS.iter().map(|f| f.to_string()).collect());

  let query = "+rust search -slow";
  let plan = compiler.compile(query);
  println!("query: {:?}", query);
  println!("plan:  {:?}\n", plan.root);

  // Split the plan into scored and prohibited terms.
  let mut scored_terms: Vec<TermClause> = Vec::new();
  let mut prohibited: Vec<String> = Vec::new();
  walk_leaves(&plan, |clause| {
    if let Clause::Term(term) = clause {
      if term.occur == Occur::MustNot {
        prohibited.push(term.term.clone());
      } else {
        scored_terms.push(term.clone());
      }
    }
  });

  // Tokenize the corpus once, then derive the collection statistics.
  let tokens: Vec<HashMap<&str, Vec<String>>> = pages
    .iter()
    .map(|page| {
      FIELDS
        .iter()
        .map(|&field| (field, analyzer.analyze(field, field_text(page, field))))
        .collect()
    })
    .collect();

  let mut length_sums: HashMap<String, u64> = HashMap::new();
  for per_field in &tokens {
    for (field, terms) in per_field {
      *length_sums.entry(field.to_string()).or_default() += terms.len() as u64;
    }
  }
  let doc_count = pages.len() as u64;
  let avg = average_weighted_length(&length_sums, doc_count, &params);
  println!("average weighted length: {:.2}\n", avg);

  // Score every page that avoids the prohibited terms.
  let mut ranked: Vec<(usize, f32)> = Vec::new();
  for (index, per_field) in tokens.iter().enumerate() {
    if prohibited.iter().any(|term| mentions(per_field, term)) {
      continue;
    }

    let mut total = 0.0;
    for clause in &scored_terms {
      let term_idf = idf(doc_frequency(&tokens, &clause.term), doc_count);
      let occurrences = occurrences_for(per_field, &clause.term);
      total += score_term(&occurrences, term_idf, avg, &params);
    }
    ranked.push((index, total));
  }
  ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

  for (rank, (index, score)) in ranked.iter().enumerate() {
    println!("{}. {} (score: {:.3})", rank + 1, pages[*index].title, score);
  }

  // Show the full derivation of the first term against the best page.
  if let (Some((best, _)), Some(clause)) = (ranked.first(), scored_terms.first()) {
    let term_idf = idf(doc_frequency(&tokens, &clause.term), doc_count);
    let occurrences = occurrences_for(&tokens[*best], &clause.term);

    println!();
    println!(
      "{}",
      explain_term(&clause.term, &occurrences, term_idf, avg, &params)
    );
  }

  Ok(())
}
