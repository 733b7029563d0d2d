//! Lexical backend — TF-IDF over the two texts being compared.
//!
//! No model, no state: each call fits a fresh vocabulary over exactly the
//! documents it was given. Tokens are word-character runs of length >= 2,
//! lowercased; idf is smoothed (`ln((1+n)/(1+df)) + 1`); rows are
//! L2-normalized so the cosine of two rows is their dot product. The
//! vocabulary is capped at 1000 terms by corpus frequency (ties broken
//! alphabetically) and laid out in alphabetical order.

use std::collections::{HashMap, HashSet};

use crate::similarity::{cosine_similarity, SimilarityBackend};

const MAX_FEATURES: usize = 1000;
const MIN_TOKEN_CHARS: usize = 2;

pub struct LexicalBackend;

impl SimilarityBackend for LexicalBackend {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let rows = fit_transform(&[a, b]);
        cosine_similarity(&rows[0], &rows[1])
    }

    fn embeddings(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let docs: Vec<&str> = texts.iter().map(String::as_str).collect();
        fit_transform(&docs)
    }
}

/// Word-character runs (alphanumeric plus underscore), lowercased, dropping
/// runs shorter than two characters.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut run = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            run.push(c);
        } else {
            flush_run(&mut run, &mut tokens);
        }
    }
    flush_run(&mut run, &mut tokens);

    tokens
}

fn flush_run(run: &mut String, tokens: &mut Vec<String>) {
    if run.chars().count() >= MIN_TOKEN_CHARS {
        tokens.push(run.to_lowercase());
    }
    run.clear();
}

/// Fits TF-IDF over `docs` and returns one L2-normalized row per document.
/// Documents with no tokens (or an empty fitted vocabulary) come back as
/// zero/empty rows.
fn fit_transform(docs: &[&str]) -> Vec<Vec<f32>> {
    let doc_tokens: Vec<Vec<String>> = docs.iter().map(|d| tokenize(d)).collect();
    let n_docs = docs.len();

    let mut df: HashMap<&str, usize> = HashMap::new();
    let mut corpus_count: HashMap<&str, usize> = HashMap::new();
    for tokens in &doc_tokens {
        let mut seen: HashSet<&str> = HashSet::new();
        for t in tokens {
            *corpus_count.entry(t.as_str()).or_insert(0) += 1;
            if seen.insert(t.as_str()) {
                *df.entry(t.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut vocab: Vec<&str> = corpus_count.keys().copied().collect();
    if vocab.len() > MAX_FEATURES {
        vocab.sort_by(|a, b| corpus_count[b].cmp(&corpus_count[a]).then(a.cmp(b)));
        vocab.truncate(MAX_FEATURES);
    }
    vocab.sort_unstable();
    let index: HashMap<&str, usize> = vocab.iter().enumerate().map(|(i, t)| (*t, i)).collect();

    let mut rows = Vec::with_capacity(n_docs);
    for tokens in &doc_tokens {
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for t in tokens {
            if index.contains_key(t.as_str()) {
                *tf.entry(t.as_str()).or_insert(0) += 1;
            }
        }

        let mut row = vec![0.0_f32; vocab.len()];
        for (term, count) in tf {
            let idf = ((1 + n_docs) as f32 / (1 + df[term]) as f32).ln() + 1.0;
            row[index[term]] = count as f32 * idf;
        }

        let norm: f32 = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut row {
                *v /= norm;
            }
        }
        rows.push(row);
    }

    rows
}
