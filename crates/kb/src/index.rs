//! BM25 (Okapi) lexical index over tokenized chunks.
//!
//! The index is immutable once built; a reindex builds a fresh one and the
//! knowledge base swaps it in atomically.

use std::collections::HashMap;

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// An immutable BM25 index over a fixed set of documents.
pub struct Bm25Index {
    /// Per-document term frequencies
    term_freqs: Vec<HashMap<String, usize>>,

    /// Per-document token counts
    doc_lens: Vec<usize>,

    /// Average document length over the corpus
    avg_doc_len: f64,

    /// Inverse document frequency per term
    idf: HashMap<String, f64>,
}

impl Bm25Index {
    /// Build an index from pre-tokenized documents.
    pub fn build(docs: &[Vec<String>]) -> Self {
        let n = docs.len();
        let mut term_freqs = Vec::with_capacity(n);
        let mut doc_lens = Vec::with_capacity(n);
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();

        for tokens in docs {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lens.push(tokens.len());
            term_freqs.push(freqs);
        }

        let total_len: usize = doc_lens.iter().sum();
        let avg_doc_len = if n > 0 {
            total_len as f64 / n as f64
        } else {
            0.0
        };

        let idf = doc_freqs
            .into_iter()
            .map(|(term, df)| {
                let value =
                    (((n as f64 - df as f64 + 0.5) / (df as f64 + 0.5)) + 1.0).ln();
                (term, value)
            })
            .collect();

        Self {
            term_freqs,
            doc_lens,
            avg_doc_len,
            idf,
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }

    /// Score every document against a tokenized query.
    ///
    /// Returns one score per document, in document order. Terms the corpus
    /// has never seen contribute nothing.
    pub fn scores(&self, query: &[String]) -> Vec<f64> {
        let mut scores = vec![0.0; self.term_freqs.len()];
        if self.avg_doc_len == 0.0 {
            return scores;
        }

        for term in query {
            let Some(&idf) = self.idf.get(term) else {
                continue;
            };
            for (i, freqs) in self.term_freqs.iter().enumerate() {
                let f = *freqs.get(term).unwrap_or(&0) as f64;
                if f == 0.0 {
                    continue;
                }
                let dl = self.doc_lens[i] as f64;
                let denom = f + K1 * (1.0 - B + B * dl / self.avg_doc_len);
                scores[i] += idf * (f * (K1 + 1.0)) / denom;
            }
        }
        scores
    }

    /// Indices of the `top_k` highest-scoring documents with score > 0,
    /// best first. Ties keep document order.
    pub fn top_k(&self, query: &[String], top_k: usize) -> Vec<(usize, f64)> {
        let scores = self.scores(query);
        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .collect();
        // stable sort keeps document order on equal scores
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);
        ranked
    }
}
