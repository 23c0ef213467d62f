//! Retrieval over the local document corpus.
//!
//! The knowledge base walks a directory of .txt/.md/.pdf files, splits them
//! into overlapping character chunks, and indexes the chunks with BM25.
//! Retrieval is purely lexical; there are no embeddings involved.

pub mod chunker;
pub mod corpus;
pub mod index;

use greenmow_core::Result;
use index::Bm25Index;
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Maximum chunks a single retrieval may return.
pub const MAX_TOP_K: usize = 8;

/// A retrievable chunk of a corpus document.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    /// "<file name>#chunk<index>", unique within one index build
    pub doc_id: String,

    /// The chunk text
    pub text: String,
}

/// A chunk returned from retrieval, with its BM25 score.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieved {
    pub doc_id: String,
    pub text: String,
    pub score: f64,
}

struct IndexState {
    chunks: Vec<Chunk>,
    index: Bm25Index,
}

/// The knowledge base: corpus directory, chunking parameters, and the
/// current index generation.
///
/// Reindexing builds a complete new state off to the side and swaps it in
/// under the write lock, so concurrent retrievals always see either the old
/// or the new index in full.
pub struct KnowledgeBase {
    dir: PathBuf,
    chunk_size: usize,
    overlap: usize,
    state: RwLock<Option<IndexState>>,
}

impl KnowledgeBase {
    pub fn new(dir: PathBuf, chunk_size: usize, overlap: usize) -> Self {
        Self {
            dir,
            chunk_size,
            overlap,
            state: RwLock::new(None),
        }
    }

    /// Rebuild the index from the corpus directory.
    ///
    /// Returns the number of chunks indexed. An empty or missing corpus
    /// leaves the index absent, which is not an error.
    pub async fn reload(&self) -> Result<usize> {
        let docs = corpus::load_corpus(&self.dir);

        let mut chunks = Vec::new();
        for doc in &docs {
            for (i, text) in chunker::chunk_text(&doc.text, self.chunk_size, self.overlap)
                .into_iter()
                .enumerate()
            {
                chunks.push(Chunk {
                    doc_id: format!("{}#chunk{}", doc.file_name, i),
                    text,
                });
            }
        }

        let count = chunks.len();
        tracing::info!(
            documents = docs.len(),
            chunks = count,
            "knowledge base reindexed"
        );

        // no corpus, no index
        let next = if chunks.is_empty() {
            None
        } else {
            let tokenized: Vec<Vec<String>> =
                chunks.iter().map(|c| chunker::tokenize(&c.text)).collect();
            let index = Bm25Index::build(&tokenized);
            Some(IndexState { chunks, index })
        };

        let mut state = self.state.write().await;
        *state = next;
        Ok(count)
    }

    /// Retrieve the best-matching chunks for a query.
    ///
    /// `top_k` is clamped to 1..=8. Only chunks with a positive score are
    /// returned, best first. An unindexed or empty knowledge base returns
    /// no chunks.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Retrieved>> {
        let top_k = top_k.clamp(1, MAX_TOP_K);
        let query_tokens = chunker::tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.state.read().await;
        let Some(state) = state.as_ref() else {
            return Ok(Vec::new());
        };

        let ranked = state.index.top_k(&query_tokens, top_k);
        Ok(ranked
            .into_iter()
            .map(|(i, score)| Retrieved {
                doc_id: state.chunks[i].doc_id.clone(),
                text: state.chunks[i].text.clone(),
                score,
            })
            .collect())
    }

    /// Number of chunks in the current index, if any.
    pub async fn chunk_count(&self) -> usize {
        self.state
            .read()
            .await
            .as_ref()
            .map(|s| s.chunks.len())
            .unwrap_or(0)
    }

}
