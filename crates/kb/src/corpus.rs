//! Corpus loading: walks the knowledge base directory and extracts text
//! from .txt, .md, and .pdf files. Unreadable files are logged and skipped
//! so one corrupt document never blocks a reindex.

use std::path::Path;
use walkdir::WalkDir;

/// A raw corpus document: source file name plus its extracted text.
#[derive(Debug, Clone)]
pub struct CorpusDoc {
    pub file_name: String,
    pub text: String,
}

/// Load every supported document under `dir`, in deterministic name order.
///
/// A missing directory yields an empty corpus rather than an error.
pub fn load_corpus(dir: &Path) -> Vec<CorpusDoc> {
    if !dir.is_dir() {
        tracing::warn!("knowledge base directory {} does not exist", dir.display());
        return Vec::new();
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };

        let text = match ext.to_ascii_lowercase().as_str() {
            "txt" | "md" => match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("skipping {}: {e}", path.display());
                    continue;
                }
            },
            "pdf" => match pdf_extract::extract_text(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("skipping {}: {e}", path.display());
                    continue;
                }
            },
            _ => continue,
        };

        let file_name = entry.file_name().to_string_lossy().into_owned();
        docs.push(CorpusDoc { file_name, text });
    }
    docs
}
