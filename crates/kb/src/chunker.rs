//! Text tokenization and chunking.
//!
//! Chunking is character-based with a sliding window: windows of
//! `chunk_size` characters advancing by `chunk_size - overlap` so
//! consecutive chunks share context at their boundaries.

/// Lowercase a text and split it into alphanumeric token runs.
///
/// Any non-alphanumeric character is a separator. This is the only
/// tokenization the index ever sees, for both documents and queries.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split `text` into overlapping character windows.
///
/// The input is stripped once up front; the windows themselves are kept
/// raw so consecutive chunks overlap by exactly `overlap` characters. The
/// step is clamped to at least 1 so a degenerate overlap can never stall
/// the scan.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.trim().chars().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits() {
        let tokens = tokenize("The Mower-Blade, GM-A-001!");
        assert_eq!(tokens, vec!["the", "mower", "blade", "gm", "a", "001"]);
    }

    #[test]
    fn tokenize_handles_umlauts() {
        let tokens = tokenize("Mähroboter für Rasenflächen");
        assert_eq!(tokens, vec!["mähroboter", "für", "rasenflächen"]);
    }

    #[test]
    fn tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn chunk_short_text_is_single_chunk() {
        let chunks = chunk_text("hello world", 800, 120);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn chunk_windows_overlap() {
        // 10-char windows advancing by 6 over 20 chars
        let text = "abcdefghijklmnopqrst";
        let chunks = chunk_text(text, 10, 4);
        assert_eq!(chunks[0], "abcdefghij");
        assert_eq!(chunks[1], "ghijklmnop");
        // second chunk starts 6 in, sharing 4 chars with the first
        assert!(chunks[0].ends_with("ghij"));
        assert!(chunks[1].starts_with("ghij"));
    }

    #[test]
    fn chunk_step_never_stalls() {
        // overlap >= size would give step 0 without the clamp
        let chunks = chunk_text("abcdef", 2, 5);
        assert!(!chunks.is_empty());
        assert!(chunks.len() <= 6);
    }

    #[test]
    fn chunk_windows_kept_raw_with_exact_overlap() {
        // interior whitespace stays in place; consecutive windows share
        // exactly `overlap` characters
        let chunks = chunk_text("abc   def", 6, 3);
        assert_eq!(chunks, vec!["abc   ", "   def", "def"]);
        for pair in chunks.windows(2) {
            let tail = &pair[0][pair[0].len() - 3..];
            assert!(pair[1].starts_with(tail));
        }
    }

    #[test]
    fn chunk_strips_whole_input_once() {
        let chunks = chunk_text("  edge case  ", 800, 120);
        assert_eq!(chunks, vec!["edge case"]);
    }

    #[test]
    fn chunk_empty_and_blank_input_is_empty() {
        assert!(chunk_text("", 800, 120).is_empty());
        assert!(chunk_text("   ", 800, 120).is_empty());
    }
}
