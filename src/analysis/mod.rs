//! Text analysis for template classification.
//!
//! Feature extraction and inference share one fixed tokenization policy:
//! text is split on Unicode word boundaries (UAX #29), case-folded, and
//! stripped of diacritics. The policy is deliberately not pluggable — the
//! frozen artifact must tokenize future inference text exactly the way the
//! training corpus was tokenized.
//!
//! # Examples
//!
//! ```
//! use plantilla::analysis::analyze;
//!
//! let tokens = analyze("Factura Electrónica N° 0042");
//! assert_eq!(tokens, vec!["factura", "electronica", "n", "0042"]);
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

/// Tokenize `text` into normalized terms.
///
/// Splits on Unicode word boundaries, keeping only segments that contain at
/// least one alphanumeric character, then lowercases and removes combining
/// marks (so `electrónica` and `electronica` become the same term).
pub fn analyze(text: &str) -> Vec<String> {
    text.unicode_words().map(normalize).collect()
}

/// Fold a single token: lowercase, then NFD-decompose and drop combining marks.
fn normalize(word: &str) -> String {
    word.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
