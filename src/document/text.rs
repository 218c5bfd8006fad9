// src/document/text.rs
// Small text helpers used by link extraction and keyword matching.

/// Collapses runs of whitespace (including no-break spaces) into one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercases and strips the diacritics found in French text, so that
/// "Accessibilité", "ACCESSIBILITE" and "accessibilite" compare equal.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ö' | 'ó' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ç' => 'c',
            'ÿ' => 'y',
            other => other,
        })
        .collect()
}

/// Keyword test on folded text. The keyword must already be folded.
pub fn contains_folded(haystack: &str, keyword: &str) -> bool {
    fold(haystack).contains(keyword)
}
