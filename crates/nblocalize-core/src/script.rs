// src/script.rs

/// Check if text contains Persian (Arabic block) characters
pub fn has_persian(text: &str) -> bool {
    text.chars().any(is_persian_char)
}

/// Check if a single character is in the Arabic block (U+0600..=U+06FF)
///
/// Arabic Supplement and the presentation-form blocks are not matched.
#[inline]
pub fn is_persian_char(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Count lines that contain at least one Persian character
pub fn count_persian_lines<S: AsRef<str>>(lines: &[S]) -> usize {
    lines.iter().filter(|line| has_persian(line.as_ref())).count()
}
