//! Whitespace normalization for composed text.

/// Normalize whitespace while keeping line breaks as separators.
///
/// Goes beyond spaces and tabs: any Unicode whitespace other than `\n`
/// counts as horizontal, and lines are trimmed at both ends.
///
/// - every run of horizontal whitespace (spaces, tabs, `\r`, NBSP, ...)
///   collapses to one space
/// - each line is trimmed
/// - lines left empty are dropped, so there is no leading, trailing or
///   doubled `\n`
///
/// The function is idempotent.
///
/// ```
/// use textflow_core::normalize_spaces;
///
/// assert_eq!(normalize_spaces("A  B \t C \n\n D \n"), "A B C\nD");
/// ```
#[must_use = "normalized text is returned but not used"]
pub fn normalize_spaces(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());

    for line in text.split('\n') {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !normalized.is_empty() {
            normalized.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                normalized.push(' ');
            }
            normalized.push_str(word);
        }
    }

    normalized
}
