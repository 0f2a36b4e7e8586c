//! Choosing one value among prioritized sources.

/// The spellings accepted for boolean options, true words first.
pub const BOOL_WORDS: &[&str] = &["true", "yes", "on", "1", "false", "no", "off", "0"];

const TRUE_WORDS: &[&str] = &["true", "yes", "on", "1"];

/// Returns the entry of `allowed` matching the first candidate that
/// case-insensitively equals one of them, or `default`.
///
/// Candidates are in priority order; `None` and unrecognized values are
/// skipped. Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use slack_merge_queue::config::select_first;
///
/// let allowed = ["squash", "merge"];
/// assert_eq!(select_first([None, Some(" Merge "), Some("squash")], &allowed, "squash"), "merge");
/// assert_eq!(select_first([Some("rebase")], &allowed, "squash"), "squash");
/// ```
pub fn select_first<'a, 'c, I>(candidates: I, allowed: &[&'a str], default: &'a str) -> &'a str
where
    I: IntoIterator<Item = Option<&'c str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| {
            let candidate = candidate.trim();
            allowed
                .iter()
                .copied()
                .find(|a| a.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(default)
}

/// Interprets a boolean word, or `None` if the value is not one.
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(value)) {
        Some(true)
    } else if BOOL_WORDS.iter().any(|w| w.eq_ignore_ascii_case(value)) {
        Some(false)
    } else {
        None
    }
}

/// Resolves a boolean option from prioritized raw values.
///
/// # Examples
///
/// ```
/// use slack_merge_queue::config::select_bool;
///
/// // An inline directive overrides the action input.
/// assert!(select_bool([Some("yes"), Some("false")], false));
/// // Garbage falls through to the next source.
/// assert!(!select_bool([Some("maybe"), Some("off")], true));
/// assert!(select_bool([None, None], true));
/// ```
pub fn select_bool<'c, I>(candidates: I, default: bool) -> bool
where
    I: IntoIterator<Item = Option<&'c str>>,
{
    let fallback = if default { "true" } else { "false" };
    parse_bool(select_first(candidates, BOOL_WORDS, fallback)).unwrap_or(default)
}
