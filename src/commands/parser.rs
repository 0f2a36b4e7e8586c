//! Parser for triggers and directives in request text.
//!
//! Both parsers are line oriented and total: any input yields a result.

use super::types::Directives;

/// Returns true if any line of `text`, trimmed, starts with `trigger`.
///
/// Matching is case-sensitive. An empty trigger never matches.
///
/// # Examples
///
/// ```
/// use slack_merge_queue::commands::has_trigger;
///
/// assert!(has_trigger("LGTM\n  /queue please", "/queue"));
/// assert!(!has_trigger("run /queue", "/queue"));
/// assert!(!has_trigger("/Queue", "/queue"));
/// ```
pub fn has_trigger(text: &str, trigger: &str) -> bool {
    let trigger = trigger.trim();
    !trigger.is_empty() && text.lines().any(|line| line.trim().starts_with(trigger))
}

/// Collects every directive line in `text`.
///
/// A directive line is `key: value`. Keys are case-insensitive and may use `-`
/// or `_`. Unknown keys and lines without a colon are ignored. `notify`
/// lines accumulate; for the other keys the first line wins.
pub fn parse_directives(text: &str) -> Directives {
    let mut directives = Directives::default();
    for (key, value) in text.lines().filter_map(split_directive) {
        match key.as_str() {
            "notify" => directives
                .notify
                .extend(value.split(',').map(clean_name).filter(|n| !n.is_empty())),
            "delete-on-cancel" => {
                directives
                    .delete_on_cancel
                    .get_or_insert_with(|| value.to_string());
            }
            "auto-notify" => {
                directives.auto_notify.get_or_insert_with(|| value.to_string());
            }
            _ => {}
        }
    }
    directives
}

/// Normalizes a watcher name as people write it.
///
/// Strips whitespace, a leading `@`, and Slack mention markup (`<@U123>` or
/// `<@U123|alice>`), leaving the bare name or ID.
///
/// # Examples
///
/// ```
/// use slack_merge_queue::commands::clean_name;
///
/// assert_eq!(clean_name(" @alice "), "alice");
/// assert_eq!(clean_name("<@U123|alice>"), "U123");
/// ```
pub fn clean_name(raw: &str) -> String {
    let name = raw.trim();
    let name = match name.strip_prefix("<@").and_then(|n| n.strip_suffix('>')) {
        Some(inner) => inner.split('|').next().unwrap_or_default(),
        None => name.strip_prefix('@').unwrap_or(name),
    };
    name.trim().to_string()
}

/// Splits `key: value`, normalizing the key.
fn split_directive(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    let key = key.trim().to_ascii_lowercase().replace('_', "-");
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}
