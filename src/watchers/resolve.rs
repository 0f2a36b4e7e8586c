//! Matching a free-form name to a channel member.

use crate::types::Member;

/// Every name a member can be referred to by, in match priority order.
///
/// Empty aliases are skipped.
pub fn aliases(member: &Member) -> impl Iterator<Item = &str> {
    [
        Some(member.id.as_str()),
        Some(member.name.as_str()),
        Some(member.display_name.as_str()),
        Some(member.display_name_normalized.as_str()),
        Some(member.real_name.as_str()),
        Some(member.real_name_normalized.as_str()),
        member.email_local_part(),
    ]
    .into_iter()
    .flatten()
    .filter(|alias| !alias.is_empty())
}

/// Finds the first member in roster order with an alias equal to `name`.
///
/// Matching is exact after trimming `name`. Member IDs are stable, so a name
/// that is an ID resolves no matter how the member's profile changes.
pub fn resolve<'a>(name: &str, members: &'a [Member]) -> Option<&'a Member> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    members
        .iter()
        .find(|member| aliases(member).any(|alias| alias == name))
}
