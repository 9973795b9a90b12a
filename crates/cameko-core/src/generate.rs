//! Deterministic post text generation.
//!
//! ```text
//! <date>
//! <title>
//! <prefix> <venue>
//!
//! <member line>...
//!
//! <hashtags>
//! ```
//!
//! The output depends only on the [`FormState`] and [`Directory`] passed in.

use crate::date::format_date;
use crate::directory::{Directory, Member, group_hashtags};
use crate::state::FormState;

/// Render the full post text for `state`.
#[must_use]
pub fn generate(state: &FormState, directory: &Directory) -> String {
    let date = format_date(&state.event_date, &state.date_format);
    let members = member_lines(state, directory).join("\n");
    let hashtags = hashtag_line(state, directory);

    let text = format!(
        "{date}\n{title}\n{prefix} {venue}\n\n{members}\n\n{hashtags}",
        title = state.event_title,
        prefix = state.venue_prefix,
        venue = state.venue_name,
    );
    text.trim().to_string()
}

/// One line per selected member, in selection order.
#[must_use]
pub fn member_lines(state: &FormState, directory: &Directory) -> Vec<String> {
    state
        .selected_members
        .iter()
        .map(|name| {
            let member = directory.member(&state.selected_group, name);
            member_line(state, name, member)
        })
        .collect()
}

fn member_line(state: &FormState, name: &str, member: Option<&Member>) -> String {
    let honorific = &state.honorific;
    let Some(member) = member else {
        return format!("{name}{honorific}");
    };

    let display = if state.add_member_name_to_hashtag {
        member_hashtag(&member.name)
    } else {
        member.name.clone()
    };
    let account = if state.use_parentheses_for_account {
        format!("(@{})", member.account)
    } else {
        format!("@{}", member.account)
    };

    if state.reverse_order {
        [display.as_str(), honorific.as_str(), account.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        format!("{display} {account}{honorific}")
    }
}

/// `#` followed by the name with all whitespace removed.
#[must_use]
pub fn member_hashtag(name: &str) -> String {
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    format!("#{compact}")
}

/// Split the free-text extra tags on whitespace and commas (`,` `，` `、`).
///
/// Leading `#` characters are dropped so `#tag` and `tag` both yield `#tag`.
#[must_use]
pub fn extra_hashtags(raw: &str) -> Vec<String> {
    raw.split(|c: char| matches!(c, ',' | '，' | '、') || c.is_whitespace())
        .map(|piece| piece.trim_start_matches('#'))
        .filter(|piece| !piece.is_empty())
        .map(|piece| format!("#{piece}"))
        .collect()
}

fn normalize_tag(raw: &str) -> Option<String> {
    let body = raw.trim().trim_start_matches('#');
    if body.is_empty() {
        None
    } else {
        Some(format!("#{body}"))
    }
}

/// Ordered, de-duplicated tags for the last line of the post.
///
/// Group tags come first, then the user's extra tags, then per-member tags.
/// Duplicates are dropped within the line only; member-name tags written on
/// the member lines are never added here.
#[must_use]
pub fn hashtags(state: &FormState, directory: &Directory) -> Vec<String> {
    let group = state.selected_group.as_str();
    let mut candidates = group_hashtags(group, directory.cameko_hashtag(group));
    candidates.extend(extra_hashtags(&state.extra_hashtags));
    candidates.extend(
        state
            .selected_members
            .iter()
            .filter_map(|name| directory.member(group, name))
            .filter_map(|member| member.specific_hashtag.as_deref().and_then(normalize_tag)),
    );

    let mut seen: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// The hashtag line, tags joined by single spaces.
#[must_use]
pub fn hashtag_line(state: &FormState, directory: &Directory) -> String {
    hashtags(state, directory).join(" ")
}
