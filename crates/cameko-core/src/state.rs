//! Form state and the pure reducer that drives it.
//!
//! Every edit is expressed as an [`Action`]. [`reduce`] maps the current
//! snapshot plus an action to the next snapshot without touching storage;
//! side effects live in [`crate::controller`].

use crate::date::DEFAULT_DATE_FORMAT;
use crate::directory::Directory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_GROUP: &str = "イコラブ";
pub const DEFAULT_HONORIFIC: &str = "さん";
pub const DEFAULT_VENUE_PREFIX: &str = "@";

/// Honorifics offered by the form pickers. Free text is still accepted.
pub const HONORIFIC_CHOICES: &[&str] = &["さん", "ちゃん"];

/// Snapshot of everything the user has entered.
///
/// Serialized verbatim (camelCase keys) as the persisted form. Missing keys
/// fall back to their defaults on load; snapshots written by the first web
/// release (`liveDate`, `livePlace`, `group`, ...) are still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormState {
    #[serde(alias = "liveDate")]
    pub event_date: String,
    pub date_format: String,
    #[serde(alias = "liveTitle")]
    pub event_title: String,
    #[serde(alias = "livePlace")]
    pub venue_name: String,
    pub venue_prefix: String,
    #[serde(alias = "group")]
    pub selected_group: String,
    /// Selection order is output order.
    pub selected_members: Vec<String>,
    pub honorific: String,
    #[serde(alias = "hashtags")]
    pub extra_hashtags: String,
    #[serde(alias = "membersAsHashtags")]
    pub add_member_name_to_hashtag: bool,
    pub reverse_order: bool,
    pub use_parentheses_for_account: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            event_date: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            event_title: String::new(),
            venue_name: String::new(),
            venue_prefix: DEFAULT_VENUE_PREFIX.to_string(),
            selected_group: DEFAULT_GROUP.to_string(),
            selected_members: Vec::new(),
            honorific: DEFAULT_HONORIFIC.to_string(),
            extra_hashtags: String::new(),
            add_member_name_to_hashtag: false,
            reverse_order: false,
            use_parentheses_for_account: true,
        }
    }
}

impl FormState {
    #[must_use]
    pub fn is_selected(&self, member: &str) -> bool {
        self.selected_members.iter().any(|m| m == member)
    }

    #[must_use]
    pub const fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::MemberHashtag => self.add_member_name_to_hashtag,
            Flag::ReverseOrder => self.reverse_order,
            Flag::Parentheses => self.use_parentheses_for_account,
        }
    }

    const fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::MemberHashtag => &mut self.add_member_name_to_hashtag,
            Flag::ReverseOrder => &mut self.reverse_order,
            Flag::Parentheses => &mut self.use_parentheses_for_account,
        }
    }

    #[must_use]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::EventDate => &self.event_date,
            TextField::DateFormat => &self.date_format,
            TextField::EventTitle => &self.event_title,
            TextField::VenueName => &self.venue_name,
            TextField::VenuePrefix => &self.venue_prefix,
            TextField::Honorific => &self.honorific,
            TextField::ExtraHashtags => &self.extra_hashtags,
        }
    }

    const fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::EventDate => &mut self.event_date,
            TextField::DateFormat => &mut self.date_format,
            TextField::EventTitle => &mut self.event_title,
            TextField::VenueName => &mut self.venue_name,
            TextField::VenuePrefix => &mut self.venue_prefix,
            TextField::Honorific => &mut self.honorific,
            TextField::ExtraHashtags => &mut self.extra_hashtags,
        }
    }
}

/// Free-text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    EventDate,
    DateFormat,
    EventTitle,
    VenueName,
    VenuePrefix,
    Honorific,
    ExtraHashtags,
}

impl TextField {
    pub const ALL: [Self; 7] = [
        Self::EventDate,
        Self::DateFormat,
        Self::EventTitle,
        Self::VenueName,
        Self::VenuePrefix,
        Self::Honorific,
        Self::ExtraHashtags,
    ];

    /// Stable kebab-case key used on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::EventDate => "date",
            Self::DateFormat => "date-format",
            Self::EventTitle => "title",
            Self::VenueName => "venue",
            Self::VenuePrefix => "venue-prefix",
            Self::Honorific => "honorific",
            Self::ExtraHashtags => "hashtags",
        }
    }

    /// Form label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EventDate => "日付",
            Self::DateFormat => "日付フォーマット",
            Self::EventTitle => "ライブタイトル",
            Self::VenueName => "場所",
            Self::VenuePrefix => "場所の記号",
            Self::Honorific => "敬称",
            Self::ExtraHashtags => "追加ハッシュタグ",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown field `{s}`"))
    }
}

/// Boolean options of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Render member names as hashtags (whitespace removed).
    MemberHashtag,
    /// Put the honorific before the account.
    ReverseOrder,
    /// Wrap the account in parentheses.
    Parentheses,
}

impl Flag {
    pub const ALL: [Self; 3] = [Self::MemberHashtag, Self::ReverseOrder, Self::Parentheses];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MemberHashtag => "member-hashtag",
            Self::ReverseOrder => "reverse",
            Self::Parentheses => "parentheses",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MemberHashtag => "メンバー名をハッシュタグにする",
            Self::ReverseOrder => "敬称とXアカウントを逆にする",
            Self::Parentheses => "Xアカウントを()で囲う",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.key() == s)
            .ok_or_else(|| format!("unknown flag `{s}`"))
    }
}

/// One user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetText(TextField, String),
    /// Switch groups. Always clears the member selection.
    SelectGroup(String),
    /// Add the member at the end of the selection, or remove it.
    ToggleMember(String),
    SetMemberSelected { name: String, selected: bool },
    SetFlag(Flag, bool),
    ToggleFlag(Flag),
    ClearMembers,
    Reset,
}

impl Action {
    #[must_use]
    pub fn set_event_date(value: impl Into<String>) -> Self {
        Self::SetText(TextField::EventDate, value.into())
    }

    #[must_use]
    pub fn set_event_title(value: impl Into<String>) -> Self {
        Self::SetText(TextField::EventTitle, value.into())
    }

    #[must_use]
    pub fn set_venue_name(value: impl Into<String>) -> Self {
        Self::SetText(TextField::VenueName, value.into())
    }

    #[must_use]
    pub fn set_honorific(value: impl Into<String>) -> Self {
        Self::SetText(TextField::Honorific, value.into())
    }

    #[must_use]
    pub fn set_extra_hashtags(value: impl Into<String>) -> Self {
        Self::SetText(TextField::ExtraHashtags, value.into())
    }
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownGroup(String),
    UnknownMember { group: String, member: String },
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: FormState,
    pub rejected: Option<Rejection>,
}

impl Transition {
    const fn accepted(state: FormState) -> Self {
        Self {
            state,
            rejected: None,
        }
    }

    const fn rejected(state: FormState, why: Rejection) -> Self {
        Self {
            state,
            rejected: Some(why),
        }
    }
}

/// Apply `action` to `state`, returning the next snapshot.
///
/// Group and member names are validated against `directory`; an unknown name
/// yields the unchanged state plus a [`Rejection`]. Deselecting a member that
/// is not in the directory is always allowed so stale selections can be
/// cleaned up.
#[must_use]
pub fn reduce(state: &FormState, action: &Action, directory: &Directory) -> Transition {
    let mut next = state.clone();
    match action {
        Action::SetText(field, value) => {
            value.clone_into(next.text_mut(*field));
        }
        Action::SelectGroup(group) => {
            if directory.group(group).is_none() {
                return Transition::rejected(next, Rejection::UnknownGroup(group.clone()));
            }
            next.selected_group.clone_from(group);
            next.selected_members.clear();
        }
        Action::ToggleMember(name) => {
            let selected = !state.is_selected(name);
            return reduce(
                state,
                &Action::SetMemberSelected {
                    name: name.clone(),
                    selected,
                },
                directory,
            );
        }
        Action::SetMemberSelected { name, selected } => {
            if *selected {
                if directory.member(&state.selected_group, name).is_none() {
                    return Transition::rejected(
                        next,
                        Rejection::UnknownMember {
                            group: state.selected_group.clone(),
                            member: name.clone(),
                        },
                    );
                }
                if !next.is_selected(name) {
                    next.selected_members.push(name.clone());
                }
            } else {
                next.selected_members.retain(|m| m != name);
            }
        }
        Action::SetFlag(flag, value) => {
            *next.flag_mut(*flag) = *value;
        }
        Action::ToggleFlag(flag) => {
            let slot = next.flag_mut(*flag);
            *slot = !*slot;
        }
        Action::ClearMembers => next.selected_members.clear(),
        Action::Reset => next = FormState::default(),
    }
    Transition::accepted(next)
}
