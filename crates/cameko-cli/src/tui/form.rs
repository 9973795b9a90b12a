//! The form screen: field list, member checklist and live preview.
//!
//! Every key press that changes a value goes straight through
//! [`FormController::dispatch`], so the preview and the saved snapshot never
//! lag behind what is on screen.

use cameko_core::analytics::AnalyticsSink;
use cameko_core::export::ExportKind;
use cameko_core::state::HONORIFIC_CHOICES;
use cameko_core::store::StateStore;
use cameko_core::{Action, Flag, FormController, TextField};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// One line of the field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Text(TextField),
    Group,
    Members,
    Flag(Flag),
}

const ROWS: [Row; 12] = [
    Row::Text(TextField::EventDate),
    Row::Text(TextField::DateFormat),
    Row::Text(TextField::EventTitle),
    Row::Text(TextField::VenuePrefix),
    Row::Text(TextField::VenueName),
    Row::Group,
    Row::Members,
    Row::Text(TextField::Honorific),
    Row::Text(TextField::ExtraHashtags),
    Row::Flag(Flag::MemberHashtag),
    Row::Flag(Flag::ReverseOrder),
    Row::Flag(Flag::Parentheses),
];

/// In-progress inline edit of a text field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditBuffer {
    field: TextField,
    value: String,
    /// Cursor position in chars.
    cursor: usize,
    /// Value before editing started, restored on Esc.
    original: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Focus {
    Fields,
    Members,
    Editing(EditBuffer),
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Quit,
    Export(ExportKind),
}

pub struct FormView {
    row: usize,
    member: usize,
    focus: Focus,
    status: Option<String>,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView {
    pub const fn new() -> Self {
        Self {
            row: 0,
            member: 0,
            focus: Focus::Fields,
            status: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    const fn current_row(&self) -> Row {
        ROWS[self.row]
    }

    pub fn handle_key<S: StateStore, A: AnalyticsSink>(
        &mut self,
        key: KeyEvent,
        controller: &mut FormController<S, A>,
    ) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return FormAction::Quit;
        }
        self.status = None;

        match self.focus {
            Focus::Editing(_) => {
                self.handle_edit_key(key, controller);
                FormAction::Continue
            }
            Focus::Members => self.handle_member_key(key, controller),
            Focus::Fields => self.handle_field_key(key, controller),
        }
    }

    fn handle_field_key<S: StateStore, A: AnalyticsSink>(
        &mut self,
        key: KeyEvent,
        controller: &mut FormController<S, A>,
    ) -> FormAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return FormAction::Quit,
            KeyCode::Char('c') => return FormAction::Export(ExportKind::Copy),
            KeyCode::Char('p') => return FormAction::Export(ExportKind::Post),
            KeyCode::Up | KeyCode::Char('k') => {
                self.row = self.row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.row = (self.row + 1).min(ROWS.len() - 1);
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle(controller, false),
            KeyCode::Right | KeyCode::Char('l') => self.cycle(controller, true),
            KeyCode::Enter | KeyCode::Char(' ') => match self.current_row() {
                Row::Text(field) => self.start_edit(field, controller.state().text(field)),
                Row::Group => self.cycle(controller, true),
                Row::Members => {
                    self.member = 0;
                    self.focus = Focus::Members;
                }
                Row::Flag(flag) => self.dispatch(controller, Action::ToggleFlag(flag)),
            },
            _ => {}
        }
        FormAction::Continue
    }

    fn handle_member_key<S: StateStore, A: AnalyticsSink>(
        &mut self,
        key: KeyEvent,
        controller: &mut FormController<S, A>,
    ) -> FormAction {
        let names: Vec<String> = controller
            .selected_group()
            .map(|g| g.members.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default();

        match key.code {
            KeyCode::Char('q') => return FormAction::Quit,
            KeyCode::Char('c') => return FormAction::Export(ExportKind::Copy),
            KeyCode::Char('p') => return FormAction::Export(ExportKind::Post),
            KeyCode::Esc | KeyCode::Tab | KeyCode::Left | KeyCode::Char('h') => {
                self.focus = Focus::Fields;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.member = self.member.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.member = (self.member + 1).min(names.len().saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(name) = names.get(self.member) {
                    self.dispatch(controller, Action::ToggleMember(name.clone()));
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    fn handle_edit_key<S: StateStore, A: AnalyticsSink>(
        &mut self,
        key: KeyEvent,
        controller: &mut FormController<S, A>,
    ) {
        let Focus::Editing(buf) = &mut self.focus else {
            return;
        };

        let changed = match key.code {
            KeyCode::Enter => {
                self.focus = Focus::Fields;
                return;
            }
            KeyCode::Esc => {
                let restore = Action::SetText(buf.field, buf.original.clone());
                self.focus = Focus::Fields;
                self.dispatch(controller, restore);
                return;
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                insert_char_at(&mut buf.value, buf.cursor, ch);
                buf.cursor += 1;
                true
            }
            KeyCode::Backspace if buf.cursor > 0 => {
                buf.cursor -= 1;
                remove_char_at(&mut buf.value, buf.cursor);
                true
            }
            KeyCode::Delete => {
                let before = char_len(&buf.value);
                remove_char_at(&mut buf.value, buf.cursor);
                char_len(&buf.value) != before
            }
            KeyCode::Left => {
                buf.cursor = buf.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                buf.cursor = (buf.cursor + 1).min(char_len(&buf.value));
                false
            }
            KeyCode::Home => {
                buf.cursor = 0;
                false
            }
            KeyCode::End => {
                buf.cursor = char_len(&buf.value);
                false
            }
            _ => false,
        };

        if changed {
            let action = Action::SetText(buf.field, buf.value.clone());
            self.dispatch(controller, action);
        }
    }

    fn start_edit(&mut self, field: TextField, current: &str) {
        self.focus = Focus::Editing(EditBuffer {
            field,
            value: current.to_string(),
            cursor: char_len(current),
            original: current.to_string(),
        });
    }

    /// Left/Right on the group or honorific rows step through the choices.
    fn cycle<S: StateStore, A: AnalyticsSink>(
        &mut self,
        controller: &mut FormController<S, A>,
        forward: bool,
    ) {
        let action = match self.current_row() {
            Row::Group => {
                let names: Vec<&str> = controller.directory().group_names().collect();
                let current = controller.state().selected_group.as_str();
                cycle_choice(&names, current, forward).map(|n| Action::SelectGroup(n.to_string()))
            }
            Row::Text(TextField::Honorific) => {
                let current = controller.state().honorific.as_str();
                cycle_choice(HONORIFIC_CHOICES, current, forward)
                    .map(|h| Action::SetText(TextField::Honorific, h.to_string()))
            }
            Row::Flag(flag) => Some(Action::SetFlag(flag, forward)),
            _ => None,
        };
        if let Some(action) = action {
            if matches!(action, Action::SelectGroup(_)) {
                self.member = 0;
            }
            self.dispatch(controller, action);
        }
    }

    fn dispatch<S: StateStore, A: AnalyticsSink>(
        &mut self,
        controller: &mut FormController<S, A>,
        action: Action,
    ) {
        if let Err(err) = controller.dispatch(action) {
            self.status = Some(err.to_string());
        }
    }

    pub fn render<S: StateStore, A: AnalyticsSink>(
        &self,
        frame: &mut Frame<'_>,
        controller: &FormController<S, A>,
    ) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer[0]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(u16::try_from(ROWS.len() + 2).unwrap_or(u16::MAX)),
                Constraint::Min(3),
            ])
            .split(body[0]);

        self.render_fields(frame, controller, left[0]);
        self.render_members(frame, controller, left[1]);
        render_preview(frame, controller.text(), body[1]);
        frame.render_widget(Paragraph::new(self.status_line()), outer[1]);
    }

    fn render_fields<S: StateStore, A: AnalyticsSink>(
        &self,
        frame: &mut Frame<'_>,
        controller: &FormController<S, A>,
        area: Rect,
    ) {
        let state = controller.state();
        let items: Vec<ListItem<'_>> = ROWS
            .iter()
            .map(|row| {
                let (label, value) = match *row {
                    Row::Text(field) => {
                        let value = match &self.focus {
                            Focus::Editing(buf) if buf.field == field => {
                                with_cursor(&buf.value, buf.cursor)
                            }
                            _ => state.text(field).to_string(),
                        };
                        (field.label(), value)
                    }
                    Row::Group => ("グループ", format!("◀ {} ▶", state.selected_group)),
                    Row::Members => (
                        "メンバー",
                        format!("{}人選択中", state.selected_members.len()),
                    ),
                    Row::Flag(flag) => {
                        let mark = if state.flag(flag) { "[x]" } else { "[ ]" };
                        (flag.label(), mark.to_string())
                    }
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Cyan)),
                    Span::raw(value),
                ]))
            })
            .collect();

        let focused = !matches!(self.focus, Focus::Members);
        let list = List::new(items)
            .block(focus_block("フォーム", focused))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut list_state = ListState::default().with_selected(focused.then_some(self.row));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_members<S: StateStore, A: AnalyticsSink>(
        &self,
        frame: &mut Frame<'_>,
        controller: &FormController<S, A>,
        area: Rect,
    ) {
        let state = controller.state();
        let items: Vec<ListItem<'_>> = controller.selected_group().map_or_else(Vec::new, |g| {
            g.members
                .iter()
                .map(|m| {
                    let mark = if state.is_selected(&m.name) { "[x]" } else { "[ ]" };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{mark} {} ", m.name)),
                        Span::styled(
                            format!("@{}", m.account),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect()
        });

        let focused = matches!(self.focus, Focus::Members);
        let list = List::new(items)
            .block(focus_block("メンバー", focused))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut list_state = ListState::default().with_selected(focused.then_some(self.member));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(status) = &self.status {
            return Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Yellow),
            ));
        }
        let hint = match self.focus {
            Focus::Editing(_) => "Enter done  Esc cancel",
            Focus::Members => "↑↓ move  Space toggle  Esc back  c copy  p post  q quit",
            Focus::Fields => "↑↓ move  Enter edit  ←→ change  c copy  p post  q quit",
        };
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn render_preview(frame: &mut Frame<'_>, text: &str, area: Rect) {
    let preview = Paragraph::new(text.to_string())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("プレビュー"));
    frame.render_widget(preview, area);
}

/// Next (or previous) entry after `current`, wrapping. Unknown values start
/// from the first entry.
fn cycle_choice<'a>(options: &[&'a str], current: &str, forward: bool) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|&o| o == current) {
        None => 0,
        Some(p) if forward => (p + 1) % len,
        Some(p) => (p + len - 1) % len,
    };
    Some(options[next])
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

fn insert_char_at(value: &mut String, char_idx: usize, ch: char) {
    let idx = byte_index_at_char(value, char_idx);
    value.insert(idx, ch);
}

fn remove_char_at(value: &mut String, char_idx: usize) {
    if char_idx >= char_len(value) {
        return;
    }
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
}

fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::with_capacity(value.len() + 3);
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
        }
        out.push(ch);
    }
    if char_idx >= char_len(value) {
        out.push('█');
    }
    out
}
