//! Owner of the live form state.
//!
//! Each [`FormController::dispatch`] is one input event: reduce, persist,
//! report analytics, regenerate. Persistence and analytics are best effort;
//! a failing backend is logged and never aborts the edit.

use crate::analytics::{AnalyticsEvent, AnalyticsSink, NoopSink};
use crate::directory::{Directory, Group};
use crate::error::CamekoError;
use crate::export::{ExportKind, Exporter, compose_url};
use crate::generate::generate;
use crate::state::{Action, FormState, Rejection, reduce};
use crate::store::{STATE_KEY, StateStore, load_state, save_state};

pub struct FormController<S: StateStore, A: AnalyticsSink = NoopSink> {
    state: FormState,
    directory: Directory,
    store: S,
    analytics: A,
    text: String,
}

impl<S: StateStore> FormController<S, NoopSink> {
    /// Open with analytics switched off.
    pub fn without_analytics(store: S, directory: Directory) -> Self {
        Self::open(store, directory, NoopSink)
    }
}

impl<S: StateStore, A: AnalyticsSink> FormController<S, A> {
    /// Load the saved snapshot (defaults on any failure) and render it.
    pub fn open(store: S, directory: Directory, analytics: A) -> Self {
        let state = load_state(&store);
        Self::with_state(state, store, directory, analytics)
    }

    /// Start from an explicit snapshot without reading the store.
    pub fn with_state(state: FormState, store: S, directory: Directory, analytics: A) -> Self {
        let text = generate(&state, &directory);
        Self {
            state,
            directory,
            store,
            analytics,
            text,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    #[must_use]
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn analytics(&self) -> &A {
        &self.analytics
    }

    /// The text generated from the current snapshot.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn selected_group(&self) -> Option<&Group> {
        self.directory.group(&self.state.selected_group)
    }

    /// Apply one edit and return the refreshed text.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::UnknownGroup`] or [`CamekoError::UnknownMember`]
    /// when the action names something outside the directory. The state is
    /// left untouched in that case. Storage failures are not errors here.
    pub fn dispatch(&mut self, action: Action) -> Result<&str, CamekoError> {
        let transition = reduce(&self.state, &action, &self.directory);
        if let Some(rejection) = transition.rejected {
            tracing::debug!(?action, ?rejection, "action rejected");
            return Err(match rejection {
                Rejection::UnknownGroup(name) => CamekoError::UnknownGroup { name },
                Rejection::UnknownMember { group, member } => {
                    CamekoError::UnknownMember { group, member }
                }
            });
        }

        let previous = std::mem::replace(&mut self.state, transition.state);
        self.persist();
        self.report(&action, &previous);
        self.text = generate(&self.state, &self.directory);
        tracing::trace!(?action, "form updated");
        Ok(&self.text)
    }

    /// Write the current snapshot. Returns `false` when the store failed.
    pub fn persist(&self) -> bool {
        match save_state(&self.store, &self.state) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    code = %err.error_code(),
                    "failed to save form state"
                );
                false
            }
        }
    }

    /// Forget the saved snapshot and return to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot delete the snapshot.
    pub fn clear_saved(&mut self) -> Result<(), CamekoError> {
        self.store.remove(STATE_KEY)?;
        self.state = FormState::default();
        self.text = generate(&self.state, &self.directory);
        Ok(())
    }

    /// Compose URL for the current text. Nothing is opened and no analytics
    /// event is sent.
    #[must_use]
    pub fn compose_url(&self, compose_base: &str) -> String {
        compose_url(compose_base, &self.text)
    }

    /// Run an export action on the current text.
    ///
    /// Returns the compose URL for [`ExportKind::Post`]. The analytics event
    /// is sent whether or not the exporter succeeds.
    ///
    /// # Errors
    ///
    /// Propagates the exporter failure; it is not retried.
    pub fn export(
        &self,
        kind: ExportKind,
        exporter: &dyn Exporter,
        compose_base: &str,
    ) -> Result<Option<String>, CamekoError> {
        self.analytics.send(&kind.analytics_event());
        match kind {
            ExportKind::Copy => {
                exporter.copy_text(&self.text)?;
                Ok(None)
            }
            ExportKind::Post => {
                let url = self.compose_url(compose_base);
                exporter.open_url(&url)?;
                Ok(Some(url))
            }
        }
    }

    fn report(&self, action: &Action, previous: &FormState) {
        let group = &self.state.selected_group;
        match action {
            Action::SelectGroup(name) => {
                self.analytics
                    .send(&AnalyticsEvent::GroupSelected { group: name.clone() });
            }
            Action::ToggleMember(name) | Action::SetMemberSelected { name, .. } => {
                let was = previous.is_selected(name);
                let is = self.state.is_selected(name);
                let event = match (was, is) {
                    (false, true) => AnalyticsEvent::MemberSelected {
                        group: group.clone(),
                        member: name.clone(),
                    },
                    (true, false) => AnalyticsEvent::MemberDeselected {
                        group: group.clone(),
                        member: name.clone(),
                    },
                    _ => return,
                };
                self.analytics.send(&event);
            }
            _ => {}
        }
    }
}
