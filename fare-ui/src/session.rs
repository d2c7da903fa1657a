//! The interactive calculator session.
//!
//! A [`Session`] owns the application state, the view, and the debouncer.
//! It is driven by [`UiEvent`]s and by the passage of time:
//!
//! - Text edits only mark their trigger dirty; the recalculation fires once
//!   the trigger has been quiet for the debounce delay.
//! - Adding or removing a row and changing flexibility recalculate
//!   immediately.
//! - Copying validates the penalty fields, flushes pending edits, builds the
//!   summary, and awaits the clipboard. This is the only suspension point.
//!
//! [`run_session`] is the event loop: a single task that interleaves incoming
//! events with debounce and feedback deadlines. Every event runs to
//! completion before the next one is taken, so no locking is needed.

use std::sync::Arc;

use fare_core::{
    CalculatorConfig, Flexibility, RegistryError, RowId, build_summary,
};
use thiserror::Error;
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, error, info, warn};

use crate::{
    clipboard::{Clipboard, ClipboardError},
    debounce::Debouncer,
    feedback::{CopyButtonState, TooltipAnchor},
    models::{FareField, RowField},
    presentation::View,
    state::AppState,
};

pub const MISSING_PENALTIES_MESSAGE: &str = "Please fill in Airline Penalty and Service Fee";
pub const COPIED_MESSAGE: &str = "Copied!";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy";

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    EditFare { field: FareField, value: String },
    EditRow { id: RowId, field: RowField, value: String },
    SetFlexibility(Flexibility),
    AddRow,
    RemoveRow(RowId),
    Copy,
    Clear,
    /// No state change; asks the front end to redraw.
    Show,
}

/// Identity under which debounced recalculations collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecalcTrigger {
    Fare(FareField),
    Row(RowId),
}

/// What [`Session::apply`] needs from its caller next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Done,
    /// The event was a copy request; call [`Session::copy_summary`].
    CopyRequested,
}

/// Export blocked before anything reached the clipboard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("{MISSING_PENALTIES_MESSAGE}")]
    MissingPenalties(Vec<FareField>),
}

#[derive(Debug, Error)]
pub enum CopyError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

#[derive(Debug)]
pub struct Session {
    state: AppState,
    view: View,
    debouncer: Debouncer<RecalcTrigger>,
    recalculations: u64,
}

impl Session {
    pub fn new(config: &CalculatorConfig) -> Self {
        let mut state = AppState::new(config);
        state.recalculate();
        let mut view = View::new(config);
        view.sync(&state.derived, state.form.flexibility);

        Self {
            state,
            view,
            debouncer: Debouncer::new(config.debounce_delay()),
            recalculations: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Direct access for bulk loading. Call [`Session::recalculate_now`]
    /// afterwards.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Number of full recalculations run so far.
    pub fn recalculation_count(&self) -> u64 {
        self.recalculations
    }

    pub fn has_pending_recalculation(&self) -> bool {
        self.debouncer.pending_count() > 0
    }

    /// Applies every event except the clipboard write itself.
    pub fn apply(
        &mut self,
        event: UiEvent,
        now: Instant,
    ) -> Applied {
        match event {
            UiEvent::EditFare { field, value } => {
                self.state.form.set_field(field, value);
                self.debouncer.schedule(RecalcTrigger::Fare(field), now);
            }
            UiEvent::EditRow { id, field, value } => match self.state.rows.get_mut(id) {
                Some(row) => {
                    row.set_field(field, value);
                    self.debouncer.schedule(RecalcTrigger::Row(id), now);
                }
                None => warn!(%id, "Edit for unknown tax row ignored"),
            },
            UiEvent::SetFlexibility(flexibility) => {
                self.state.form.flexibility = flexibility;
                self.evaluate_penalty_fields(now);
                self.recalculate_now();
            }
            UiEvent::AddRow => self.add_row(),
            UiEvent::RemoveRow(id) => self.remove_row(id),
            UiEvent::Copy => return Applied::CopyRequested,
            UiEvent::Clear => self.clear(now),
            UiEvent::Show => {}
        }
        Applied::Done
    }

    /// Fires due debounced recalculations and expires stale feedback.
    ///
    /// Returns `true` if anything visible changed.
    pub fn tick(
        &mut self,
        now: Instant,
    ) -> bool {
        let due = self.debouncer.take_due(now);
        let recalculated = !due.is_empty();
        if recalculated {
            debug!(?due, "Debounced recalculation firing");
            self.recalculate_now();
        }
        let expired = self.view.feedback.expire(now);
        recalculated || expired
    }

    /// Earliest moment [`Session::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debouncer.next_deadline(), self.view.feedback.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Runs any pending debounced recalculation right away.
    pub fn flush(&mut self) {
        if self.has_pending_recalculation() {
            self.debouncer.cancel_all();
            self.recalculate_now();
        }
    }

    /// Full recalculation followed by a view sync, bypassing the debouncer.
    pub fn recalculate_now(&mut self) {
        self.state.recalculate();
        self.view.sync(&self.state.derived, self.state.form.flexibility);
        self.recalculations += 1;
    }

    /// The summary as it would be copied right now.
    pub fn summary_text(&self) -> String {
        build_summary(
            &self.view.summary_display(),
            &self.state.derived,
            self.state.form.flexibility,
        )
    }

    /// Validates, builds, and writes the summary to `clipboard`.
    ///
    /// Pending debounced work is flushed first, so the summary always matches
    /// the current field text. The copy control is set to success before the
    /// write and corrected to error if the write fails. Nothing else is
    /// rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Export`] when a required penalty field is empty
    /// (nothing is written), or [`CopyError::Clipboard`] when the write fails.
    pub async fn copy_summary(
        &mut self,
        clipboard: &dyn Clipboard,
        now: Instant,
    ) -> Result<(), CopyError> {
        let missing = self.state.form.missing_penalties();
        if !missing.is_empty() {
            warn!(?missing, "Copy blocked: required penalty fields are empty");
            self.evaluate_penalty_fields(now);
            self.view.feedback.flash_button(CopyButtonState::Error, now);
            self.view
                .feedback
                .show_tooltip(TooltipAnchor::CopyButton, MISSING_PENALTIES_MESSAGE, now);
            return Err(ExportError::MissingPenalties(missing).into());
        }

        self.flush();
        let text = self.summary_text();
        self.view.feedback.flash_button(CopyButtonState::Success, now);

        match clipboard.write_text(&text).await {
            Ok(()) => {
                info!(bytes = text.len(), "Copied ticket change summary");
                self.view
                    .feedback
                    .show_tooltip(TooltipAnchor::CopyButton, COPIED_MESSAGE, now);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Failed to copy ticket change summary");
                self.view.feedback.flash_button(CopyButtonState::Error, now);
                self.view
                    .feedback
                    .show_tooltip(TooltipAnchor::CopyButton, COPY_FAILED_MESSAGE, now);
                Err(err.into())
            }
        }
    }

    fn add_row(&mut self) {
        match self.state.rows.add_row() {
            Ok(added) => {
                self.view.max_rows_alert = added.at_capacity;
                self.recalculate_now();
            }
            Err(RegistryError::AtCapacity { max }) => {
                debug!(max, "Add row rejected at capacity");
                self.view.max_rows_alert = true;
            }
        }
    }

    fn remove_row(
        &mut self,
        id: RowId,
    ) {
        if self.state.rows.remove_row(id) {
            self.debouncer.cancel(&RecalcTrigger::Row(id));
            self.view.max_rows_alert = false;
            self.recalculate_now();
        }
    }

    /// Clears and re-applies the required-field messages for the penalty
    /// fields. Never blocks recalculation.
    fn evaluate_penalty_fields(
        &mut self,
        now: Instant,
    ) {
        self.view.clear_field_errors();

        for field in self.state.form.missing_penalties() {
            if let Some(message) = field.required_message() {
                self.view.set_field_error(field, message);
                self.view
                    .feedback
                    .show_tooltip(TooltipAnchor::Field(field), message, now);
            }
        }
    }

    fn clear(
        &mut self,
        now: Instant,
    ) {
        info!("Clearing all fields");
        self.state.clear();
        self.debouncer.cancel_all();
        self.view.max_rows_alert = false;
        self.view.feedback.clear();
        self.evaluate_penalty_fields(now);
        self.recalculate_now();
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Drives `session` until the event channel closes, then returns it.
///
/// `observer` is called after every event with `Some(event)` and after
/// every timer tick that changed something with `None`. Debounced work still
/// pending when the channel closes is flushed before returning.
pub async fn run_session<F>(
    mut session: Session,
    mut events: mpsc::Receiver<UiEvent>,
    clipboard: Arc<dyn Clipboard>,
    mut observer: F,
) -> Session
where
    F: FnMut(&Session, Option<&UiEvent>),
{
    loop {
        let deadline = session.next_deadline();

        tokio::select! {
            received = events.recv() => {
                let Some(event) = received else {
                    break;
                };
                let now = Instant::now();
                if session.apply(event.clone(), now) == Applied::CopyRequested {
                    if let Err(err) = session.copy_summary(clipboard.as_ref(), now).await {
                        debug!(error = %err, "Copy did not complete");
                    }
                }
                observer(&session, Some(&event));
            }
            _ = sleep_until_deadline(deadline) => {
                if session.tick(Instant::now()) {
                    observer(&session, None);
                }
            }
        }
    }

    session.flush();
    debug!(
        recalculations = session.recalculation_count(),
        "Session event channel closed"
    );
    session
}
