//! Visitor intake controller
//!
//! Slot-filling state machine for one intake conversation. Each operation
//! corresponds to one conversational intent and returns the text the voice
//! layer should speak next.
//!
//! ```text
//! Collecting ──check_resident──▶ AwaitingValidation ──exists──▶ Collecting
//!     │                                 │  └──error──▶ Collecting (retry)
//!     │                                 └──absent──▶ Rejected
//!     └──confirm (complete)──▶ Confirmed
//! ```
//!
//! Soft outcomes (missing details, directory unavailable, rejected visit)
//! are spoken responses. Only changes to a confirmed record are errors.

use serde::Serialize;
use std::sync::Arc;

use doorman_core::{
    Error, IntakeState, Intent, NotificationSink, ResidentDirectory, ResidentValidation, Result,
    ToolCall, VisitSummary, VisitorField, VisitorRecord,
};

use crate::prompts;

/// Point-in-time view of a controller, for status endpoints and logs
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSnapshot {
    pub session_id: String,
    pub state: IntakeState,
    pub validation_enabled: bool,
    pub record: VisitorRecord,
    pub summary: VisitSummary,
    pub missing: Vec<VisitorField>,
    pub delivery_failures: usize,
}

/// Intake controller for one conversation session
pub struct IntakeController {
    session_id: String,
    record: VisitorRecord,
    state: IntakeState,
    /// Present iff resident validation is enabled
    directory: Option<Arc<dyn ResidentDirectory>>,
    notifier: Arc<dyn NotificationSink>,
    /// Response returned by the successful confirm, replayed afterwards
    confirmation: Option<String>,
    delivery_failures: usize,
}

impl IntakeController {
    /// Create a controller without resident validation
    pub fn new(session_id: impl Into<String>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            session_id: session_id.into(),
            record: VisitorRecord::new(),
            state: IntakeState::Collecting,
            directory: None,
            notifier,
            confirmation: None,
            delivery_failures: 0,
        }
    }

    /// Enable resident validation against `directory`
    pub fn with_directory(mut self, directory: Arc<dyn ResidentDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Enable resident validation when a directory is given
    pub fn with_optional_directory(mut self, directory: Option<Arc<dyn ResidentDirectory>>) -> Self {
        self.directory = directory;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn record(&self) -> &VisitorRecord {
        &self.record
    }

    pub fn validation_enabled(&self) -> bool {
        self.directory.is_some()
    }

    /// Notifications that failed to deliver (the visits were still confirmed)
    pub fn delivery_failures(&self) -> usize {
        self.delivery_failures
    }

    pub fn snapshot(&self) -> IntakeSnapshot {
        IntakeSnapshot {
            session_id: self.session_id.clone(),
            state: self.state,
            validation_enabled: self.validation_enabled(),
            record: self.record.clone(),
            summary: self.record.summary(),
            missing: self.record.missing_fields(),
            delivery_failures: self.delivery_failures,
        }
    }

    /// Route an intent to its operation
    pub async fn dispatch(&mut self, intent: Intent) -> Result<String> {
        tracing::debug!(
            session_id = %self.session_id,
            tool = intent.tool_name(),
            field = ?intent.field(),
            state = %self.state,
            "Dispatching intent"
        );

        match intent {
            Intent::SetApartment { apartment } => self.set_apartment(&apartment),
            Intent::SetResident { name } => self.set_resident(&name),
            Intent::CheckResident => self.check_resident().await,
            Intent::SetVisitor { name } => self.set_visitor(&name),
            Intent::SetReason { reason } => self.set_reason(&reason),
            Intent::Confirm => self.confirm().await,
        }
    }

    /// Decode and dispatch a language-model tool call
    pub async fn handle_tool_call(&mut self, call: &ToolCall) -> Result<String> {
        let intent = Intent::from_tool_call(call)?;
        self.dispatch(intent).await
    }

    pub fn set_apartment(&mut self, apartment: &str) -> Result<String> {
        self.set_field(VisitorField::ApartmentNumber, apartment)
    }

    pub fn set_resident(&mut self, name: &str) -> Result<String> {
        self.set_field(VisitorField::ResidentName, name)
    }

    /// Record the visitor's name
    ///
    /// With validation enabled, the resident must have been found first.
    pub fn set_visitor(&mut self, name: &str) -> Result<String> {
        if let Some(reply) = self.closed_reply()? {
            return Ok(reply);
        }

        if self.validation_enabled()
            && self.record.resident_validation() != ResidentValidation::Exists
        {
            let reply = match (self.record.apartment_number(), self.record.resident_name()) {
                (Some(apartment), Some(resident)) => {
                    prompts::check_before("take your name", apartment, resident)
                }
                _ => format!(
                    "I need to know who you are visiting first. {}",
                    self.next_prompt()
                ),
            };
            tracing::debug!(
                session_id = %self.session_id,
                "Visitor name deferred until resident is validated"
            );
            return Ok(reply);
        }

        self.set_field(VisitorField::VisitorName, name)
    }

    pub fn set_reason(&mut self, reason: &str) -> Result<String> {
        self.set_field(VisitorField::VisitReason, reason)
    }

    /// Check the resident against the directory
    ///
    /// One lookup per call. A failed lookup leaves the record untouched so
    /// the check can be retried.
    pub async fn check_resident(&mut self) -> Result<String> {
        if let Some(reply) = self.closed_reply()? {
            return Ok(reply);
        }

        let Some(directory) = self.directory.clone() else {
            return Ok(format!("{} {}", prompts::no_check_needed(), self.next_prompt()));
        };

        let (apartment, resident) =
            match (self.record.apartment_number(), self.record.resident_name()) {
                (Some(apartment), Some(resident)) => (apartment.to_string(), resident.to_string()),
                _ => {
                    let missing: Vec<VisitorField> =
                        [VisitorField::ApartmentNumber, VisitorField::ResidentName]
                            .into_iter()
                            .filter(|field| self.record.get(*field).is_none())
                            .collect();
                    return Ok(format!(
                        "{} {}",
                        prompts::check_needs(&missing),
                        self.next_prompt()
                    ));
                }
            };

        if self.record.resident_validation() == ResidentValidation::Exists {
            return Ok(format!(
                "{} {}",
                prompts::resident_found(&apartment, &resident),
                self.next_prompt()
            ));
        }

        if self.state == IntakeState::AwaitingValidation {
            // A previous lookup was dropped before it completed
            tracing::warn!(session_id = %self.session_id, "Retrying abandoned directory lookup");
            self.state = IntakeState::Collecting;
        }

        self.transition(IntakeState::AwaitingValidation);
        tracing::info!(
            session_id = %self.session_id,
            directory = directory.name(),
            apartment = %apartment,
            "Checking resident"
        );

        match directory.lookup(&apartment, &resident).await {
            Ok(lookup) if lookup.exists => {
                self.record
                    .set_resident_validation(ResidentValidation::Exists)?;
                self.transition(IntakeState::Collecting);
                Ok(format!(
                    "{} {}",
                    prompts::resident_found(&apartment, &resident),
                    self.next_prompt()
                ))
            }
            Ok(_) => {
                self.record
                    .set_resident_validation(ResidentValidation::Absent)?;
                self.transition(IntakeState::Rejected);
                tracing::info!(
                    session_id = %self.session_id,
                    apartment = %apartment,
                    "Resident not found; visit rejected"
                );
                Ok(prompts::resident_not_found(&apartment, &resident))
            }
            Err(e) => {
                self.transition(IntakeState::Collecting);
                tracing::warn!(
                    session_id = %self.session_id,
                    directory = directory.name(),
                    error = %e,
                    "Resident lookup failed"
                );
                Ok(prompts::directory_unavailable().to_string())
            }
        }
    }

    /// Confirm the visit and notify the building admin
    ///
    /// Idempotent: once confirmed, the first response is replayed and
    /// the notification is not sent again. The record is sealed before the
    /// sink is called. Delivery is best-effort; a failed or abandoned
    /// notification is not retried.
    pub async fn confirm(&mut self) -> Result<String> {
        match self.state {
            IntakeState::Confirmed => {
                return Ok(self.confirmation.clone().unwrap_or_default());
            }
            IntakeState::Rejected => return Ok(prompts::visit_rejected().to_string()),
            IntakeState::Collecting | IntakeState::AwaitingValidation => {}
        }

        let missing = self.record.missing_fields();
        if !missing.is_empty() {
            tracing::debug!(
                session_id = %self.session_id,
                missing = missing.len(),
                "Confirm requested with missing fields"
            );
            return Ok(prompts::information_missing(&missing));
        }

        if let Some((apartment, resident)) = self.pending_resident_check() {
            return Ok(prompts::check_before("confirm the visit", apartment, resident));
        }

        let summary = self.record.summarize()?;

        // Sealed before delivery so a turn dropped mid-send can't notify twice
        self.record.mark_confirmed()?;
        self.transition(IntakeState::Confirmed);
        let reply = prompts::visit_confirmed(&summary);
        self.confirmation = Some(reply.clone());

        match self.notifier.notify(&summary).await {
            Ok(()) => tracing::info!(
                session_id = %self.session_id,
                sink = self.notifier.name(),
                "Visit notification sent"
            ),
            Err(e) => {
                self.delivery_failures += 1;
                tracing::error!(
                    session_id = %self.session_id,
                    sink = self.notifier.name(),
                    error = %e,
                    "Visit notification failed; visit confirmed without delivery"
                );
            }
        }

        Ok(reply)
    }

    fn set_field(&mut self, field: VisitorField, value: &str) -> Result<String> {
        if let Some(reply) = self.closed_reply()? {
            return Ok(reply);
        }

        let value = value.trim();
        if value.is_empty() {
            return Ok(prompts::not_caught(field));
        }

        self.record.set(field, value)?;
        tracing::info!(
            session_id = %self.session_id,
            field = %field,
            "Visitor field recorded"
        );

        Ok(format!(
            "{} {}",
            prompts::recorded(field, value),
            self.next_prompt()
        ))
    }

    /// Reply for terminal states: sealed error when confirmed, rejection
    /// notice when rejected
    fn closed_reply(&self) -> Result<Option<String>> {
        match self.state {
            IntakeState::Confirmed => Err(Error::RecordSealed { state: self.state }),
            IntakeState::Rejected => Ok(Some(prompts::visit_rejected().to_string())),
            IntakeState::Collecting | IntakeState::AwaitingValidation => Ok(None),
        }
    }

    /// Apartment and resident awaiting a directory check
    fn pending_resident_check(&self) -> Option<(&str, &str)> {
        if !self.validation_enabled()
            || self.record.resident_validation() == ResidentValidation::Exists
        {
            return None;
        }
        Some((self.record.apartment_number()?, self.record.resident_name()?))
    }

    /// What to ask for next
    fn next_prompt(&self) -> String {
        if let Some((apartment, resident)) = self.pending_resident_check() {
            return prompts::checking_resident(apartment, resident);
        }
        match self.record.missing_fields().first() {
            Some(field) => prompts::ask_for(*field).to_string(),
            None => prompts::ready_to_confirm().to_string(),
        }
    }

    fn transition(&mut self, to: IntakeState) {
        if !self.state.can_transition_to(to) {
            tracing::warn!(
                session_id = %self.session_id,
                from = %self.state,
                to = %to,
                "Unexpected intake transition"
            );
        }
        tracing::debug!(session_id = %self.session_id, from = %self.state, to = %to, "Intake transition");
        self.state = to;
    }
}
