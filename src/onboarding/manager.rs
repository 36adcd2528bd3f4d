//! OnboardingController — owns the wizard step, the Draft, and the commit
//! into the persisted client collection.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::collection::ClientCollection;
use crate::clients::model::{ClientRecord, Location};
use crate::config::ConsoleConfig;
use crate::error::OnboardingError;
use crate::store::KeyValueStore;

use super::model::{Draft, DraftField, FieldEdit, ValidationPolicy};
use super::state::OnboardingStep;
use super::view::{FieldError, StepView};

/// Result of a successful `advance`.
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// Moved forward to this step.
    Moved(OnboardingStep),
    /// Advanced past Review: the client was written.
    Committed(ClientRecord),
}

/// Events emitted by the controller to its subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    StepChanged {
        from: OnboardingStep,
        to: OnboardingStep,
    },
    ValidationFailed {
        step: OnboardingStep,
        field: DraftField,
        reason: String,
    },
    LocationAdded {
        index: usize,
        name: String,
        is_primary: bool,
    },
    LocationRemoved {
        index: usize,
        name: String,
    },
    Committed {
        client_id: String,
        total_clients: usize,
    },
    Abandoned {
        step: OnboardingStep,
    },
}

/// Whether the flow creates a new client or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FlowMode {
    Create,
    Edit { id: String },
}

/// Drives one pass through the onboarding wizard.
///
/// The client collection is read once when the flow starts and written once
/// on commit. Nothing guards against another flow committing in between:
/// the later write wins.
pub struct OnboardingController {
    collection: ClientCollection,
    clients: Vec<ClientRecord>,
    mode: FlowMode,
    step: OnboardingStep,
    draft: Draft,
    policy: ValidationPolicy,
    field_error: Option<FieldError>,
    finished: bool,
    events: broadcast::Sender<FlowEvent>,
}

impl OnboardingController {
    /// Start a flow for a new client with an empty Draft.
    pub async fn start(
        store: Arc<dyn KeyValueStore>,
        config: &ConsoleConfig,
    ) -> Result<Self, OnboardingError> {
        let collection = ClientCollection::new(store);
        let clients = collection.load().await?;
        info!(existing = clients.len(), "Onboarding started");
        Ok(Self::with_state(
            collection,
            clients,
            FlowMode::Create,
            Draft::default(),
            config,
        ))
    }

    /// Start a flow that edits the client `id`.
    ///
    /// Fails with `ClientNotFound` when no such client exists; callers are
    /// expected to leave the flow in that case.
    pub async fn resume(
        store: Arc<dyn KeyValueStore>,
        config: &ConsoleConfig,
        id: &str,
    ) -> Result<Self, OnboardingError> {
        let collection = ClientCollection::new(store);
        let clients = collection.load().await?;
        let Some(record) = clients.iter().find(|c| c.id == id) else {
            warn!(client_id = id, "Edit requested for unknown client");
            return Err(OnboardingError::ClientNotFound { id: id.to_string() });
        };
        let draft = Draft::from_record(record);
        info!(client_id = id, "Onboarding resumed for edit");
        Ok(Self::with_state(
            collection,
            clients,
            FlowMode::Edit { id: id.to_string() },
            draft,
            config,
        ))
    }

    fn with_state(
        collection: ClientCollection,
        clients: Vec<ClientRecord>,
        mode: FlowMode,
        draft: Draft,
        config: &ConsoleConfig,
    ) -> Self {
        let (events, _rx) = broadcast::channel(config.event_capacity.max(1));
        Self {
            collection,
            clients,
            mode,
            step: OnboardingStep::default(),
            draft,
            policy: config.validation,
            field_error: None,
            finished: false,
            events,
        }
    }

    /// Register for flow events.
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The field flagged by the last failed validation, if still relevant.
    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    /// Id of the client being edited, or `None` when creating.
    pub fn editing(&self) -> Option<&str> {
        match &self.mode {
            FlowMode::Create => None,
            FlowMode::Edit { id } => Some(id),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// View model of the active step.
    pub fn view(&self) -> StepView {
        StepView::build(
            self.step,
            &self.draft,
            self.policy,
            self.field_error.as_ref(),
            self.editing().is_some(),
        )
    }

    /// Apply an edit to a field of the active step.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), OnboardingError> {
        self.ensure_active()?;
        let field = edit.field();
        self.ensure_on_step(field)?;

        self.draft.apply(edit);
        if self.field_error.as_ref().is_some_and(|e| e.field == field) {
            self.field_error = None;
        }
        debug!(step = %self.step, %field, "Field updated");
        Ok(())
    }

    /// Move forward one step, or commit when on Review.
    ///
    /// A failed gate leaves the step and the Draft untouched.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, OnboardingError> {
        self.ensure_active()?;

        let Some(next) = self.step.next() else {
            return self.commit().await.map(AdvanceOutcome::Committed);
        };

        if let Err(err) = self.draft.validate_step(self.step, self.policy) {
            self.report_validation(&err);
            return Err(err);
        }

        self.field_error = None;
        self.move_to(next);
        Ok(AdvanceOutcome::Moved(next))
    }

    /// Move back one step. No validation; no-op on the first step.
    pub fn retreat(&mut self) -> Result<OnboardingStep, OnboardingError> {
        self.ensure_active()?;
        if let Some(prev) = self.step.prev() {
            self.field_error = None;
            self.move_to(prev);
        }
        Ok(self.step)
    }

    /// Append a location to the Draft. Only available on the locations step.
    pub fn add_location(
        &mut self,
        name: &str,
        address: Option<&str>,
        is_primary: bool,
    ) -> Result<usize, OnboardingError> {
        self.ensure_active()?;
        self.ensure_on_step(DraftField::Locations)?;

        let index = match self.draft.add_location(name, address, is_primary) {
            Ok(index) => index,
            Err(err) => {
                self.report_validation(&err);
                return Err(err);
            }
        };
        self.field_error = None;

        let location = &self.draft.locations[index];
        debug!(index, name = %location.name, is_primary, "Location added");
        let _ = self.events.send(FlowEvent::LocationAdded {
            index,
            name: location.name.clone(),
            is_primary,
        });
        Ok(index)
    }

    /// Remove the location at `index`. Out of bounds returns `Ok(None)`.
    pub fn remove_location(&mut self, index: usize) -> Result<Option<Location>, OnboardingError> {
        self.ensure_active()?;
        self.ensure_on_step(DraftField::Locations)?;

        let removed = self.draft.remove_location(index);
        if let Some(location) = &removed {
            debug!(index, name = %location.name, "Location removed");
            let _ = self.events.send(FlowEvent::LocationRemoved {
                index,
                name: location.name.clone(),
            });
        }
        Ok(removed)
    }

    /// Write the Draft into the client collection and finish the flow.
    ///
    /// New clients get a fresh time-ordered id and `Active` status and are
    /// prepended. Edits replace the existing record in place and keep its id,
    /// status, billing details and creation time. On a store failure the
    /// Draft is kept so the commit can be retried.
    pub async fn commit(&mut self) -> Result<ClientRecord, OnboardingError> {
        self.ensure_active()?;
        if !self.step.is_review() {
            return Err(OnboardingError::InvalidTransition {
                from: self.step,
                action: "commit",
            });
        }

        let (record, clients) = match &self.mode {
            FlowMode::Create => {
                let record = self
                    .draft
                    .to_record(Uuid::now_v7().to_string(), Utc::now());
                let mut clients = Vec::with_capacity(self.clients.len() + 1);
                clients.push(record.clone());
                clients.extend(self.clients.iter().cloned());
                (record, clients)
            }
            FlowMode::Edit { id } => {
                let position = self
                    .clients
                    .iter()
                    .position(|c| &c.id == id)
                    .ok_or_else(|| OnboardingError::ClientNotFound { id: id.clone() })?;
                let existing = &self.clients[position];
                let mut record = self.draft.to_record(existing.id.clone(), Utc::now());
                record.created_at = existing.created_at;
                record.status = existing.status;
                record.details.billing = existing.details.billing.clone();

                let mut clients = self.clients.clone();
                clients[position] = record.clone();
                (record, clients)
            }
        };

        if let Err(e) = self.collection.save(&clients).await {
            warn!(error = %e, "Commit failed, draft kept");
            return Err(OnboardingError::PersistenceUnavailable(e));
        }

        self.clients = clients;
        self.finished = true;
        self.draft = Draft::default();
        self.field_error = None;

        info!(
            client_id = %record.id,
            name = %record.name,
            tier = %record.tier,
            total = self.clients.len(),
            "Client committed"
        );
        let _ = self.events.send(FlowEvent::Committed {
            client_id: record.id.clone(),
            total_clients: self.clients.len(),
        });
        Ok(record)
    }

    /// Leave the flow without writing anything.
    pub fn abandon(self) {
        if self.finished {
            return;
        }
        info!(step = %self.step, "Onboarding abandoned");
        let _ = self.events.send(FlowEvent::Abandoned { step: self.step });
    }

    fn move_to(&mut self, to: OnboardingStep) {
        let from = self.step;
        debug_assert!(from.can_transition_to(to));
        self.step = to;
        info!(%from, %to, "Onboarding step changed");
        let _ = self.events.send(FlowEvent::StepChanged { from, to });
    }

    fn report_validation(&mut self, err: &OnboardingError) {
        if let OnboardingError::Validation {
            step,
            field,
            reason,
        } = err
        {
            warn!(%step, %field, reason = %reason, "Validation failed");
            self.field_error = Some(FieldError {
                field: *field,
                reason: reason.clone(),
            });
            let _ = self.events.send(FlowEvent::ValidationFailed {
                step: *step,
                field: *field,
                reason: reason.clone(),
            });
        }
    }

    fn ensure_active(&self) -> Result<(), OnboardingError> {
        if self.finished {
            return Err(OnboardingError::Finished);
        }
        Ok(())
    }

    fn ensure_on_step(&self, field: DraftField) -> Result<(), OnboardingError> {
        if field.step() != self.step {
            return Err(OnboardingError::FieldNotOnStep {
                field,
                step: self.step,
            });
        }
        Ok(())
    }
}
