//! Add/edit form controller.
//!
//! # Design
//! `FormController` is the single owner of one form's state. The host feeds
//! it keystrokes and replies, and it answers with `FormEvent` values; what
//! the host does on `Saved` or `Cancelled` (navigate away, refresh a parent
//! list) is the host's continuation, not the controller's.
//!
//! ```text
//! Editing --submit--> Submitting --ok--> Saved
//!    ^                    |
//!    +---invalid/failed---+
//! ```

use crate::client::PetClient;
use crate::draft::{FormField, PetDraft};
use crate::error::{ApiError, FormError};
use crate::http::Reply;
use crate::image::{DisplayImage, INVALID_PREVIEW_URL};
use crate::source::{Ticket, TicketKind};
use crate::types::{find_pet, PetRecord};

pub const SAVED_NOTICE: &str = "Pet saved successfully!";
pub const LOAD_PET_FAILED: &str = "Failed to load pet data. Please check if the server is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Saved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The backend confirmed the save. Run the saved continuation.
    Saved {
        record: PetRecord,
        notice: &'static str,
    },
    /// Submit or load failed; the message is also kept in `error()`.
    Failed(String),
    /// A save the form had already moved past (cancelled or reseeded) was
    /// accepted by the backend. The form is untouched; refresh dependents.
    Superseded(PetRecord),
    /// The form was seeded from a fetched record.
    Loaded,
    /// The draft was discarded. Run the cancel continuation.
    Cancelled,
    /// The reply belongs to a superseded request and was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct FormController {
    client: PetClient,
    state: FormState,
    draft: PetDraft,
    preview: String,
    error: Option<String>,
    loading: Option<String>,
    generation: u64,
    submits: Vec<u64>,
}

impl FormController {
    /// An empty form for adding a pet.
    pub fn new(client: PetClient) -> Self {
        Self {
            client,
            state: FormState::Editing,
            draft: PetDraft::new(),
            preview: String::new(),
            error: None,
            loading: None,
            generation: 0,
            submits: Vec::new(),
        }
    }

    /// A form editing `record`.
    pub fn for_record(client: PetClient, record: &PetRecord) -> Self {
        let mut form = Self::new(client);
        form.seed(record);
        form
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &PetDraft {
        &self.draft
    }

    /// Raw image URL as typed; not resolved.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// The preview as rendered: the raw URL, with a placeholder to swap in
    /// if it fails to load. `None` while the field is empty.
    pub fn preview_image(&self) -> Option<DisplayImage> {
        (!self.preview.is_empty()).then(|| DisplayImage::unresolved(&self.preview, INVALID_PREVIEW_URL))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn is_edit(&self) -> bool {
        !self.draft.is_new()
    }

    /// Replace every field, the preview included, with `record`'s values.
    /// Any outstanding request is superseded.
    pub fn seed(&mut self, record: &PetRecord) {
        self.generation += 1;
        self.draft = PetDraft::from_record(record);
        self.preview = self.draft.image_url.clone();
        self.error = None;
        self.loading = None;
        self.state = FormState::Editing;
    }

    /// Fetch the full list to find the record a route points at.
    pub fn begin_load(&mut self, route_id: &str) -> Ticket {
        self.generation += 1;
        self.loading = Some(route_id.to_string());
        self.error = None;
        self.state = FormState::Editing;
        Ticket::new(self.generation, TicketKind::Fetch, self.client.build_list_pets())
    }

    pub fn finish_load(&mut self, ticket: &Ticket, reply: Reply) -> FormEvent {
        if ticket.generation() != self.generation || *ticket.kind() != TicketKind::Fetch {
            return FormEvent::Stale;
        }
        let Some(route_id) = self.loading.take() else {
            return FormEvent::Stale;
        };
        let records = match reply
            .map_err(ApiError::from)
            .and_then(|response| self.client.parse_list_pets(response))
        {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, id = %route_id, "could not load pet for editing");
                return self.fail(LOAD_PET_FAILED.to_string());
            }
        };
        match find_pet(&records, &route_id) {
            Some(record) => {
                self.seed(record);
                FormEvent::Loaded
            }
            None => self.fail(format!("Pet with ID {route_id} not found.")),
        }
    }

    /// Update one field. Editing the image URL also updates the preview.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        if self.state != FormState::Editing {
            return Err(FormError::NotEditing);
        }
        self.draft.set(field, value);
        if field == FormField::ImageUrl {
            self.preview = value.to_string();
        }
        Ok(())
    }

    /// Validate and normalize the draft, then hand out a create or update
    /// request. An invalid draft never produces a request.
    pub fn submit(&mut self) -> Result<Ticket, FormError> {
        if self.state != FormState::Editing || self.loading.is_some() {
            return Err(FormError::NotEditing);
        }
        self.state = FormState::Submitting;
        self.error = None;

        let payload = match self.draft.normalize() {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(reason = %err, "submit rejected by validation");
                self.fail(err.to_string());
                return Err(err.into());
            }
        };
        let built = match &self.draft.id {
            None => self
                .client
                .build_create_pet(&payload)
                .map(|request| (TicketKind::Create, request)),
            Some(id) => self
                .client
                .build_update_pet(id, &payload)
                .map(|request| (TicketKind::Update(id.clone()), request)),
        };
        match built {
            Ok((kind, request)) => {
                self.generation += 1;
                self.submits.push(self.generation);
                Ok(Ticket::new(self.generation, kind, request))
            }
            Err(err) => {
                self.fail(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Apply a save reply. A reply the form has moved past is still a
    /// mutation outcome: success comes back as `Superseded`.
    pub fn finish_submit(&mut self, ticket: &Ticket, reply: Reply) -> FormEvent {
        let Some(pos) = self.submits.iter().position(|&g| g == ticket.generation()) else {
            return FormEvent::Stale;
        };
        self.submits.swap_remove(pos);
        let response = reply.map_err(ApiError::from);
        let saved = match ticket.kind() {
            TicketKind::Create => response.and_then(|r| self.client.parse_create_pet(r)),
            TicketKind::Update(_) => response.and_then(|r| self.client.parse_update_pet(r)),
            _ => return FormEvent::Stale,
        };
        if ticket.generation() != self.generation || self.state != FormState::Submitting {
            return match saved {
                Ok(record) => {
                    tracing::info!(id = %record.id, "superseded save accepted by backend");
                    FormEvent::Superseded(record)
                }
                Err(err) => {
                    tracing::debug!(error = %err, "superseded save failed");
                    FormEvent::Stale
                }
            };
        }
        match saved {
            Ok(record) => {
                tracing::info!(id = %record.id, name = %record.name, "pet saved");
                self.state = FormState::Saved;
                self.error = None;
                FormEvent::Saved {
                    record,
                    notice: SAVED_NOTICE,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                self.fail(err.to_string())
            }
        }
    }

    /// Discard the draft. No confirmation.
    pub fn cancel(&mut self) -> FormEvent {
        self.generation += 1;
        self.draft = PetDraft::new();
        self.preview.clear();
        self.error = None;
        self.loading = None;
        self.state = FormState::Editing;
        FormEvent::Cancelled
    }

    fn fail(&mut self, message: String) -> FormEvent {
        self.state = FormState::Editing;
        self.error = Some(message.clone());
        FormEvent::Failed(message)
    }
}
