//! Synchronization core for the pet records admin interface.
//!
//! # Overview
//! Fetches, validates, normalizes, submits and reconciles pet records
//! against a REST backend. Builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern): the host executes the round trip, keeping the core
//! deterministic and testable.
//!
//! # Design
//! - `PetClient` is stateless and holds only the backend origin.
//! - Controllers (`FormController`, `ListController`, `ReportView`) own their
//!   state outright and are driven by method calls; requests leave them as
//!   generation-stamped `Ticket`s so late replies cannot clobber newer state.
//! - After every mutation the full list is fetched again; nothing is spliced
//!   locally.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod http;
pub mod image;
pub mod list;
pub mod report;
pub mod source;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{PetApi, PetClient};
pub use config::SyncConfig;
pub use draft::{FormField, PetDraft, FALLBACK_IMAGE_URL};
pub use error::{ApiError, ConfigError, FormError, TransportError, ValidationError};
pub use form::{FormController, FormEvent, FormState};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Reply, Transport};
pub use image::{DisplayImage, ImageResolver};
pub use list::{CategoryCount, CategoryFilter, ListController, ListEvent};
pub use report::{AgeRange, Report, ReportView};
pub use source::{FetchOutcome, RecordSource, Ticket, TicketKind};
pub use types::{find_pet, PetId, PetPayload, PetRecord, PetType};
