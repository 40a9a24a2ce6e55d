//! Generation-stamped requests and the shared fetch-and-hold record set.
//!
//! # Design
//! Controllers never execute requests. They hand out a `Ticket`, the host
//! executes `ticket.request()`, and the reply comes back together with the
//! ticket. Each controller keeps a generation counter and bumps it whenever
//! an outstanding request is superseded, so a late reply for an old ticket
//! is dropped instead of overwriting fresher state.

use crate::client::PetClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, Reply, Transport};
use crate::types::{PetId, PetRecord};

pub const LOAD_FAILED: &str = "Failed to load pets.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketKind {
    Fetch,
    Create,
    Update(PetId),
    Delete(PetId),
}

/// An outstanding request handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    kind: TicketKind,
    request: HttpRequest,
}

impl Ticket {
    pub(crate) fn new(generation: u64, kind: TicketKind, request: HttpRequest) -> Self {
        Self {
            generation,
            kind,
            request,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn kind(&self) -> &TicketKind {
        &self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Execute the request on `transport`. One round trip, no retry.
    pub fn send<T: Transport>(&self, transport: &mut T) -> Reply {
        tracing::debug!(
            method = self.request.method.as_str(),
            path = %self.request.path,
            generation = self.generation,
            "sending request"
        );
        transport.execute(&self.request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed(ApiError),
    Stale,
}

/// The last fetched source set, plus bookkeeping for the fetch in flight.
#[derive(Debug, Clone)]
pub struct RecordSource {
    client: PetClient,
    records: Vec<PetRecord>,
    issued: u64,
    loading: bool,
    error: Option<String>,
}

impl RecordSource {
    pub fn new(client: PetClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            issued: 0,
            loading: false,
            error: None,
        }
    }

    pub fn client(&self) -> &PetClient {
        &self.client
    }

    pub fn records(&self) -> &[PetRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a full-list fetch. Supersedes any fetch still in flight.
    pub fn begin_fetch(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        Ticket::new(self.issued, TicketKind::Fetch, self.client.build_list_pets())
    }

    /// Apply the reply to the latest fetch. On failure the previous set stays.
    pub fn finish_fetch(&mut self, ticket: &Ticket, reply: Reply) -> FetchOutcome {
        if ticket.kind != TicketKind::Fetch || ticket.generation != self.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "dropping stale list reply"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        let parsed = reply
            .map_err(ApiError::from)
            .and_then(|response| self.client.parse_list_pets(response));
        match parsed {
            Ok(records) => {
                tracing::debug!(count = records.len(), "source set replaced");
                self.records = records;
                self.error = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "list fetch failed");
                self.error = Some(LOAD_FAILED.to_string());
                FetchOutcome::Failed(err)
            }
        }
    }
}
