//! Pet list with client-side filtering, counts and confirmed delete.
//!
//! # Design
//! The source set is only ever replaced by a full fetch. Filters produce a
//! view of indices into it, recomputed whenever the set or a filter changes.
//! A successful delete is followed by a fresh fetch rather than a local
//! splice, so what the user sees is always what the backend returned.

use crate::client::PetClient;
use crate::error::ApiError;
use crate::http::Reply;
use crate::source::{FetchOutcome, RecordSource, Ticket, TicketKind};
use crate::types::{PetId, PetRecord, PetType};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this pet?";
pub const DELETED_NOTICE: &str = "Pet deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete pet.";

/// Category selector. `"all"` disables category filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Type(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Type(value.to_string())
        }
    }

    pub fn matches(&self, pet: &PetRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Type(wanted) => pet.pet_type.to_lowercase() == wanted.to_lowercase(),
        }
    }
}

impl From<PetType> for CategoryFilter {
    fn from(pet_type: PetType) -> Self {
        CategoryFilter::Type(pet_type.label().to_string())
    }
}

/// Case-insensitive substring search over name, type, breed and owner.
/// Absent optional fields never match. An empty term matches everything.
pub fn matches_search(pet: &PetRecord, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        Some(pet.name.as_str()),
        Some(pet.pet_type.as_str()),
        pet.breed.as_deref(),
        pet.owner_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub filter: CategoryFilter,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The view now reflects a fresh source set.
    Refreshed,
    /// A delete succeeded; execute this fetch to pick up server truth.
    Deleted { refetch: Ticket, notice: &'static str },
    Failed(String),
    Stale,
}

#[derive(Debug, Clone)]
pub struct ListController {
    source: RecordSource,
    category: CategoryFilter,
    search: String,
    view: Vec<usize>,
    pending_delete: Option<PetId>,
    deleting: Vec<u64>,
    delete_generation: u64,
    notice: Option<&'static str>,
    error: Option<String>,
}

impl ListController {
    pub fn new(client: PetClient) -> Self {
        Self {
            source: RecordSource::new(client),
            category: CategoryFilter::All,
            search: String::new(),
            view: Vec::new(),
            pending_delete: None,
            deleting: Vec::new(),
            delete_generation: 0,
            notice: None,
            error: None,
        }
    }

    /// Initial load. Also used to refresh after a form saves.
    pub fn activate(&mut self) -> Ticket {
        self.source.begin_fetch()
    }

    pub fn on_fetched(&mut self, ticket: &Ticket, reply: Reply) -> ListEvent {
        match self.source.finish_fetch(ticket, reply) {
            FetchOutcome::Applied => {
                self.error = None;
                self.recompute();
                ListEvent::Refreshed
            }
            FetchOutcome::Failed(_) => {
                let message = self.source.error().unwrap_or_default().to_string();
                self.error = Some(message.clone());
                ListEvent::Failed(message)
            }
            FetchOutcome::Stale => ListEvent::Stale,
        }
    }

    pub fn records(&self) -> &[PetRecord] {
        self.source.records()
    }

    pub fn visible(&self) -> Vec<&PetRecord> {
        let records = self.source.records();
        self.view.iter().map(|&i| &records[i]).collect()
    }

    pub fn is_loading(&self) -> bool {
        self.source.is_loading()
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn set_category(&mut self, value: &str) {
        self.category = CategoryFilter::parse(value);
        self.recompute();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.recompute();
    }

    /// Count over the whole source set, ignoring the active filters.
    pub fn count_for(&self, filter: &CategoryFilter) -> usize {
        self.source.records().iter().filter(|pet| filter.matches(pet)).count()
    }

    /// "All" followed by one entry per pet type.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        let all = CategoryCount {
            filter: CategoryFilter::All,
            label: "All",
            count: self.source.records().len(),
        };
        std::iter::once(all)
            .chain(PetType::ALL.into_iter().map(|pet_type| {
                let filter = CategoryFilter::from(pet_type);
                CategoryCount {
                    count: self.count_for(&filter),
                    filter,
                    label: pet_type.label(),
                }
            }))
            .collect()
    }

    /// Ask for confirmation before deleting `id`. Returns the prompt to show.
    pub fn request_delete(&mut self, id: PetId) -> &'static str {
        self.pending_delete = Some(id);
        DELETE_PROMPT
    }

    pub fn pending_delete(&self) -> Option<&PetId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// The user confirmed; hand out the DELETE request. Earlier deletes
    /// still in flight stay outstanding.
    pub fn confirm_delete(&mut self) -> Option<Ticket> {
        let id = self.pending_delete.take()?;
        self.delete_generation += 1;
        self.deleting.push(self.delete_generation);
        self.notice = None;
        let request = self.source.client().build_delete_pet(&id);
        Some(Ticket::new(self.delete_generation, TicketKind::Delete(id), request))
    }

    /// Apply a delete reply. Every outstanding delete is applied, whatever
    /// its order; only unknown or repeated replies are `Stale`.
    pub fn on_deleted(&mut self, ticket: &Ticket, reply: Reply) -> ListEvent {
        let TicketKind::Delete(id) = ticket.kind() else {
            return ListEvent::Stale;
        };
        let Some(pos) = self.deleting.iter().position(|&g| g == ticket.generation()) else {
            return ListEvent::Stale;
        };
        self.deleting.swap_remove(pos);
        let result = reply
            .map_err(ApiError::from)
            .and_then(|response| self.source.client().parse_delete_pet(response));
        match result {
            Ok(()) => {
                tracing::info!(%id, "pet deleted");
                self.error = None;
                self.notice = Some(DELETED_NOTICE);
                ListEvent::Deleted {
                    refetch: self.source.begin_fetch(),
                    notice: DELETED_NOTICE,
                }
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "delete failed");
                self.error = Some(DELETE_FAILED.to_string());
                ListEvent::Failed(DELETE_FAILED.to_string())
            }
        }
    }

    fn recompute(&mut self) {
        let category = &self.category;
        let search = self.search.as_str();
        self.view = self
            .source
            .records()
            .iter()
            .enumerate()
            .filter(|(_, pet)| category.matches(pet) && matches_search(pet, search))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::testing::ScriptedTransport;

    const PETS: &str = r#"[
        {"id":1,"name":"Rex","type":"Dog","age":3,"breed":"Beagle"},
        {"id":2,"name":"Fido","type":"dog","age":5},
        {"id":3,"name":"Luna","type":"Cat","age":2,"ownerName":"Max Smith"},
        {"id":4,"name":"Tweety","type":"Bird","age":1}
    ]"#;

    fn loaded() -> ListController {
        let mut list = ListController::new(PetClient::new("http://localhost:8080"));
        let ticket = list.activate();
        assert_eq!(
            list.on_fetched(&ticket, Ok(HttpResponse::new(200, PETS))),
            ListEvent::Refreshed
        );
        list
    }

    fn names(list: &ListController) -> Vec<&str> {
        list.visible().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn all_shows_everything() {
        let mut list = loaded();
        assert_eq!(names(&list), ["Rex", "Fido", "Luna", "Tweety"]);
        list.set_category("ALL");
        assert_eq!(list.visible().len(), 4);
    }

    #[test]
    fn category_match_ignores_case() {
        let mut list = loaded();
        list.set_category("dog");
        assert_eq!(names(&list), ["Rex", "Fido"]);
        list.set_category("Cat");
        assert_eq!(names(&list), ["Luna"]);
    }

    #[test]
    fn search_covers_owner_and_breed() {
        let mut list = loaded();
        list.set_search("max");
        assert_eq!(names(&list), ["Luna"]);
        list.set_search("BEAG");
        assert_eq!(names(&list), ["Rex"]);
        list.set_search("");
        assert_eq!(list.visible().len(), 4);
    }

    #[test]
    fn search_skips_absent_fields() {
        let bare: PetRecord = serde_json::from_str(r#"{"id":9}"#).unwrap();
        assert!(!matches_search(&bare, "max"));
        assert!(!matches_search(&bare, "undefined"));
    }

    #[test]
    fn filters_combine() {
        let mut list = loaded();
        list.set_category("dog");
        list.set_search("fi");
        assert_eq!(names(&list), ["Fido"]);
    }

    #[test]
    fn counts_ignore_active_filter() {
        let mut list = loaded();
        list.set_category("cat");
        list.set_search("luna");
        let counts = list.category_counts();
        assert_eq!(counts[0].label, "All");
        assert_eq!(counts[0].count, 4);
        let dog = counts.iter().find(|c| c.label == "Dog").unwrap();
        assert_eq!(dog.count, 2);
        let fish = counts.iter().find(|c| c.label == "Fish").unwrap();
        assert_eq!(fish.count, 0);
        assert_eq!(counts.len(), 7);
    }

    #[test]
    fn filtering_does_not_touch_source() {
        let mut list = loaded();
        list.set_category("bird");
        assert_eq!(list.records().len(), 4);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut list = loaded();
        assert_eq!(list.confirm_delete(), None);
        assert_eq!(list.request_delete(PetId::from(3i64)), DELETE_PROMPT);
        list.cancel_delete();
        assert_eq!(list.confirm_delete(), None);
    }

    #[test]
    fn confirmed_delete_refetches_full_list() {
        let mut list = loaded();
        let mut transport = ScriptedTransport::new();
        transport.push_ok(200, "");
        transport.push_ok(
            200,
            r#"[{"id":1,"name":"Rex","type":"Dog","age":3},{"id":4,"name":"Tweety","type":"Bird","age":1},{"id":5,"name":"New","type":"Fish","age":1}]"#,
        );

        list.request_delete(PetId::from("3"));
        let ticket = list.confirm_delete().unwrap();
        let refetch = match list.on_deleted(&ticket, ticket.send(&mut transport)) {
            ListEvent::Deleted { refetch, notice } => {
                assert_eq!(notice, DELETED_NOTICE);
                refetch
            }
            other => panic!("expected Deleted, got {other:?}"),
        };
        assert_eq!(list.records().len(), 4);
        list.on_fetched(&refetch, refetch.send(&mut transport));

        let seen = transport.requests();
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].path, "http://localhost:8080/api/pets/3");
        assert_eq!(seen[1].method, HttpMethod::Get);
        assert_eq!(seen[1].path, "http://localhost:8080/api/pets");
        assert_eq!(names(&list), ["Rex", "Tweety", "New"]);
    }

    #[test]
    fn failed_delete_keeps_view() {
        let mut list = loaded();
        list.request_delete(PetId::from(1i64));
        let ticket = list.confirm_delete().unwrap();
        let event = list.on_deleted(&ticket, Ok(HttpResponse::new(500, "")));
        assert_eq!(event, ListEvent::Failed(DELETE_FAILED.into()));
        assert_eq!(list.visible().len(), 4);
        assert_eq!(list.error(), Some(DELETE_FAILED));

        list.request_delete(PetId::from(1i64));
        let ticket = list.confirm_delete().unwrap();
        let event = list.on_deleted(&ticket, Err(TransportError::NoResponse("down".into())));
        assert_eq!(event, ListEvent::Failed(DELETE_FAILED.into()));
    }

    #[test]
    fn overlapping_deletes_both_apply() {
        let mut list = loaded();
        list.request_delete(PetId::from(1i64));
        let first = list.confirm_delete().unwrap();
        list.request_delete(PetId::from(2i64));
        let second = list.confirm_delete().unwrap();

        let refetch = match list.on_deleted(&first, Ok(HttpResponse::new(200, ""))) {
            ListEvent::Deleted { refetch, .. } => refetch,
            other => panic!("expected Deleted, got {other:?}"),
        };
        assert_eq!(
            list.on_deleted(&second, Ok(HttpResponse::new(500, ""))),
            ListEvent::Failed(DELETE_FAILED.into())
        );

        let remaining = r#"[{"id":2,"name":"Fido","type":"dog","age":5},{"id":3,"name":"Luna","type":"Cat","age":2},{"id":4,"name":"Tweety","type":"Bird","age":1}]"#;
        list.on_fetched(&refetch, Ok(HttpResponse::new(200, remaining)));
        assert_eq!(names(&list), ["Fido", "Luna", "Tweety"]);
    }

    #[test]
    fn deletes_answered_out_of_order() {
        let mut list = loaded();
        list.request_delete(PetId::from(1i64));
        let first = list.confirm_delete().unwrap();
        list.request_delete(PetId::from(2i64));
        let second = list.confirm_delete().unwrap();

        assert!(matches!(
            list.on_deleted(&second, Ok(HttpResponse::new(200, ""))),
            ListEvent::Deleted { .. }
        ));
        assert!(matches!(
            list.on_deleted(&first, Ok(HttpResponse::new(204, ""))),
            ListEvent::Deleted { .. }
        ));
        assert_eq!(
            list.on_deleted(&first, Ok(HttpResponse::new(200, ""))),
            ListEvent::Stale
        );
    }

    #[test]
    fn failed_fetch_keeps_previous_view() {
        let mut list = loaded();
        list.set_category("dog");
        let ticket = list.activate();
        assert!(list.is_loading());
        let event = list.on_fetched(&ticket, Ok(HttpResponse::new(503, "")));
        assert!(matches!(event, ListEvent::Failed(_)));
        assert_eq!(names(&list), ["Rex", "Fido"]);
    }

    #[test]
    fn view_follows_new_source_set() {
        let mut list = loaded();
        list.set_category("dog");
        let ticket = list.activate();
        list.on_fetched(
            &ticket,
            Ok(HttpResponse::new(200, r#"[{"id":8,"name":"Bolt","type":"Dog","age":4}]"#)),
        );
        assert_eq!(names(&list), ["Bolt"]);
    }
}
