//! Stateless HTTP request builder and response parser for the pets API.
//!
//! # Design
//! `PetClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the round trip in between. `PetApi` glues the two
//! halves to a `Transport` for hosts that have a blocking executor.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::SyncConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{PetId, PetPayload, PetRecord};

const RESOURCE: &str = "/api/pets";

#[derive(Debug, Clone)]
pub struct PetClient {
    base_url: String,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.api_origin)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_pets(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{RESOURCE}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_pet(&self, payload: &PetPayload) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{RESOURCE}", self.base_url),
            headers: json_headers(),
            body: Some(encode(payload)?),
        })
    }

    pub fn build_update_pet(&self, id: &PetId, payload: &PetPayload) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}{RESOURCE}/{id}", self.base_url),
            headers: json_headers(),
            body: Some(encode(payload)?),
        })
    }

    pub fn build_delete_pet(&self, id: &PetId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{RESOURCE}/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_pets(&self, response: HttpResponse) -> Result<Vec<PetRecord>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_create_pet(&self, response: HttpResponse) -> Result<PetRecord, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_update_pet(&self, response: HttpResponse) -> Result<PetRecord, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_delete_pet(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn encode(payload: &PetPayload) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Request(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Map non-2xx responses to `ApiError::Server`, preferring the backend's
/// `{"error": "..."}` message when it sent one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let status = response.status;
    let body = response.body.trim();
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) if map.get("error").is_some_and(Value::is_string) => {
            map["error"].as_str().unwrap_or_default().to_string()
        }
        _ if body.is_empty() => status.to_string(),
        _ => format!("{status} - {body}"),
    };
    Err(ApiError::Server { status, detail })
}

/// The four pets operations as single blocking round trips.
pub struct PetApi<T> {
    client: PetClient,
    transport: T,
}

impl<T: Transport> PetApi<T> {
    pub fn new(client: PetClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PetClient {
        &self.client
    }

    pub fn list_all(&mut self) -> Result<Vec<PetRecord>, ApiError> {
        let request = self.client.build_list_pets();
        let response = self.send(&request)?;
        self.client.parse_list_pets(response)
    }

    pub fn create(&mut self, payload: &PetPayload) -> Result<PetRecord, ApiError> {
        let request = self.client.build_create_pet(payload)?;
        let response = self.send(&request)?;
        self.client.parse_create_pet(response)
    }

    pub fn update(&mut self, id: &PetId, payload: &PetPayload) -> Result<PetRecord, ApiError> {
        let request = self.client.build_update_pet(id, payload)?;
        let response = self.send(&request)?;
        self.client.parse_update_pet(response)
    }

    pub fn remove(&mut self, id: &PetId) -> Result<(), ApiError> {
        let request = self.client.build_delete_pet(id);
        let response = self.send(&request)?;
        self.client.parse_delete_pet(response)
    }

    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), path = %request.path, "sending request");
        Ok(self.transport.execute(request)?)
    }
}
