use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1543466835-00a7907e9de1?w=400&h=300&fit=crop";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub age: i32,
    pub breed: Option<String>,
    pub owner_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub pet_type: Option<String>,
    #[serde(default)]
    pub age: i32,
    pub breed: Option<String>,
    pub owner_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    pets: BTreeMap<i64, Pet>,
}

impl Store {
    pub fn insert(&mut self, input: PetInput) -> Pet {
        self.next_id += 1;
        let pet = Pet {
            id: self.next_id,
            name: input.name.unwrap_or_default(),
            pet_type: input.pet_type.unwrap_or_default(),
            age: input.age,
            breed: input.breed,
            owner_name: input.owner_name,
            image_url: input.image_url,
        };
        self.pets.insert(pet.id, pet.clone());
        pet
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over a caller-owned store, for tests that seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/pets/{id}", get(get_pet).put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

async fn list_pets(State(db): State<Db>) -> Json<Vec<Pet>> {
    let store = db.read().await;
    Json(store.pets.values().cloned().collect())
}

async fn create_pet(State(db): State<Db>, Json(mut input): Json<PetInput>) -> Response {
    if is_blank(&input.name) {
        return error_response(StatusCode::BAD_REQUEST, "Pet name is required");
    }
    if is_blank(&input.pet_type) {
        return error_response(StatusCode::BAD_REQUEST, "Pet type is required");
    }
    if is_blank(&input.image_url) {
        input.image_url = Some(DEFAULT_IMAGE_URL.to_string());
    }
    let pet = db.write().await.insert(input);
    tracing::info!(id = pet.id, name = %pet.name, "pet created");
    (StatusCode::OK, Json(pet)).into_response()
}

async fn get_pet(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Pet>, StatusCode> {
    let store = db.read().await;
    store.pets.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_pet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PetInput>,
) -> Result<Json<Pet>, StatusCode> {
    let mut store = db.write().await;
    let pet = store.pets.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    pet.name = input.name.unwrap_or_default();
    pet.pet_type = input.pet_type.unwrap_or_default();
    pet.age = input.age;
    pet.breed = input.breed;
    pet.owner_name = input.owner_name;
    pet.image_url = input.image_url;
    tracing::info!(id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(State(db): State<Db>, Path(id): Path<i64>) -> StatusCode {
    let mut store = db.write().await;
    match store.pets.remove(&id) {
        Some(_) => {
            tracing::info!(id, "pet deleted");
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}
