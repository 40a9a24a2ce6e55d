//! Draft records: validation and payload normalization.
//!
//! A `PetDraft` holds exactly what the user typed. Nothing is coerced until
//! `normalize`, which validates first and runs on every create and update.

use crate::error::ValidationError;
use crate::types::{PetId, PetPayload, PetRecord, PetType};

/// Image stored when the draft leaves the image URL empty.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1543466835-00a7907e9de1?w=400&h=300&fit=crop";

pub const MAX_AGE: u32 = 50;

/// One editable input of the pet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Type,
    Age,
    Breed,
    OwnerName,
    ImageUrl,
}

/// In-memory edit buffer. `id` is present only when editing a persisted pet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetDraft {
    pub id: Option<PetId>,
    pub name: String,
    pub pet_type: String,
    pub age: String,
    pub breed: String,
    pub owner_name: String,
    pub image_url: String,
}

impl PetDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a persisted record into a fresh buffer. The record is untouched.
    pub fn from_record(record: &PetRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            name: record.name.clone(),
            pet_type: record.pet_type.clone(),
            age: record.age.to_string(),
            breed: record.breed.clone().unwrap_or_default(),
            owner_name: record.owner_name.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn from_payload(id: Option<PetId>, payload: &PetPayload) -> Self {
        Self {
            id,
            name: payload.name.clone(),
            pet_type: payload.pet_type.clone(),
            age: payload.age.to_string(),
            breed: payload.breed.clone(),
            owner_name: payload.owner_name.clone(),
            image_url: payload.image_url.clone(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Type => &self.pet_type,
            FormField::Age => &self.age,
            FormField::Breed => &self.breed,
            FormField::OwnerName => &self.owner_name,
            FormField::ImageUrl => &self.image_url,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Type => self.pet_type = value,
            FormField::Age => self.age = value,
            FormField::Breed => self.breed = value,
            FormField::OwnerName => self.owner_name = value,
            FormField::ImageUrl => self.image_url = value,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.checked().map(|_| ())
    }

    /// Validate, then build the wire payload with optional fields filled in.
    pub fn normalize(&self) -> Result<PetPayload, ValidationError> {
        let (pet_type, age) = self.checked()?;
        Ok(PetPayload {
            name: self.name.clone(),
            pet_type: pet_type.label().to_string(),
            age,
            breed: self.breed.clone(),
            owner_name: self.owner_name.clone(),
            image_url: if self.image_url.is_empty() {
                FALLBACK_IMAGE_URL.to_string()
            } else {
                self.image_url.clone()
            },
        })
    }

    fn checked(&self) -> Result<(PetType, u32), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        let pet_type = self.pet_type.trim();
        if pet_type.is_empty() {
            return Err(ValidationError::MissingType);
        }
        let pet_type = pet_type
            .parse::<PetType>()
            .map_err(ValidationError::UnknownType)?;
        let age = parse_age(&self.age)?;
        Ok((pet_type, age))
    }
}

/// Accepts whole numbers in `0..=MAX_AGE`, written as integers or as floats
/// with no fractional part (`"4"`, `"4.0"`).
fn parse_age(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingAge);
    }
    let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidAge)?;
    if !value.is_finite() || value.fract() != 0.0 || !(0.0..=MAX_AGE as f64).contains(&value) {
        return Err(ValidationError::InvalidAge);
    }
    Ok(value as u32)
}
