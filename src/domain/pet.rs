use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require, ValidationError};
use crate::ids::new_id;
use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(collection = "pets")]
pub struct Pet {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birthdate: NaiveDate,
    /// Kilograms.
    pub weight: f64,
    pub gender: Gender,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birthdate: NaiveDate,
    pub weight: f64,
    pub gender: Gender,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Pet {
    /// Fields a partial update may not touch.
    pub const PROTECTED: &'static [&'static str] = &["id", "userId", "createdAt", "updatedAt"];

    pub fn new(user_id: &str, input: NewPet, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut pet = Pet {
            id: new_id("pet"),
            user_id: user_id.to_string(),
            name: input.name,
            species: input.species,
            breed: input.breed,
            birthdate: input.birthdate,
            weight: input.weight,
            gender: input.gender,
            active: true,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        pet.normalize();
        pet.validate(now)?;
        Ok(pet)
    }

    /// Trim the free-text fields and lowercase `species`.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.species = self.species.trim().to_lowercase();
        self.breed = self.breed.trim().to_string();
    }

    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("species", &self.species)?;
        require("breed", &self.breed)?;
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(ValidationError::invalid("weight", "must be a positive number"));
        }
        if self.birthdate > now.date_naive() {
            return Err(ValidationError::invalid("birthdate", "cannot be in the future"));
        }
        Ok(())
    }

    /// Whole years between birthdate and `today`.
    pub fn age_years(&self, today: NaiveDate) -> u32 {
        today.years_since(self.birthdate).unwrap_or(0)
    }
}
