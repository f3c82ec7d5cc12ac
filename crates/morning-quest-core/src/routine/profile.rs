//! Hero identity, profile and rank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::departure::DepartureTime;
use crate::error::ValidationError;

/// Name + birthday pair identifying one hero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub birthday: NaiveDate,
}

impl Identity {
    /// Build an identity from login form values.
    ///
    /// The name is trimmed and must be non-empty; the birthday must be
    /// `YYYY-MM-DD`.
    pub fn new(name: &str, birthday: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let birthday = NaiveDate::parse_from_str(birthday.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidBirthday(birthday.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            birthday,
        })
    }

    /// Storage key derived from the identity.
    pub fn key(&self) -> IdentityKey {
        IdentityKey(format!(
            "hero_{}_{}",
            self.name,
            self.birthday.format("%Y-%m-%d")
        ))
    }
}

/// Deterministic storage key for one hero's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub identity: Identity,
    pub points: u64,
    pub departure: DepartureTime,
}

impl Profile {
    pub fn new(identity: Identity, departure: DepartureTime) -> Self {
        Self {
            identity,
            points: 0,
            departure,
        }
    }

    pub fn rank(&self) -> Rank {
        Rank::for_points(self.points)
    }
}

/// Title earned from accumulated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Villager,
    NoviceWarrior,
    SeniorKnight,
    LegendaryHero,
}

impl Rank {
    pub fn for_points(points: u64) -> Self {
        match points {
            2000.. => Rank::LegendaryHero,
            1000.. => Rank::SeniorKnight,
            500.. => Rank::NoviceWarrior,
            _ => Rank::Villager,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rank::Villager => "Villager",
            Rank::NoviceWarrior => "Novice Warrior",
            Rank::SeniorKnight => "Senior Knight",
            Rank::LegendaryHero => "Legendary Hero",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
