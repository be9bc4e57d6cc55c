use super::ids::BossId;
use crate::error::{ErrorSeverity, TowerError};

/// Immutable boss catalog entry.
///
/// `hp` is the starting HP a battle copies into its mutable state; a freshly
/// registered boss starts at `max_hp`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossTemplate {
    pub id: BossId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack_power: u32,
    /// Player turns between two boss attacks.
    pub attack_turn: u32,
    pub difficulty: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: Option<String>,
}

impl BossTemplate {
    /// Creates a boss at full HP.
    pub fn new(
        id: BossId,
        name: impl Into<String>,
        max_hp: u32,
        attack_power: u32,
        attack_turn: u32,
        difficulty: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            hp: max_hp,
            max_hp,
            attack_power,
            attack_turn,
            difficulty,
            image_url: None,
        }
    }

    /// Attaches a description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attaches an image URL (builder pattern).
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Validates a catalog entry before it is registered or updated.
    ///
    /// The description is only required for entries created through catalog
    /// management; loaders may skip it with [`Self::validate_stats`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.description.trim().is_empty() {
            return Err(CatalogError::MissingField {
                boss: self.id,
                field: "description",
            });
        }
        self.validate_stats()
    }

    /// Validates name and combat numbers.
    pub fn validate_stats(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField {
                boss: self.id,
                field: "name",
            });
        }
        if self.max_hp == 0 {
            return Err(CatalogError::OutOfRange {
                boss: self.id,
                field: "max_hp",
                value: self.max_hp,
            });
        }
        if self.hp == 0 || self.hp > self.max_hp {
            return Err(CatalogError::OutOfRange {
                boss: self.id,
                field: "hp",
                value: self.hp,
            });
        }
        if self.attack_turn == 0 {
            return Err(CatalogError::OutOfRange {
                boss: self.id,
                field: "attack_turn",
                value: self.attack_turn,
            });
        }
        if self.difficulty == 0 {
            return Err(CatalogError::OutOfRange {
                boss: self.id,
                field: "difficulty",
                value: self.difficulty,
            });
        }
        Ok(())
    }
}

/// Errors raised while validating boss catalog entries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{boss}: field `{field}` must not be empty")]
    MissingField { boss: BossId, field: &'static str },

    #[error("{boss}: field `{field}` has invalid value {value}")]
    OutOfRange {
        boss: BossId,
        field: &'static str,
        value: u32,
    },

    #[error("{boss} already exists in the catalog")]
    DuplicateId { boss: BossId },
}

impl TowerError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "CATALOG_MISSING_FIELD",
            Self::OutOfRange { .. } => "CATALOG_OUT_OF_RANGE",
            Self::DuplicateId { .. } => "CATALOG_DUPLICATE_ID",
        }
    }
}
