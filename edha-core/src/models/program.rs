//! Program types.
//!
//! - [`Program`] - Raw backend record
//! - [`ProgramDetails`] - Nested details block
//! - [`ProgramCategory`] - Category with its display label
//! - [`ProgramView`] - Normalized, display-ready program

use serde::{Deserialize, Serialize};

use super::PLACEHOLDER;
use super::lenient::{non_empty, object_or_default, opt_i64, opt_string, string_list};
use crate::error::CoreError;

/// Fallback program name.
const DEFAULT_NAME: &str = "Programme";

// ============================================================================
// Program
// ============================================================================

/// A program as returned by the backend.
///
/// Every field is optional. The client never mutates programs, it only
/// renders them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Internal backend identifier.
    #[serde(default, rename = "_id", deserialize_with = "opt_string")]
    pub id: Option<String>,

    /// Display name.
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,

    /// Free-text description.
    #[serde(default, deserialize_with = "opt_string")]
    pub description: Option<String>,

    /// Category key (`social`, `sante`, ...).
    #[serde(default, deserialize_with = "opt_string")]
    pub category: Option<String>,

    /// Human-readable, URL-safe identifier.
    #[serde(default, deserialize_with = "opt_string")]
    pub slug: Option<String>,

    /// Short highlight lines.
    #[serde(default, deserialize_with = "string_list")]
    pub bullets: Vec<String>,

    /// Audience, location, duration and objectives.
    #[serde(default, deserialize_with = "object_or_default")]
    pub details: ProgramDetails,

    /// Sort key, missing values sort as 0.
    #[serde(default, deserialize_with = "opt_i64")]
    pub order: Option<i64>,
}

/// Details block of a program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDetails {
    /// Who the program is for.
    #[serde(default, deserialize_with = "opt_string")]
    pub target_audience: Option<String>,

    /// Where it takes place.
    #[serde(default, deserialize_with = "opt_string")]
    pub location: Option<String>,

    /// How long it lasts.
    #[serde(default, deserialize_with = "opt_string")]
    pub duration: Option<String>,

    /// Ordered objectives.
    #[serde(default, deserialize_with = "string_list")]
    pub objectives: Vec<String>,
}

impl Program {
    /// Returns the internal identifier, required to fetch articles.
    pub fn require_id(&self) -> Result<&str, CoreError> {
        non_empty(self.id.as_deref())
            .ok_or_else(|| CoreError::MissingIdentifier("Programme sans identifiant.".to_string()))
    }

    /// Produces the display-ready view of this program.
    pub fn normalize(&self) -> ProgramView {
        let text_or_placeholder =
            |value: &Option<String>| non_empty(value.as_deref()).unwrap_or(PLACEHOLDER).to_string();

        ProgramView {
            id: non_empty(self.id.as_deref()).map(str::to_string),
            slug: non_empty(self.slug.as_deref()).map(str::to_string),
            name: non_empty(self.name.as_deref())
                .unwrap_or(DEFAULT_NAME)
                .to_string(),
            description: self.description.clone().unwrap_or_default(),
            category: ProgramCategory::from_key(self.category.as_deref()),
            bullets: self.bullets.clone(),
            target_audience: text_or_placeholder(&self.details.target_audience),
            location: text_or_placeholder(&self.details.location),
            duration: text_or_placeholder(&self.details.duration),
            objectives: self.details.objectives.clone(),
            order: self.order.unwrap_or(0),
        }
    }
}

// ============================================================================
// Program Category
// ============================================================================

/// Program categories known to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    /// Social programs.
    Social,
    /// Health programs.
    Sante,
    /// Education programs.
    Education,
    /// Technology programs.
    Technologie,
    /// Explicitly "other".
    Autre,
    /// Missing or unknown category.
    #[default]
    Unknown,
}

impl ProgramCategory {
    /// Parses a backend category key.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("social") => Self::Social,
            Some("sante") => Self::Sante,
            Some("education") => Self::Education,
            Some("technologie") => Self::Technologie,
            Some("autre") => Self::Autre,
            _ => Self::Unknown,
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Sante => "Santé",
            Self::Education => "Éducation",
            Self::Technologie => "Technologie",
            Self::Autre => "Autre",
            Self::Unknown => "Programme",
        }
    }
}

impl std::fmt::Display for ProgramCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Program View
// ============================================================================

/// Normalized program, every display field populated.
///
/// Text is stored unescaped; renderers escape on output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramView {
    /// Internal identifier, when known.
    pub id: Option<String>,
    /// Slug, when known.
    pub slug: Option<String>,
    /// Name, `Programme` when missing.
    pub name: String,
    /// Description, empty when missing.
    pub description: String,
    /// Category.
    pub category: ProgramCategory,
    /// Bullet lines, possibly empty.
    pub bullets: Vec<String>,
    /// Target audience or placeholder.
    pub target_audience: String,
    /// Location or placeholder.
    pub location: String,
    /// Duration or placeholder.
    pub duration: String,
    /// Objectives, possibly empty.
    pub objectives: Vec<String>,
    /// Sort key.
    pub order: i64,
}

/// Sorts programs by `order`, keeping backend order for ties.
pub fn sort_by_order(programs: &mut [ProgramView]) {
    programs.sort_by_key(|p| p.order);
}

// ============================================================================
// Tests
// ============================================================================
