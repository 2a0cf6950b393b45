//! Home energy profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Primary heating system of a home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatingType {
    Gas,
    Oil,
    Electric,
    HeatPump,
    District,
}

impl HeatingType {
    pub const ALL: [HeatingType; 5] = [
        Self::Gas,
        Self::Oil,
        Self::Electric,
        Self::HeatPump,
        Self::District,
    ];

    /// Get string representation for database and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gas => "GAS",
            Self::Oil => "OIL",
            Self::Electric => "ELECTRIC",
            Self::HeatPump => "HEAT_PUMP",
            Self::District => "DISTRICT",
        }
    }
}

impl fmt::Display for HeatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeatingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid heating type: {}", s))
    }
}

/// Insulation quality of the building envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsulationLevel {
    None,
    Partial,
    Good,
    Excellent,
}

impl InsulationLevel {
    pub const ALL: [InsulationLevel; 4] =
        [Self::None, Self::Partial, Self::Good, Self::Excellent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Partial => "PARTIAL",
            Self::Good => "GOOD",
            Self::Excellent => "EXCELLENT",
        }
    }
}

impl fmt::Display for InsulationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsulationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("Invalid insulation level: {}", s))
    }
}

/// A persisted home profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub id: i64,
    pub size_sqm: i32,
    pub year_built: Option<i32>,
    pub heating_type: HeatingType,
    pub insulation: Option<InsulationLevel>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Raw `homes` row; enum columns are stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct HomeRow {
    pub id: i64,
    pub size_sqm: i32,
    pub year_built: Option<i32>,
    pub heating_type: String,
    pub insulation: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<HomeRow> for Home {
    type Error = String;

    fn try_from(row: HomeRow) -> Result<Self, Self::Error> {
        Ok(Home {
            id: row.id,
            size_sqm: row.size_sqm,
            year_built: row.year_built,
            heating_type: row.heating_type.parse()?,
            insulation: row.insulation.as_deref().map(str::parse::<InsulationLevel>).transpose()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validated input for creating a home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHome {
    pub size_sqm: i32,
    pub year_built: Option<i32>,
    pub heating_type: HeatingType,
    pub insulation: Option<InsulationLevel>,
    pub notes: Option<String>,
}
