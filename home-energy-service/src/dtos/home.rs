use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{CreateHome, HeatingType, Home, InsulationLevel};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateHomeRequest {
    /// Living area in square metres.
    #[validate(range(min = 1, max = 10000, message = "size_sqm must be between 1 and 10000"))]
    #[schema(example = 120)]
    pub size_sqm: i32,

    #[validate(range(min = 1800, max = 2026, message = "year_built must be between 1800 and 2026"))]
    #[schema(example = 1995)]
    pub year_built: Option<i32>,

    pub heating_type: HeatingType,

    pub insulation: Option<InsulationLevel>,

    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    #[schema(example = "Single family")]
    pub notes: Option<String>,
}

impl From<CreateHomeRequest> for CreateHome {
    fn from(req: CreateHomeRequest) -> Self {
        Self {
            size_sqm: req.size_sqm,
            year_built: req.year_built,
            heating_type: req.heating_type,
            insulation: req.insulation,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomeResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub size_sqm: i32,
    pub year_built: Option<i32>,
    pub heating_type: HeatingType,
    pub insulation: Option<InsulationLevel>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Home> for HomeResponse {
    fn from(home: Home) -> Self {
        Self {
            id: home.id,
            size_sqm: home.size_sqm,
            year_built: home.year_built,
            heating_type: home.heating_type,
            insulation: home.insulation,
            notes: home.notes,
            created_at: home.created_at,
            updated_at: home.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdviceResponse {
    /// Prioritized list of actionable energy-saving recommendations.
    #[schema(example = json!(["Seal drafts around windows and doors."]))]
    pub recommendations: Vec<String>,
}
