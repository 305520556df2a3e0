use serde::{Deserialize, Serialize};

use super::{LetterPatch, Resource};

/// Same schema as [`super::LetterRecord`], stored in its own collection (`/datadate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DateRecord {
    pub letter: String,
    pub frequency: f64,
}

impl Resource for DateRecord {
    type Patch = LetterPatch;
    const COLLECTION: &'static str = "datadates";
}
