use serde::{Deserialize, Serialize};

use super::Resource;

/// Letter frequency entry (`/data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LetterRecord {
    pub letter: String,
    pub frequency: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LetterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl Resource for LetterRecord {
    type Patch = LetterPatch;
    const COLLECTION: &'static str = "letters";
}
