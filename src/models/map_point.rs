use serde::{Deserialize, Serialize};

use super::Resource;

/// Named coordinate (`/maps`). `lang` is the longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MapPoint {
    pub title: String,
    pub lat: f64,
    pub lang: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapPointPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<f64>,
}

impl Resource for MapPoint {
    type Patch = MapPointPatch;
    const COLLECTION: &'static str = "maps";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{patch_fields, Record};
    use mongodb::bson::{doc, oid::ObjectId};

    #[test]
    fn record_exposes_hex_id_and_exact_numbers() {
        let id = ObjectId::new();
        let record = Record::<MapPoint>::from_document(doc! {
            "_id": id,
            "title": "Monas",
            "lat": -6.175392,
            "lang": 106.827153,
        })
        .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.to_hex()));
        assert_eq!(json["lat"], serde_json::json!(-6.175392));
        assert_eq!(json["lang"], serde_json::json!(106.827153));
    }

    #[test]
    fn document_without_id_is_rejected() {
        let result = Record::<MapPoint>::from_document(doc! { "title": "x", "lat": 0.0, "lang": 0.0 });
        assert!(result.is_err());
    }

    #[test]
    fn patch_keeps_only_supplied_fields() {
        let patch = MapPointPatch {
            title: Some("Monas".into()),
            ..Default::default()
        };
        assert_eq!(patch_fields::<MapPoint>(&patch).unwrap(), doc! { "title": "Monas" });
    }
}
