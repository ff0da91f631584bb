use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An artifact durably stored by a storage handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Opaque name generated by the storage handler.
    pub storage_name: String,
    pub name: String,
    pub mimetype: String,
    pub size: u64,
}

/// Persisted description of one stored variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub variant_id: String,
    pub name: String,
    pub storage_name: String,
    pub mimetype: String,
    pub size: u64,
}

/// Persisted description of an upload and its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: Uuid,
    pub name: String,
    /// Authenticated caller at store time, if any.
    pub owner_id: Option<String>,
    pub storage_name: String,
    pub mimetype: String,
    pub size: u64,
    /// In the order the generator produced them.
    pub variants: Vec<VariantRecord>,
    pub created_at: DateTime<Utc>,
}

impl UploadRecord {
    /// Assemble a new record from the stored original and its stored variants.
    pub fn from_artifacts(
        owner_id: Option<String>,
        original: StoredArtifact,
        variants: Vec<(String, StoredArtifact)>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: original.name,
            owner_id,
            storage_name: original.storage_name,
            mimetype: original.mimetype,
            size: original.size,
            variants: variants
                .into_iter()
                .map(|(variant_id, artifact)| VariantRecord {
                    variant_id,
                    name: artifact.name,
                    storage_name: artifact.storage_name,
                    mimetype: artifact.mimetype,
                    size: artifact.size,
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    pub fn variant(&self, variant_id: &str) -> Option<&VariantRecord> {
        self.variants.iter().find(|v| v.variant_id == variant_id)
    }

    /// Storage names of every artifact, the original first.
    pub fn storage_names(&self) -> Vec<&str> {
        std::iter::once(self.storage_name.as_str())
            .chain(self.variants.iter().map(|v| v.storage_name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(storage_name: &str, name: &str) -> StoredArtifact {
        StoredArtifact {
            storage_name: storage_name.to_string(),
            name: name.to_string(),
            mimetype: "image/jpeg".to_string(),
            size: 42,
        }
    }

    #[test]
    fn test_from_artifacts_keeps_variant_order() {
        let record = UploadRecord::from_artifacts(
            Some("owner".to_string()),
            artifact("s-original", "photo.jpg"),
            vec![
                ("small".to_string(), artifact("s-small", "small.jpg")),
                ("tiny".to_string(), artifact("s-tiny", "tiny.jpg")),
            ],
        );

        assert_eq!(record.name, "photo.jpg");
        assert_eq!(record.storage_name, "s-original");
        assert_eq!(record.storage_names(), vec!["s-original", "s-small", "s-tiny"]);
        assert_eq!(record.variant("tiny").unwrap().storage_name, "s-tiny");
        assert!(record.variant("unknown").is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = UploadRecord::from_artifacts(None, artifact("abc", "a.jpg"), vec![]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["storageName"], "abc");
        assert!(json["ownerId"].is_null());
        assert!(json["variants"].as_array().unwrap().is_empty());
    }
}
