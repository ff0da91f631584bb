//! Upload pipeline
//!
//! Create runs verify → generate → store → persist. Artifacts are stored
//! with one concurrent call per artifact joined before the record is
//! assembled, so a record is never persisted before every artifact it
//! names is stored. Fetch and delete resolve the record first, then call
//! the storage handler per artifact.

use filedock_core::models::{FetchedFile, StoredArtifact, UploadRecord, UploadRequest, UploadedFile, Variant};
use filedock_core::{AppError, UploadOptions};
use filedock_db::MetadataStore;
use filedock_storage::{StorageError, StorageHandler};
use futures::future::join_all;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::cleanup::{remove_transient_file, run_generator_cleanup};
use super::validator::{UploadValidator, ValidationError};
use crate::generator::{GeneratedVariants, VariantGenerator};

/// Upload pipeline of one collection
#[derive(Clone)]
pub struct UploadPipeline {
    options: UploadOptions,
    storage: Arc<dyn StorageHandler>,
    generator: Option<Arc<dyn VariantGenerator>>,
    metadata: Arc<dyn MetadataStore>,
}

impl UploadPipeline {
    pub fn new(
        options: UploadOptions,
        storage: Arc<dyn StorageHandler>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            options,
            storage,
            generator: None,
            metadata,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn VariantGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    fn collection(&self) -> &str {
        &self.options.collection
    }

    /// Store an uploaded file and its variants, then persist the record.
    pub async fn create(&self, request: UploadRequest) -> Result<UploadRecord, AppError> {
        let start = std::time::Instant::now();
        let owner_id = request.owner_id.clone();

        let file = self.verify(request).await?;

        let (variants, cleanup) = self.generate_variants(&file).await.into_parts();
        let variants = unique_variants(variants);

        let stored = self.store_artifacts(&file, &variants).await;

        // A moving backend has taken the original only if every store succeeded
        if stored.is_err() || !self.storage.consumes_source() {
            remove_transient_file(&file.path).await;
        }
        run_generator_cleanup(cleanup).await;

        let (original, stored_variants) = stored?;
        let record = UploadRecord::from_artifacts(owner_id, original, stored_variants);

        if let Err(e) = self.metadata.insert(self.collection(), &record).await {
            tracing::error!(
                operation = "create",
                collection = %self.collection(),
                id = %record.id,
                error = %e,
                "Failed to persist upload record, removing stored artifacts"
            );
            let names: Vec<String> = record.storage_names().into_iter().map(String::from).collect();
            self.discard_artifacts(&names).await;
            return Err(e);
        }

        tracing::info!(
            collection = %self.collection(),
            id = %record.id,
            storage_name = %record.storage_name,
            variant_count = record.variants.len(),
            size_bytes = record.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(record)
    }

    /// Persisted record `id`.
    pub async fn read(&self, id: Uuid) -> Result<UploadRecord, AppError> {
        match self.metadata.read_one(self.collection(), id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(AppError::NotFound(format!("Upload {} not found", id))),
            Err(e) => {
                tracing::error!(
                    operation = "read",
                    collection = %self.collection(),
                    id = %id,
                    error = %e,
                    "Failed to read upload record"
                );
                Err(e)
            }
        }
    }

    /// Bytes of the original, or of variant `variant_id` when given.
    pub async fn fetch(&self, id: Uuid, variant_id: Option<&str>) -> Result<FetchedFile, AppError> {
        let record = self.read(id).await?;

        let (storage_name, name, mimetype) = match variant_id {
            None => (record.storage_name, record.name, record.mimetype),
            Some(variant_id) => {
                let variant = record.variants.into_iter().find(|v| v.variant_id == variant_id).ok_or_else(|| {
                    AppError::NotFound(format!("Variant '{}' of upload {} not found", variant_id, id))
                })?;
                (variant.storage_name, variant.name, variant.mimetype)
            }
        };

        let data = self.storage.fetch(&storage_name).await.map_err(|e| {
            tracing::error!(
                operation = "fetch",
                collection = %self.collection(),
                id = %id,
                variant_id = ?variant_id,
                storage_name = %storage_name,
                error = %e,
                "Failed to fetch stored artifact"
            );
            match e {
                StorageError::NotFound(_) => {
                    AppError::NotFound(format!("Stored file of upload {} not found", id))
                }
                StorageError::ConfigError(msg) => AppError::StorageConfig(msg),
                other => AppError::StorageRead(other.to_string()),
            }
        })?;

        Ok(FetchedFile {
            name,
            mimetype,
            data,
            attachment: self.options.attachment,
        })
    }

    /// Remove every artifact of record `id`, then the record itself.
    ///
    /// An artifact the backend reports as missing counts as removed; any
    /// other failure leaves the record in place.
    pub async fn delete(&self, id: Uuid) -> Result<UploadRecord, AppError> {
        let record = self.read(id).await?;
        let storage_names = record.storage_names();

        let results = join_all(storage_names.iter().map(|name| self.storage.delete(name))).await;

        let mut failure = None;
        for (storage_name, result) in storage_names.iter().zip(results) {
            match result {
                Ok(()) => {}
                Err(StorageError::NotFound(_)) => tracing::warn!(
                    collection = %self.collection(),
                    id = %id,
                    storage_name = %storage_name,
                    "Stored artifact already removed"
                ),
                Err(e) => {
                    tracing::error!(
                        operation = "delete",
                        collection = %self.collection(),
                        id = %id,
                        storage_name = %storage_name,
                        error = %e,
                        "Failed to delete stored artifact"
                    );
                    failure.get_or_insert(match e {
                        StorageError::ConfigError(msg) => AppError::StorageConfig(msg),
                        other => AppError::StorageDelete(other.to_string()),
                    });
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        match self.metadata.delete(self.collection(), id).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                collection = %self.collection(),
                id = %id,
                "Upload record vanished before removal"
            ),
            Err(e) => {
                tracing::error!(
                    operation = "delete",
                    collection = %self.collection(),
                    id = %id,
                    error = %e,
                    "Failed to remove upload record"
                );
                return Err(e);
            }
        }

        tracing::info!(
            collection = %self.collection(),
            id = %id,
            artifact_count = storage_names.len(),
            "Upload deleted"
        );

        Ok(record)
    }

    /// Take the configured field, discard every other file and apply the
    /// size and type policy. A rejected file is removed.
    async fn verify(&self, mut request: UploadRequest) -> Result<UploadedFile, AppError> {
        let field = self.options.file_field.as_str();
        let file = request.take_file(field);
        let other_fields: Vec<String> = request.field_names().into_iter().map(String::from).collect();

        for other in request.into_files() {
            remove_transient_file(&other.path).await;
        }

        let Some(file) = file else {
            tracing::warn!(
                operation = "create",
                collection = %self.collection(),
                field = %field,
                found = ?other_fields,
                "Unable to find a file in request body"
            );
            return Err(ValidationError::MissingFile {
                field: field.to_string(),
                found: other_fields,
            }
            .into());
        };

        if let Err(e) = UploadValidator::from_options(&self.options).validate(&file) {
            tracing::info!(
                operation = "create",
                collection = %self.collection(),
                field = %field,
                file_name = %file.name,
                mimetype = %file.mimetype,
                size_bytes = file.size,
                reason = %e,
                "Upload rejected"
            );
            remove_transient_file(&file.path).await;
            return Err(e.into());
        }

        Ok(file)
    }

    /// Generator failures degrade to zero variants.
    async fn generate_variants(&self, file: &UploadedFile) -> GeneratedVariants {
        let Some(generator) = &self.generator else {
            return GeneratedVariants::empty();
        };

        match generator.generate(file).await {
            Ok(generated) => generated,
            Err(e) => {
                tracing::warn!(
                    operation = "create",
                    collection = %self.collection(),
                    generator = %generator.kind(),
                    file_name = %file.name,
                    error = %e,
                    "Variant generation failed, continuing without variants"
                );
                GeneratedVariants::empty()
            }
        }
    }

    /// Store the original and every variant concurrently. When any store
    /// fails the others still complete, then the ones that succeeded are
    /// removed again on a best-effort basis.
    async fn store_artifacts(
        &self,
        file: &UploadedFile,
        variants: &[Variant],
    ) -> Result<(StoredArtifact, Vec<(String, StoredArtifact)>), AppError> {
        let sources: Vec<&Path> = std::iter::once(file.path.as_path())
            .chain(variants.iter().map(|v| v.path.as_path()))
            .collect();

        let results = join_all(sources.iter().map(|source| self.storage.store(source))).await;

        let mut stored_names = Vec::with_capacity(results.len());
        let mut first_error = None;
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(storage_name) => stored_names.push(storage_name),
                Err(e) => {
                    tracing::error!(
                        operation = "create",
                        collection = %self.collection(),
                        field = %self.options.file_field,
                        source = %source.display(),
                        backend = %self.storage.backend_type(),
                        error = %e,
                        "Failed to store artifact"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            self.discard_artifacts(&stored_names).await;
            return Err(AppError::StorageWrite(e.to_string()));
        }

        let mut names = stored_names.into_iter();
        let original = StoredArtifact {
            storage_name: names.next().unwrap_or_default(),
            name: file.name.clone(),
            mimetype: file.mimetype.clone(),
            size: file.size,
        };
        let stored_variants = variants
            .iter()
            .zip(names)
            .map(|(variant, storage_name)| {
                (
                    variant.variant_id.clone(),
                    StoredArtifact {
                        storage_name,
                        name: variant.name.clone(),
                        mimetype: variant.mimetype.clone(),
                        size: variant.size,
                    },
                )
            })
            .collect();

        Ok((original, stored_variants))
    }

    /// Best-effort removal of orphaned artifacts; failures are only logged.
    async fn discard_artifacts(&self, storage_names: &[String]) {
        if storage_names.is_empty() {
            return;
        }

        let results = join_all(storage_names.iter().map(|name| self.storage.delete(name))).await;
        for (storage_name, result) in storage_names.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(
                    collection = %self.collection(),
                    storage_name = %storage_name,
                    error = %e,
                    "Unable to remove orphaned artifact"
                );
            }
        }
    }
}

/// Keep the first variant of every id.
fn unique_variants(variants: Vec<Variant>) -> Vec<Variant> {
    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|variant| {
            let fresh = seen.insert(variant.variant_id.clone());
            if !fresh {
                tracing::warn!(variant_id = %variant.variant_id, "Duplicate variant id dropped");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn variant(id: &str) -> Variant {
        Variant {
            variant_id: id.to_string(),
            name: format!("{}.bin", id),
            mimetype: "application/octet-stream".to_string(),
            size: 1,
            path: PathBuf::from(format!("/tmp/{}", id)),
        }
    }

    #[test]
    fn test_unique_variants_keeps_first_occurrence_in_order() {
        let kept = unique_variants(vec![variant("a"), variant("b"), variant("a"), variant("c")]);
        let ids: Vec<&str> = kept.iter().map(|v| v.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
