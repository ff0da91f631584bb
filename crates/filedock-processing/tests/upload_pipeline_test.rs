use async_trait::async_trait;
use bytes::Bytes;
use filedock_core::models::{UploadRecord, UploadRequest, UploadedFile};
use filedock_core::{AcceptList, AppError, ErrorMetadata, SizeSpec, StorageBackend, UploadOptions};
use filedock_db::{InMemoryMetadataStore, MetadataStore};
use filedock_processing::{IdentityGenerator, ImageResizer, UploadPipeline};
use filedock_storage::{LocalStorage, StorageError, StorageHandler, StorageResult};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

struct Harness {
    incoming: TempDir,
    root: TempDir,
    metadata: Arc<InMemoryMetadataStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            incoming: tempfile::tempdir().unwrap(),
            root: tempfile::tempdir().unwrap(),
            metadata: Arc::new(InMemoryMetadataStore::new()),
        }
    }

    fn storage(&self) -> Arc<dyn StorageHandler> {
        Arc::new(LocalStorage::new(Some(self.root.path().to_path_buf())))
    }

    fn pipeline(&self, options: UploadOptions) -> UploadPipeline {
        UploadPipeline::new(options, self.storage(), self.metadata.clone())
    }

    async fn spool(&self, name: &str, mimetype: &str, data: &[u8]) -> UploadedFile {
        let path = self.incoming.path().join(Uuid::new_v4().simple().to_string());
        tokio::fs::write(&path, data).await.unwrap();
        UploadedFile::new(name, mimetype, data.len() as u64, path)
    }

    fn stored_count(&self) -> usize {
        std::fs::read_dir(self.root.path()).unwrap().count()
    }
}

fn pdf_options() -> UploadOptions {
    UploadOptions {
        accept: AcceptList::new(["application/pdf"]),
        max_size: Some(1_500_000),
        ..UploadOptions::default()
    }
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 120, 200])));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

#[tokio::test]
async fn test_create_fetch_delete_roundtrip() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(pdf_options());
    let file = harness.spool("report.pdf", "application/pdf", b"%PDF-1.4\n%").await;
    let transient = file.path.clone();

    let record = pipeline
        .create(UploadRequest::new(Some("account-42".to_string())).with_file("file", file))
        .await
        .unwrap();

    assert!(!record.storage_name.is_empty());
    assert_eq!(record.name, "report.pdf");
    assert_eq!(record.mimetype, "application/pdf");
    assert_eq!(record.size, 10);
    assert_eq!(record.owner_id.as_deref(), Some("account-42"));
    assert!(record.variants.is_empty());
    assert!(!transient.exists());

    let fetched = pipeline.fetch(record.id, None).await.unwrap();
    assert_eq!(fetched.data, Bytes::from_static(b"%PDF-1.4\n%"));
    assert_eq!(fetched.name, "report.pdf");
    assert_eq!(fetched.mimetype, "application/pdf");
    assert_eq!(fetched.content_disposition(), "inline");

    let deleted = pipeline.delete(record.id).await.unwrap();
    assert_eq!(deleted.id, record.id);
    assert_eq!(harness.stored_count(), 0);

    let err = pipeline.fetch(record.id, None).await.unwrap_err();
    assert_eq!(err.http_status_code(), 404);
    assert!(matches!(pipeline.delete(record.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_oversize_upload_rejected_and_removed() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(UploadOptions {
        max_size: Some(4),
        ..UploadOptions::default()
    });
    let file = harness.spool("big.bin", "application/octet-stream", b"12345").await;
    let transient = file.path.clone();

    let err = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PayloadTooLarge(_)));
    assert_eq!(err.client_message(), "Maximum allowed file size is 4");
    assert!(!transient.exists());
    assert!(harness.metadata.is_empty().await);
    assert_eq!(harness.stored_count(), 0);
}

#[tokio::test]
async fn test_disallowed_type_rejected_and_removed() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(pdf_options());
    let file = harness.spool("notes.txt", "text/plain", b"hello").await;
    let transient = file.path.clone();

    let err = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap_err();

    assert_eq!(err.http_status_code(), 415);
    assert!(err.client_message().contains("'text/plain'"));
    assert!(!transient.exists());
}

#[tokio::test]
async fn test_missing_field_rejected_and_other_files_removed() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(UploadOptions {
        file_field: "uploadfilefield".to_string(),
        ..UploadOptions::default()
    });
    let stray = harness.spool("a.pdf", "application/pdf", b"%PDF").await;
    let stray_path = stray.path.clone();

    let err = pipeline
        .create(UploadRequest::default().with_file("file", stray))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingFile(_)));
    assert_eq!(err.http_status_code(), 400);
    assert_eq!(err.client_message(), "Unable to find a file in request body");
    assert!(!stray_path.exists());
}

#[tokio::test]
async fn test_identity_variants_fetchable_and_deleted() {
    let harness = Harness::new();
    let pipeline = harness
        .pipeline(UploadOptions::default())
        .with_generator(Arc::new(IdentityGenerator::new(vec![
            "first".to_string(),
            "second".to_string(),
        ])));
    let file = harness.spool("data.bin", "application/octet-stream", b"payload").await;

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();

    assert_eq!(record.variants.len(), 2);
    assert_eq!(record.variants[0].variant_id, "first");
    assert_eq!(record.variants[1].name, "second_data.bin");
    assert_eq!(harness.stored_count(), 3);

    for variant_id in ["first", "second"] {
        let fetched = pipeline.fetch(record.id, Some(variant_id)).await.unwrap();
        assert_eq!(&fetched.data[..], b"payload");
    }
    let err = pipeline.fetch(record.id, Some("unknown")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    pipeline.delete(record.id).await.unwrap();
    assert_eq!(harness.stored_count(), 0);
    for variant_id in ["first", "second"] {
        assert!(matches!(
            pipeline.fetch(record.id, Some(variant_id)).await,
            Err(AppError::NotFound(_))
        ));
    }
}

#[tokio::test]
async fn test_image_resizer_variants() {
    let harness = Harness::new();
    let pipeline = harness
        .pipeline(UploadOptions::default())
        .with_generator(Arc::new(ImageResizer::new(vec![
            SizeSpec::new("small", 300, 300).with_format("jpeg"),
            SizeSpec::new("tiny", 50, 50).with_format("png"),
        ])));
    let file = harness.spool("photo.jpg", "image/jpeg", &jpeg_bytes(600, 400)).await;

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();

    let ids: Vec<&str> = record.variants.iter().map(|v| v.variant_id.as_str()).collect();
    assert_eq!(ids, vec!["small", "tiny"]);

    let small = pipeline.fetch(record.id, Some("small")).await.unwrap();
    assert_eq!(small.mimetype, "image/jpeg");
    assert_eq!(image::guess_format(&small.data).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&small.data).unwrap().dimensions(), (300, 200));

    let tiny = pipeline.fetch(record.id, Some("tiny")).await.unwrap();
    assert_eq!(tiny.mimetype, "image/png");
    assert_eq!(image::guess_format(&tiny.data).unwrap(), ImageFormat::Png);

    assert!(matches!(
        pipeline.fetch(record.id, Some("unknown")).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_generator_failure_degrades_to_no_variants() {
    let harness = Harness::new();
    let pipeline = harness
        .pipeline(UploadOptions::default())
        .with_generator(Arc::new(ImageResizer::new(vec![SizeSpec::new("small", 10, 10)])));
    let file = harness.spool("doc.pdf", "application/pdf", b"%PDF-1.4").await;

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();

    assert!(record.variants.is_empty());
    assert_eq!(harness.stored_count(), 1);
}

/// Local storage refusing every source outside the incoming directory.
struct OriginalOnlyStorage {
    inner: LocalStorage,
    incoming: PathBuf,
}

#[async_trait]
impl StorageHandler for OriginalOnlyStorage {
    async fn store(&self, source: &Path) -> StorageResult<String> {
        if !source.starts_with(&self.incoming) {
            return Err(StorageError::WriteFailed("backend unreachable".to_string()));
        }
        self.inner.store(source).await
    }

    async fn fetch(&self, storage_name: &str) -> StorageResult<Bytes> {
        self.inner.fetch(storage_name).await
    }

    async fn delete(&self, storage_name: &str) -> StorageResult<()> {
        self.inner.delete(storage_name).await
    }

    fn consumes_source(&self) -> bool {
        true
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[tokio::test]
async fn test_partial_store_failure_removes_stored_artifacts() {
    let harness = Harness::new();
    let storage = Arc::new(OriginalOnlyStorage {
        inner: LocalStorage::new(Some(harness.root.path().to_path_buf())),
        incoming: harness.incoming.path().to_path_buf(),
    });
    let pipeline = UploadPipeline::new(UploadOptions::default(), storage, harness.metadata.clone())
        .with_generator(Arc::new(IdentityGenerator::new(vec!["copy".to_string()])));
    let file = harness.spool("data.bin", "application/octet-stream", b"payload").await;
    let transient = file.path.clone();

    let err = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::StorageWrite(_)));
    assert_eq!(err.http_status_code(), 400);
    assert_eq!(err.client_message(), "Unable to store uploaded file");
    assert_eq!(harness.stored_count(), 0);
    assert!(!transient.exists());
    assert!(harness.metadata.is_empty().await);
}

struct RejectingMetadataStore;

#[async_trait]
impl MetadataStore for RejectingMetadataStore {
    async fn read_one(&self, _collection: &str, _id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        Ok(None)
    }

    async fn insert(&self, _collection: &str, _record: &UploadRecord) -> Result<(), AppError> {
        Err(AppError::Database("connection reset".to_string()))
    }

    async fn delete(&self, _collection: &str, _id: Uuid) -> Result<bool, AppError> {
        Ok(false)
    }
}

#[tokio::test]
async fn test_metadata_failure_removes_stored_artifacts() {
    let harness = Harness::new();
    let pipeline = UploadPipeline::new(
        UploadOptions::default(),
        harness.storage(),
        Arc::new(RejectingMetadataStore),
    )
    .with_generator(Arc::new(IdentityGenerator::new(vec!["copy".to_string()])));
    let file = harness.spool("data.bin", "application/octet-stream", b"payload").await;

    let err = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap_err();

    assert_eq!(err.http_status_code(), 500);
    assert_eq!(harness.stored_count(), 0);
}

#[tokio::test]
async fn test_delete_tolerates_already_missing_artifact() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(UploadOptions::default());
    let file = harness.spool("a.txt", "text/plain", b"abc").await;

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();
    std::fs::remove_file(harness.root.path().join(&record.storage_name)).unwrap();

    pipeline.delete(record.id).await.unwrap();
    assert!(matches!(pipeline.read(record.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_attachment_option_sets_disposition() {
    let harness = Harness::new();
    let pipeline = harness.pipeline(UploadOptions {
        attachment: true,
        ..UploadOptions::default()
    });
    let file = harness.spool("my report.pdf", "application/pdf", b"%PDF").await;

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();
    let fetched = pipeline.fetch(record.id, None).await.unwrap();

    assert_eq!(
        fetched.content_disposition(),
        "attachment; filename=\"my%20report.pdf\""
    );
    assert_eq!(fetched.cache_control(), "max-age=86400");
}

/// Remote-style handler: stores a copy and leaves the source in place.
struct CopyingStorage {
    inner: LocalStorage,
    root: PathBuf,
}

#[async_trait]
impl StorageHandler for CopyingStorage {
    async fn store(&self, source: &Path) -> StorageResult<String> {
        let storage_name = Uuid::new_v4().simple().to_string();
        tokio::fs::copy(source, self.root.join(&storage_name)).await?;
        Ok(storage_name)
    }

    async fn fetch(&self, storage_name: &str) -> StorageResult<Bytes> {
        self.inner.fetch(storage_name).await
    }

    async fn delete(&self, storage_name: &str) -> StorageResult<()> {
        self.inner.delete(storage_name).await
    }

    fn consumes_source(&self) -> bool {
        false
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Swift
    }
}

#[tokio::test]
async fn test_copying_backend_source_removed_by_pipeline() {
    let harness = Harness::new();
    let storage = Arc::new(CopyingStorage {
        inner: LocalStorage::new(Some(harness.root.path().to_path_buf())),
        root: harness.root.path().to_path_buf(),
    });
    let pipeline = UploadPipeline::new(UploadOptions::default(), storage, harness.metadata.clone());
    let file = harness.spool("data.bin", "application/octet-stream", b"payload").await;
    let transient = file.path.clone();

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();

    assert!(!transient.exists());
    assert_eq!(harness.stored_count(), 1);
    let fetched = pipeline.fetch(record.id, None).await.unwrap();
    assert_eq!(&fetched.data[..], b"payload");
}

/// Local storage whose deletes always fail.
struct UndeletableStorage {
    inner: LocalStorage,
}

#[async_trait]
impl StorageHandler for UndeletableStorage {
    async fn store(&self, source: &Path) -> StorageResult<String> {
        self.inner.store(source).await
    }

    async fn fetch(&self, storage_name: &str) -> StorageResult<Bytes> {
        self.inner.fetch(storage_name).await
    }

    async fn delete(&self, _storage_name: &str) -> StorageResult<()> {
        Err(StorageError::DeleteFailed("permission denied".to_string()))
    }

    fn consumes_source(&self) -> bool {
        true
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[tokio::test]
async fn test_storage_delete_failure_keeps_record() {
    let harness = Harness::new();
    let storage = Arc::new(UndeletableStorage {
        inner: LocalStorage::new(Some(harness.root.path().to_path_buf())),
    });
    let pipeline = UploadPipeline::new(UploadOptions::default(), storage, harness.metadata.clone());
    let file = harness.spool("a.txt", "text/plain", b"abc").await;

    let record = pipeline
        .create(UploadRequest::default().with_file("file", file))
        .await
        .unwrap();

    let err = pipeline.delete(record.id).await.unwrap_err();
    assert!(matches!(err, AppError::StorageDelete(_)));
    assert_eq!(err.http_status_code(), 400);
    assert_eq!(err.client_message(), "Unable to delete stored file");

    assert_eq!(pipeline.read(record.id).await.unwrap().id, record.id);
    assert_eq!(harness.stored_count(), 1);
}
