use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("key collision")]
    Collision,
    #[error("other: {0}")]
    Other(String),
}

/// External object storage for normalized complaint images. Writes are
/// non-overwriting: a key collision is a failure, not an upsert.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `name` (below the store's logical prefix) and return
    /// the publicly resolvable URL.
    async fn put(&self, name: &str, mime: &str, bytes: &[u8]) -> Result<String, ObjectStoreError>;
    /// Remove a stored object. A missing object is treated as already deleted.
    async fn delete(&self, name: &str) -> Result<(), ObjectStoreError>;
    /// Recover the object name from a URL this store produced earlier.
    fn name_from_url(&self, url: &str) -> Option<String>;
}

// ---------------- S3 implementation (MinIO compatible) ----------------
pub struct S3ObjectStore {
    bucket: String,
    client: aws_sdk_s3::Client,
    prefix: String,
    public_base: String,
}

impl S3ObjectStore {
    pub async fn new() -> anyhow::Result<Self> {
        use aws_credential_types::provider::SharedCredentialsProvider;
        use aws_credential_types::Credentials;

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "complaint-images".into());
        let endpoint = std::env::var("S3_ENDPOINT")
            .map_err(|_| anyhow::anyhow!("S3_ENDPOINT must be set (MinIO / S3 endpoint)"))?;
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into());
        let access = std::env::var("S3_ACCESS_KEY").unwrap_or_default();
        let secret = std::env::var("S3_SECRET_KEY").unwrap_or_default();
        // Where clients can fetch stored objects from; defaults to path-style
        // access through the same endpoint.
        let public_base = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region));
        loader = loader.endpoint_url(endpoint);
        if !access.is_empty() && !secret.is_empty() {
            let creds = Credentials::new(access, secret, None, None, "static");
            loader = loader.credentials_provider(SharedCredentialsProvider::new(creds));
        }
        let conf = loader.load().await;
        // Path-style addressing, required for most MinIO/local endpoints.
        let s3_conf = aws_sdk_s3::config::Builder::from(&conf)
            .force_path_style(true)
            .build();
        let client = aws_sdk_s3::Client::from_conf(s3_conf);
        info!("initialized S3/MinIO client (path-style addressing)");

        if client.head_bucket().bucket(&bucket).send().await.is_err() {
            match client.create_bucket().bucket(&bucket).send().await {
                Ok(_) => info!("created bucket '{bucket}'"),
                Err(e) => {
                    error!("create_bucket failed for '{bucket}': {e:?}");
                    return Err(anyhow::anyhow!("failed to ensure bucket '{bucket}': {e}"));
                }
            }
        }

        Ok(Self {
            bucket,
            client,
            prefix: "complaints".into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    fn key_for(&self, name: &str) -> String {
        format!("{}/{}", self.prefix, name)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, name: &str, mime: &str, bytes: &[u8]) -> Result<String, ObjectStoreError> {
        use aws_sdk_s3::primitives::ByteStream;
        let key = self.key_for(name);
        // Names are random UUIDs, so an existing key means something is wrong;
        // refuse to overwrite.
        if self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .is_ok()
        {
            return Err(ObjectStoreError::Collision);
        }
        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(mime);
        if let Err(e) = put.send().await {
            error!("put_object failed key={key} bucket={}: {e:?}", self.bucket);
            let hint = if e.to_string().contains("AccessDenied") {
                " (check S3_ACCESS_KEY/S3_SECRET_KEY permissions)"
            } else {
                ""
            };
            return Err(ObjectStoreError::Other(format!("{e}{hint}")));
        }
        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn delete(&self, name: &str) -> Result<(), ObjectStoreError> {
        let key = self.key_for(name);
        if let Err(e) = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            warn!("delete_object failed key={key}: {e:?}");
            return Err(ObjectStoreError::Other(e.to_string()));
        }
        Ok(())
    }

    fn name_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/{}/", self.public_base, self.prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_owned)
    }
}

/// Build the object store used in production; misconfiguration is fatal at
/// startup, matching the required-env contract.
pub async fn build_object_store() -> Arc<dyn ObjectStore> {
    match S3ObjectStore::new().await {
        Ok(store) => Arc::new(store),
        Err(e) => panic!("failed to initialize S3 object store: {e}"),
    }
}
