//! Object storage for raw CVs and their derived analysis documents.
//!
//! Layout:
//!   resumes/{user_id}/{base}.{ext}         raw upload
//!   resumes/{user_id}/{base}-json.json     derived analysis

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of '{key}' failed: {message}")]
    Put { key: String, message: String },

    #[error("download of '{key}' failed: {message}")]
    Get { key: String, message: String },
}

/// Minimal object-store surface the pipeline needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str)
        -> Result<(), StorageError>;

    /// Reads the object under `key`. `Ok(None)` means it is not (yet) visible.
    async fn get_object(&self, key: &str) -> Result<Option<Bytes>, StorageError>;

    /// Public URL under which `key` is readable once written.
    fn public_url(&self, key: &str) -> String;
}

/// Storage keys derived from one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvPaths {
    pub raw_key: String,
    pub json_key: String,
}

impl CvPaths {
    /// Derives both keys from the user id and the uploaded file name.
    /// Directory components of `file_name` are ignored; the extension is lowercased.
    pub fn derive(user_id: Uuid, file_name: &str) -> Option<Self> {
        let (base, ext) = split_file_name(file_name)?;
        Some(Self {
            raw_key: format!("resumes/{user_id}/{base}.{}", ext.to_ascii_lowercase()),
            json_key: analysis_key(user_id, base),
        })
    }
}

/// Key of the derived analysis document for an uploaded base name.
pub fn analysis_key(user_id: Uuid, base_name: &str) -> String {
    format!("resumes/{user_id}/{base_name}-json.json")
}

/// Splits `dir/My CV.final.PDF` into `("My CV.final", "PDF")`.
pub fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let (base, ext) = name.rsplit_once('.')?;
    if base.is_empty() || ext.is_empty() {
        return None;
    }
    Some((base, ext))
}

/// S3-compatible store (MinIO locally, any S3 API in production).
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if not_found {
                    return Ok(None);
                }
                return Err(StorageError::Get {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Get {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(data.into_bytes()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Uuid {
        Uuid::parse_str("6f1c2b8e-0000-4000-8000-000000000001").unwrap()
    }

    #[test]
    fn test_derive_paths_from_base_name() {
        let paths = CvPaths::derive(user(), "Jane Doe CV.pdf").unwrap();
        assert_eq!(
            paths.raw_key,
            "resumes/6f1c2b8e-0000-4000-8000-000000000001/Jane Doe CV.pdf"
        );
        assert_eq!(
            paths.json_key,
            "resumes/6f1c2b8e-0000-4000-8000-000000000001/Jane Doe CV-json.json"
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(
            CvPaths::derive(user(), "cv.docx"),
            CvPaths::derive(user(), "cv.docx")
        );
    }

    #[test]
    fn test_derive_strips_directories_and_lowercases_extension() {
        let paths = CvPaths::derive(user(), "C:\\Users\\me\\resume.v2.DOCX").unwrap();
        assert!(paths.raw_key.ends_with("/resume.v2.docx"));
        assert!(paths.json_key.ends_with("/resume.v2-json.json"));
    }

    #[test]
    fn test_split_rejects_missing_parts() {
        assert_eq!(split_file_name("noextension"), None);
        assert_eq!(split_file_name(".pdf"), None);
        assert_eq!(split_file_name("resume."), None);
    }

    #[tokio::test]
    async fn test_memory_store_hides_until_visible() {
        let store = testing::MemoryStore::visible_after(2);
        store
            .put_object("k", Bytes::from_static(b"v"), "text/plain")
            .await
            .unwrap();
        assert!(store.get_object("k").await.unwrap().is_none());
        assert!(store.get_object("k").await.unwrap().is_none());
        assert_eq!(
            store.get_object("k").await.unwrap(),
            Some(Bytes::from_static(b"v"))
        );
    }
}
