//! CV upload pipeline: validate → store raw → extract → LLM → parse → store analysis.

use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::analysis::{parse_cv_analysis, CvAnalysis};
use crate::cv::extract::{extract_text, CvFormat};
use crate::cv::prompts::{build_cv_extract_prompt, cv_extract_system};
use crate::errors::AppError;
use crate::llm_client::{ChatModel, ChatRequest};
use crate::mbti::normalize_type_code;
use crate::storage::{split_file_name, CvPaths, ObjectStore};

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: Uuid,
    pub file_name: String,
    pub bytes: Bytes,
    pub location: Option<String>,
    pub mbti: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub paths: CvPaths,
    /// Public URL of the derived analysis document.
    pub public_url: String,
    pub analysis: CvAnalysis,
}

/// Input checks that must pass before anything touches storage or the LLM.
struct ValidatedUpload {
    format: CvFormat,
    paths: CvPaths,
    location: Option<String>,
    mbti: Option<String>,
}

fn validate(request: &UploadRequest) -> Result<ValidatedUpload, AppError> {
    let (_, ext) = split_file_name(&request.file_name).ok_or_else(|| {
        AppError::validation(format!(
            "'{}' has no file extension; upload a PDF or DOCX file",
            request.file_name
        ))
    })?;

    let format = CvFormat::from_extension(ext).ok_or_else(|| {
        AppError::validation(format!(
            "Unsupported file type '.{ext}'; only PDF and DOCX are accepted"
        ))
    })?;

    let paths = CvPaths::derive(request.user_id, &request.file_name)
        .ok_or_else(|| AppError::validation("Invalid file name"))?;

    if request.bytes.is_empty() {
        return Err(AppError::validation("Uploaded file is empty"));
    }

    let mbti = match request.mbti.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => Some(normalize_type_code(raw).ok_or_else(|| {
            AppError::validation(format!("'{raw}' is not a valid MBTI type"))
        })?),
        None => None,
    };

    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    Ok(ValidatedUpload {
        format,
        paths,
        location,
        mbti,
    })
}

/// Runs the full upload pipeline for one file.
///
/// The extraction call is made exactly once; a failed or non-JSON reply fails the
/// upload rather than being retried.
pub async fn process_upload(
    store: &dyn ObjectStore,
    llm: &dyn ChatModel,
    request: UploadRequest,
) -> Result<UploadOutcome, AppError> {
    let upload = validate(&request)?;

    store
        .put_object(
            &upload.paths.raw_key,
            request.bytes.clone(),
            upload.format.content_type(),
        )
        .await?;

    let text = extract_text(upload.format, request.bytes)
        .await
        .map_err(|e| {
            warn!(user_id = %request.user_id, "Text extraction failed: {e:#}");
            AppError::validation(format!("Could not read text from '{}'", request.file_name))
        })?;

    if text.trim().is_empty() {
        return Err(AppError::validation(
            "No text could be extracted from the file",
        ));
    }

    info!(
        user_id = %request.user_id,
        chars = text.len(),
        "Extracted CV text, requesting analysis"
    );

    let system = cv_extract_system();
    let prompt = build_cv_extract_prompt(&text);
    let reply = llm
        .complete(ChatRequest::new(&system, &prompt).without_retries())
        .await?;

    let mut analysis = parse_cv_analysis(&reply)?;
    analysis.merge_user_fields(upload.location, upload.mbti);

    let body = serde_json::to_vec_pretty(&analysis).context("failed to serialize CV analysis")?;
    store
        .put_object(&upload.paths.json_key, Bytes::from(body), "application/json")
        .await?;

    info!(
        user_id = %request.user_id,
        key = %upload.paths.json_key,
        skills = analysis.skills.len(),
        "Stored CV analysis"
    );

    Ok(UploadOutcome {
        public_url: store.public_url(&upload.paths.json_key),
        paths: upload.paths,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::extract::testing::docx_from_lines;
    use crate::llm_client::testing::ScriptedModel;
    use crate::storage::testing::MemoryStore;

    const ANALYSIS_REPLY: &str = r#"```json
{"name": "Ana Putri", "location": "Bandung", "skills": ["Python", "SQL"], "years_of_experience": 2}
```"#;

    fn user() -> Uuid {
        Uuid::parse_str("0b7d1c7a-5b3e-4c1e-9f00-00000000abcd").unwrap()
    }

    fn request(file_name: &str, bytes: Vec<u8>) -> UploadRequest {
        UploadRequest {
            user_id: user(),
            file_name: file_name.to_string(),
            bytes: Bytes::from(bytes),
            location: None,
            mbti: None,
        }
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_any_call() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::replying(ANALYSIS_REPLY);

        let err = process_upload(&store, &llm, request("notes.txt", b"hello".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.puts(), 0);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_mbti_rejected_before_any_call() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::replying(ANALYSIS_REPLY);
        let mut req = request("cv.docx", docx_from_lines(&["Ana"]));
        req.mbti = Some("XYZW".to_string());

        let err = process_upload(&store, &llm, req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.puts(), 0);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_docx_upload_stores_raw_and_merged_analysis() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::replying(ANALYSIS_REPLY);
        let mut req = request(
            "Ana Putri CV.DOCX",
            docx_from_lines(&["Ana Putri", "Data Analyst", "Python, SQL"]),
        );
        req.location = Some(" Jakarta ".to_string());
        req.mbti = Some("intj".to_string());

        let outcome = process_upload(&store, &llm, req).await.unwrap();

        let prefix = format!("resumes/{}", user());
        assert_eq!(outcome.paths.raw_key, format!("{prefix}/Ana Putri CV.docx"));
        assert_eq!(
            outcome.paths.json_key,
            format!("{prefix}/Ana Putri CV-json.json")
        );
        assert_eq!(
            outcome.public_url,
            format!("memory://{prefix}/Ana Putri CV-json.json")
        );

        assert_eq!(store.puts(), 2);
        assert_eq!(llm.calls(), 1);
        assert!(llm.last_prompt().unwrap().contains("Data Analyst"));
        assert_eq!(
            store.content_type(&outcome.paths.json_key).as_deref(),
            Some("application/json")
        );

        let stored: CvAnalysis =
            serde_json::from_slice(&store.raw(&outcome.paths.json_key).unwrap()).unwrap();
        assert_eq!(stored, outcome.analysis);
        assert_eq!(stored.location.as_deref(), Some("Jakarta"));
        assert_eq!(stored.mbti.as_deref(), Some("INTJ"));
        assert_eq!(stored.skills, vec!["Python", "SQL"]);
    }

    #[tokio::test]
    async fn test_model_nulls_and_mbti_variant_normalized_before_storing() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::replying(
            r#"{"name": "Ana", "mbti": "INTJ-A", "skills": ["SQL"], "soft_skills": null, "education": null}"#,
        );

        let outcome = process_upload(&store, &llm, request("cv.docx", docx_from_lines(&["Ana"])))
            .await
            .unwrap();

        let stored: CvAnalysis =
            serde_json::from_slice(&store.raw(&outcome.paths.json_key).unwrap()).unwrap();
        assert!(stored.mbti.is_none());
        assert!(stored.soft_skills.is_empty());
        assert_eq!(stored.skills, vec!["SQL"]);
    }

    #[tokio::test]
    async fn test_llm_failure_is_not_retried() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::failing();

        let err = process_upload(&store, &llm, request("cv.docx", docx_from_lines(&["Ana"])))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm { .. }));
        assert_eq!(llm.calls(), 1);
        // Only the raw file was written.
        assert_eq!(store.puts(), 1);
    }

    #[tokio::test]
    async fn test_non_json_reply_surfaces_raw_text() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::replying("Sorry, I can't help with that.");

        let err = process_upload(&store, &llm, request("cv.docx", docx_from_lines(&["Ana"])))
            .await
            .unwrap_err();

        match err {
            AppError::Parse { raw, .. } => assert!(raw.contains("can't help")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_document_without_text_rejected() {
        let store = MemoryStore::new();
        let llm = ScriptedModel::replying(ANALYSIS_REPLY);

        let err = process_upload(&store, &llm, request("blank.docx", docx_from_lines(&[])))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.calls(), 0);
    }
}
