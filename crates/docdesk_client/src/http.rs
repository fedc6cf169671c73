use std::sync::Arc;

use bytes::Bytes;
use docdesk_core::{Document, QueryResponse, UploadReceipt};
use docdesk_logging::{docs_debug, docs_trace};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    percent_of, ApiError, ClientSettings, DocumentApi, FailureKind, HealthStatus, ProgressSink,
    QueryRequest, SummaryResponse, UploadFile,
};

/// `DocumentApi` over the service's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpDocumentApi {
    settings: ClientSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl HttpDocumentApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot carry a path", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn documents_endpoint(&self, tail: &[&str]) -> Url {
        let mut segments = vec!["api", "v1", "documents"];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    fn check_upload(&self, file: &UploadFile) -> Result<(), ApiError> {
        if !self.settings.is_extension_allowed(&file.filename) {
            return Err(ApiError::new(
                FailureKind::UnsupportedFileType {
                    filename: file.filename.clone(),
                },
                "file type not accepted by the service",
            ));
        }
        if file.size() > self.settings.max_upload_bytes {
            return Err(ApiError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_upload_bytes,
                    actual: file.size(),
                },
                "file too large",
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentApi for HttpDocumentApi {
    /// Pages through `skip`/`limit` until the service returns a short page.
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let limit = self.settings.list_limit.max(1);
        let mut documents: Vec<Document> = Vec::new();
        loop {
            let mut url = self.documents_endpoint(&[]);
            url.query_pairs_mut()
                .append_pair("skip", &documents.len().to_string())
                .append_pair("limit", &limit.to_string());
            let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
            let page: Vec<Document> = read_json(response).await?;
            let page_len = page.len();
            documents.extend(page);
            if page_len < limit as usize {
                return Ok(documents);
            }
            docs_trace!("listed {} documents so far", documents.len());
        }
    }

    async fn upload_document(
        &self,
        file: UploadFile,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<UploadReceipt, ApiError> {
        self.check_upload(&file)?;
        let total = file.size();
        let mime = if file.filename.to_ascii_lowercase().ends_with(".pdf") {
            "application/pdf"
        } else {
            "application/octet-stream"
        };
        let body = progress_body(file.content, self.settings.upload_chunk_bytes, progress);
        let part = Part::stream_with_length(body, total)
            .file_name(file.filename.clone())
            .mime_str(mime)
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        docs_debug!("uploading {} ({} bytes)", file.filename, total);

        let response = self
            .client
            .post(self.documents_endpoint(&["upload"]))
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, ApiError> {
        let response = self
            .client
            .get(self.documents_endpoint(&[document_id]))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn query_document(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let response = self
            .client
            .post(self.documents_endpoint(&[request.document_id.as_str(), "query"]))
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn generate_summary(&self, document_id: &str) -> Result<SummaryResponse, ApiError> {
        let response = self
            .client
            .post(self.documents_endpoint(&[document_id, "summary"]))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.documents_endpoint(&[document_id]))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await.map(|_| ())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&[]))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

/// Streams `content` in chunks, reporting how much has been handed to the transport.
fn progress_body(
    content: Bytes,
    chunk_bytes: usize,
    sink: Arc<dyn ProgressSink>,
) -> reqwest::Body {
    let total = content.len();
    let step = chunk_bytes.max(1);
    let chunks: Vec<Bytes> = (0..total)
        .step_by(step)
        .map(|start| content.slice(start..(start + step).min(total)))
        .collect();

    let mut sent = 0u64;
    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        sink.emit(percent_of(sent, total as u64));
        Ok::<Bytes, std::io::Error>(chunk)
    });
    reqwest::Body::wrap_stream(stream)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    docs_trace!("error body for {}: {}", status, body);
    Err(ApiError::new(
        FailureKind::HttpStatus(status.as_u16()),
        error_detail(&body).unwrap_or_else(|| status.to_string()),
    ))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

/// The service reports errors as `{"detail": ...}`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
