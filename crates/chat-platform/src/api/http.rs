//! REST adapter for the chat backend.
//!
//! Uses browser `fetch()` via gloo-net. Every request carries the
//! configured bearer token. Only requests with a JSON body send a content
//! type; bodyless GETs stay simple requests, and the multipart upload
//! leaves it to the browser so the boundary is filled in.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

use chat_core::ports::{ChatBackendPort, CompletionRequest, CompletionStream, LibraryPort};
use chat_types::{
    ChatError, Result,
    config::ClientConfig,
    conversation::{ConversationId, ConversationSummary},
    library::{Candidate, CandidateFilter, FileUpload, Template, TemplateFilter, UploadDescriptor},
    message::{Message, PersistRequest},
};

use super::event_source;

/// Backend reached over HTTP, plus the server-push completion channel.
pub struct HttpBackend {
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.bearer() {
            Some(bearer) => builder.header("Authorization", &bearer),
            None => builder,
        }
    }

    /// Authorized GET for `path`. No content type: there is no body.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::get(&self.config.endpoint(path)))
    }

    /// Authorized POST for `path`; the body decides the content type.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::post(&self.config.endpoint(path)))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let response = ensure_ok(response).await?;
        response
            .json()
            .await
            .map_err(|e| ChatError::Serialization(e.to_string()))
    }
}

/// Turn a non-2xx response into `ChatError::Http`
async fn ensure_ok(response: Response) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(ChatError::Http { status, body })
}

fn with_query(builder: RequestBuilder, pairs: &[(&'static str, String)]) -> RequestBuilder {
    builder.query(pairs.iter().map(|(key, value)| (*key, value.as_str())))
}

fn js_error(context: &str, e: JsValue) -> ChatError {
    ChatError::JsInterop(format!("{}: {:?}", context, e))
}

fn multipart(upload: &FileUpload) -> Result<FormData> {
    let form = FormData::new().map_err(|e| js_error("FormData", e))?;

    let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&bytes);
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(|e| js_error("Blob", e))?;

    form.append_with_blob_and_filename("file", &blob, &upload.file_name)
        .map_err(|e| js_error("FormData.append(file)", e))?;
    form.append_with_str("type", upload.kind.as_str())
        .map_err(|e| js_error("FormData.append(type)", e))?;
    Ok(form)
}

#[async_trait(?Send)]
impl ChatBackendPort for HttpBackend {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        self.fetch_json(self.get("conversations")).await
    }

    async fn get_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        self.fetch_json(self.get(&format!("messages/{}", conversation_id)))
            .await
    }

    async fn persist_message(&self, conversation_id: &ConversationId, message: &Message) -> Result<()> {
        let body = PersistRequest {
            conversation_id,
            message,
        };
        let response = self
            .post("chat/send")
            .json(&body)
            .map_err(|e| ChatError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        // the ack body is unused
        ensure_ok(response).await.map(|_| ())
    }

    fn open_completion(&self, req: CompletionRequest) -> Result<CompletionStream> {
        let url = event_source::completion_url(&self.config, &req)?;
        log::debug!("Opening completion channel for {}", req.conversation_id);
        event_source::open(&url)
    }
}

#[async_trait(?Send)]
impl LibraryPort for HttpBackend {
    async fn upload_file(&self, upload: FileUpload) -> Result<UploadDescriptor> {
        let form = multipart(&upload)?;
        let request = self
            .post("upload")
            .body(form)
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let descriptor: UploadDescriptor = ensure_ok(response)
            .await?
            .json()
            .await
            .map_err(|e| ChatError::Serialization(e.to_string()))?;
        log::info!(
            "Uploaded {} as {} ({})",
            upload.file_name,
            upload.kind.as_str(),
            descriptor.id
        );
        Ok(descriptor)
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> Result<Vec<Template>> {
        let pairs = filter.query_pairs();
        self.fetch_json(with_query(self.get("templates"), &pairs))
            .await
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let pairs = filter.query_pairs();
        self.fetch_json(with_query(self.get("candidates"), &pairs))
            .await
    }
}
