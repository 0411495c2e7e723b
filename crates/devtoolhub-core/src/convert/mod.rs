//! PDF to DOCX conversion through a CloudConvert-style job API.
//!
//! A conversion creates a three-task job (upload import, docx convert, URL
//! export), uploads the PDF to the form the import task hands back, then
//! polls the job on a fixed interval until the export task exposes a
//! download URL, the job reports an error, or the attempt budget runs out.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::auth::parse_api_error;
use crate::util::is_http_url;

pub const MAX_PDF_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

const PDF_MAGIC: &[u8] = b"%PDF-";
const IMPORT_UPLOAD: &str = "import/upload";
const EXPORT_URL: &str = "export/url";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Conversion API key is not configured (set CLOUDCONVERT_API_KEY)")]
    MissingApiKey,
    #[error("Invalid conversion configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Invalid input file: {0}")]
    InvalidInput(String),
    #[error("File is too large ({size} bytes, limit is 50 MiB)")]
    TooLarge { size: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Conversion API error: {0}")]
    Api(String),
    #[error("Conversion job is missing its {0} task")]
    MissingTask(&'static str),
    #[error("Conversion failed: {0}")]
    Failed(String),
    #[error("Conversion timed out after {attempts} status checks")]
    TimedOut { attempts: u32 },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// A validated PDF ready for upload.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    file_name: String,
    bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> ConvertResult<Self> {
        let file_name = file_name.into();
        if !file_name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(ConvertError::InvalidInput(format!(
                "'{file_name}' does not have a .pdf extension"
            )));
        }
        check_size(bytes.len() as u64)?;
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ConvertError::InvalidInput(format!(
                "'{file_name}' is not a PDF document"
            )));
        }
        Ok(Self { file_name, bytes })
    }

    /// Read a PDF from disk, refusing oversized files before loading them.
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        check_size(std::fs::metadata(path)?.len())?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ConvertError::InvalidInput("path has no file name".to_string()))?;
        Self::new(file_name, std::fs::read(path)?)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File name with the extension swapped to `.docx`.
    pub fn docx_name(&self) -> String {
        let stem = &self.file_name[..self.file_name.len() - ".pdf".len()];
        format!("{stem}.docx")
    }
}

fn check_size(size: u64) -> ConvertResult<()> {
    if size == 0 {
        return Err(ConvertError::InvalidInput("file is empty".to_string()));
    }
    if size > MAX_PDF_BYTES {
        return Err(ConvertError::TooLarge { size });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub job_id: String,
    pub download_url: String,
}

#[derive(Clone)]
pub struct ConvertClient {
    api_url: String,
    api_key: String,
    poll_interval: Duration,
    max_attempts: u32,
    client: Client,
}

impl ConvertClient {
    pub fn new(api_url: impl AsRef<str>, api_key: impl Into<String>) -> ConvertResult<Self> {
        let api_url = api_url.as_ref().trim().trim_end_matches('/').to_string();
        if !is_http_url(&api_url) {
            return Err(ConvertError::InvalidConfiguration(
                "conversion API URL must include http:// or https://",
            ));
        }
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConvertError::MissingApiKey);
        }

        Ok(Self {
            api_url,
            api_key,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            client: Client::builder().build()?,
        })
    }

    #[must_use]
    pub const fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_attempts = max_attempts;
        self
    }

    pub async fn pdf_to_docx(&self, document: &PdfDocument) -> ConvertResult<Conversion> {
        let job = self.create_job().await?;
        tracing::debug!(job_id = %job.id, "Created conversion job");

        let form = job
            .task(IMPORT_UPLOAD)
            .and_then(|task| task.result.as_ref())
            .and_then(|result| result.form.as_ref())
            .ok_or(ConvertError::MissingTask(IMPORT_UPLOAD))?;
        self.upload(form, document).await?;
        tracing::debug!(job_id = %job.id, bytes = document.len(), "Uploaded PDF");

        let download_url = self.wait_for_export(&job.id).await?;
        tracing::info!(job_id = %job.id, "Conversion finished");
        Ok(Conversion {
            job_id: job.id,
            download_url,
        })
    }

    async fn create_job(&self) -> ConvertResult<Job> {
        let response = self
            .client
            .post(format!("{}/jobs", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "tasks": {
                    "import-1": { "operation": IMPORT_UPLOAD },
                    "convert-1": {
                        "operation": "convert",
                        "input": "import-1",
                        "output_format": "docx",
                        "engine": "libreoffice",
                    },
                    "export-1": { "operation": EXPORT_URL, "input": "convert-1" },
                }
            }))
            .send()
            .await?;
        let envelope: JobEnvelope = check(response).await?.json().await?;
        Ok(envelope.into_job())
    }

    async fn upload(&self, form: &UploadForm, document: &PdfDocument) -> ConvertResult<()> {
        let mut body = Form::new();
        for (key, value) in &form.parameters {
            let value = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            body = body.text(key.clone(), value);
        }
        let file = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str("application/pdf")?;
        body = body.part("file", file);

        let response = self.client.post(&form.url).multipart(body).send().await?;
        check(response).await.map(drop)
    }

    async fn wait_for_export(&self, job_id: &str) -> ConvertResult<String> {
        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(format!("{}/jobs/{job_id}", self.api_url))
                .bearer_auth(&self.api_key)
                .send()
                .await?;
            let job = check(response).await?.json::<JobEnvelope>().await?.into_job();
            tracing::debug!(job_id, attempt, status = %job.status, "Polled conversion job");

            match job.status.as_str() {
                "finished" => {
                    if let Some(url) = job.download_url() {
                        return Ok(url);
                    }
                }
                "error" => {
                    let message = job
                        .tasks
                        .iter()
                        .find(|task| task.status == "error")
                        .and_then(|task| task.message.clone())
                        .unwrap_or_else(|| "conversion job reported an error".to_string());
                    return Err(ConvertError::Failed(message));
                }
                _ => {}
            }
        }

        Err(ConvertError::TimedOut {
            attempts: self.max_attempts,
        })
    }
}

async fn check(response: Response) -> ConvertResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ConvertError::Api(parse_api_error(status, &body)))
}

/// Job payloads arrive either bare or wrapped in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum JobEnvelope {
    Wrapped { data: Job },
    Bare(Job),
}

impl JobEnvelope {
    fn into_job(self) -> Job {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Job {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Job {
    fn task(&self, operation: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.operation == operation)
    }

    fn download_url(&self) -> Option<String> {
        self.tasks
            .iter()
            .find(|task| task.operation == EXPORT_URL && task.status == "finished")
            .and_then(|task| task.result.as_ref())
            .and_then(|result| result.files.first())
            .map(|file| file.url.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Task {
    #[serde(default)]
    operation: String,
    #[serde(default)]
    status: String,
    message: Option<String>,
    result: Option<TaskResult>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    form: Option<UploadForm>,
    #[serde(default)]
    files: Vec<ExportedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadForm {
    url: String,
    #[serde(default)]
    parameters: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ExportedFile {
    url: String,
}
