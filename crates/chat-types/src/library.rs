//! Uploaded documents and the template / candidate libraries they feed.
//! These sit beside the conversation core: an upload yields an id that a
//! later send references through `SendMetadata`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What an uploaded file is used as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Resume,
    Template,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Resume => "resume",
            UploadKind::Template => "template",
        }
    }
}

/// A file selected by the user, ready to be sent as multipart form data
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub kind: UploadKind,
}

/// Backend acknowledgement of an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// References carried alongside a user message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl SendMetadata {
    pub fn is_empty(&self) -> bool {
        self.resume_id.is_none() && self.template_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFilter {
    pub active_only: bool,
    pub limit: u32,
    pub offset: u32,
    pub job_title: Option<String>,
}

impl Default for TemplateFilter {
    fn default() -> Self {
        Self {
            active_only: true,
            limit: 50,
            offset: 0,
            job_title: None,
        }
    }
}

impl TemplateFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("active_only", self.active_only.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(ref title) = self.job_title {
            pairs.push(("job_title", title.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFilter {
    pub limit: u32,
    pub offset: u32,
    pub search: Option<String>,
    pub skills: Option<String>,
    pub min_experience: Option<u32>,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            search: None,
            skills: None,
            min_experience: None,
        }
    }
}

impl CandidateFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref skills) = self.skills {
            pairs.push(("skills", skills.clone()));
        }
        // zero means "no minimum"
        if let Some(years) = self.min_experience.filter(|y| *y > 0) {
            pairs.push(("min_experience", years.to_string()));
        }
        pairs
    }
}

/// A job-description template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A candidate profile with a stored resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
