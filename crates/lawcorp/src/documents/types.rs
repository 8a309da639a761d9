//! Document service wire types. camelCase on both sides.

use serde::{Deserialize, Serialize};

/// Replaces the body of a privileged document for roles that may only see
/// that it exists.
pub const REDACTED_CONTENT: &str = "[REDACTED — privileged content not available for your role]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: u64,
    pub title: String,
    pub document_type: String,
    pub status: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub case_id: Option<u64>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub is_privileged: bool,
    /// Set locally when the caller may not read the content.
    #[serde(default)]
    pub is_redacted: bool,
    pub created_date: String,
    #[serde(default)]
    pub modified_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub results: Vec<DocumentSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    pub id: u64,
    pub title: String,
    pub document_type: String,
    pub status: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub case_id: Option<u64>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub is_privileged: bool,
    #[serde(default)]
    pub is_redacted: bool,
    pub created_date: String,
    #[serde(default)]
    pub modified_date: Option<String>,
}

/// Filters sent to `GET /api/documents`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    pub query: Option<String>,
    pub document_type: Option<String>,
    pub case_id: Option<u64>,
    pub matter_number: Option<String>,
    pub status: Option<String>,
    pub author_id: Option<u64>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for DocumentQuery {
    fn default() -> Self {
        Self {
            query: None,
            document_type: None,
            case_id: None,
            matter_number: None,
            status: None,
            author_id: None,
            page: 1,
            page_size: 20,
        }
    }
}

impl DocumentQuery {
    /// Query-string pairs, skipping unset filters.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("query", &self.query),
            ("documentType", &self.document_type),
            ("matterNumber", &self.matter_number),
            ("status", &self.status),
        ];
        let mut params: Vec<(&'static str, String)> = text
            .into_iter()
            .filter_map(|(name, value)| {
                let value = value.as_deref()?.trim();
                (!value.is_empty()).then(|| (name, value.to_string()))
            })
            .collect();
        if let Some(case_id) = self.case_id {
            params.push(("caseId", case_id.to_string()));
        }
        if let Some(author_id) = self.author_id {
            params.push(("authorId", author_id.to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("pageSize", self.page_size.to_string()));
        params
    }
}
