//! Document Model
//!
//! Read-only government documents as the search engine sees them. Records
//! are produced by ingestion and never mutated during a search; sponsor
//! data always arrives in the single typed [`Sponsor`] shape.

mod filters;
mod snapshot;

pub use filters::SearchFilters;
pub use snapshot::CorpusSnapshot;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// DOCUMENT TYPE
// ============================================================================

/// Kind of government document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Congressional bill or resolution
    #[default]
    Bill,
    /// Presidential executive order
    ExecutiveOrder,
    /// Other presidential document (proclamation, memorandum)
    PresidentialDocument,
}

impl DocumentType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Bill => "bill",
            DocumentType::ExecutiveOrder => "executive_order",
            DocumentType::PresidentialDocument => "presidential_document",
        }
    }

    /// Coarse category label offered as a follow-up suggestion
    pub fn category_label(&self) -> Option<&'static str> {
        match self {
            DocumentType::Bill => Some("congressional bills"),
            DocumentType::ExecutiveOrder => Some("executive orders"),
            DocumentType::PresidentialDocument => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bill" => Ok(DocumentType::Bill),
            "executive_order" => Ok(DocumentType::ExecutiveOrder),
            "presidential_document" => Ok(DocumentType::PresidentialDocument),
            _ => Err(format!("Unknown document type: {}", s)),
        }
    }
}

// ============================================================================
// CHAMBER
// ============================================================================

/// Chamber of Congress a bill originated in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::House => "house",
            Chamber::Senate => "senate",
        }
    }
}

impl std::fmt::Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Chamber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "house" => Ok(Chamber::House),
            "senate" => Ok(Chamber::Senate),
            _ => Err(format!("Unknown chamber: {}", s)),
        }
    }
}

// ============================================================================
// SPONSOR
// ============================================================================

/// Sponsoring legislator
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Congress.gov bioguide identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bioguide_id: Option<String>,
}

impl Sponsor {
    /// Sponsor with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// A bill, executive order, or other presidential document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Stable unique id
    pub id: String,
    pub document_type: DocumentType,
    /// Structured code such as "HR-3684-117" or "EO-14001"
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chamber: Option<Chamber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduced_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<Sponsor>,
    /// Free-form metadata carried through from ingestion
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Document {
    /// Minimal document; remaining fields are filled with the `with_*` helpers
    pub fn new(
        id: impl Into<String>,
        document_type: DocumentType,
        identifier: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            document_type,
            identifier: identifier.into(),
            title: title.into(),
            summary: String::new(),
            full_text: String::new(),
            status: None,
            chamber: None,
            introduced_date: None,
            last_action_date: None,
            sponsor: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_full_text(mut self, full_text: impl Into<String>) -> Self {
        self.full_text = full_text.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_chamber(mut self, chamber: Chamber) -> Self {
        self.chamber = Some(chamber);
        self
    }

    pub fn with_introduced_date(mut self, date: NaiveDate) -> Self {
        self.introduced_date = Some(date);
        self
    }

    pub fn with_last_action_date(mut self, date: NaiveDate) -> Self {
        self.last_action_date = Some(date);
        self
    }

    pub fn with_sponsor(mut self, sponsor: Sponsor) -> Self {
        self.sponsor = Some(sponsor);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Sponsor name, if any
    pub fn sponsor_name(&self) -> Option<&str> {
        self.sponsor.as_ref().and_then(|s| s.name.as_deref())
    }
}

// ============================================================================
// TESTS
// ============================================================================
