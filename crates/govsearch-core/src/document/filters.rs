//! Structured result filters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Chamber, Document, DocumentType};

/// Optional restrictions applied to the corpus before any strategy runs
///
/// Every populated field must match. Date bounds are inclusive and compare
/// against `introduced_date`; a document without one fails any date bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchFilters {
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of the sponsor name
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub chamber: Option<Chamber>,
}

impl SearchFilters {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.document_type.is_none()
            && self.status.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.sponsor.is_none()
            && self.chamber.is_none()
    }

    /// Whether a document passes every populated filter
    pub fn matches(&self, doc: &Document) -> bool {
        if self.document_type.is_some_and(|t| t != doc.document_type) {
            return false;
        }

        if let Some(status) = &self.status {
            match &doc.status {
                Some(s) if s.eq_ignore_ascii_case(status) => {}
                _ => return false,
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(introduced) = doc.introduced_date else {
                return false;
            };
            if self.date_from.is_some_and(|from| introduced < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| introduced > to) {
                return false;
            }
        }

        if let Some(sponsor) = &self.sponsor {
            let needle = sponsor.to_lowercase();
            match doc.sponsor_name() {
                Some(name) if name.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        if self.chamber.is_some() && doc.chamber != self.chamber {
            return false;
        }

        true
    }
}
