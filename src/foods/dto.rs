use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::FoodError;
use crate::foods::expiry::{Classification, ExpiryStatus};
use crate::foods::repo_types::FoodRecord;
use crate::foods::services::{FreshnessCounts, Summary};

/// Listing as fetched from the food API, plus an optional reference instant.
#[derive(Debug, Deserialize)]
pub struct FoodsRequest {
    pub foods: Vec<FoodRecord>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub now: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct FoodRequest {
    pub food: FoodRecord,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub now: Option<OffsetDateTime>,
}

/// Classification fields attached to a record; `error` is set instead when
/// the expiry date could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<ExpiryStatus, FoodError>> for ExpiryView {
    fn from(status: &Result<ExpiryStatus, FoodError>) -> Self {
        match status {
            Ok(s) => Self {
                classification: Some(s.classification),
                days_until_expiry: Some(s.days_until_expiry),
                label: Some(s.label()),
                error: None,
            },
            Err(e) => Self {
                classification: None,
                days_until_expiry: None,
                label: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl From<ExpiryStatus> for ExpiryView {
    fn from(status: ExpiryStatus) -> Self {
        Self::from(&Ok::<_, FoodError>(status))
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyItem {
    pub id: String,
    #[serde(flatten)]
    pub expiry: ExpiryView,
}

#[derive(Debug, Serialize)]
pub struct ClassifiedFoodResponse {
    #[serde(flatten)]
    pub food: FoodRecord,
    #[serde(flatten)]
    pub expiry: ExpiryView,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SummaryResponse {
    /// Every record received, classifiable or not.
    pub records: usize,
    #[serde(flatten)]
    pub counts: FreshnessCounts,
    /// Ids of records whose expiry date could not be read.
    pub invalid: Vec<String>,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        let invalid: Vec<String> = summary
            .invalid
            .into_iter()
            .filter_map(|e| match e {
                FoodError::InvalidDate { id, .. } => Some(id),
                FoodError::InvalidArgument(_) => None,
            })
            .collect();
        Self {
            records: summary.counts.total + invalid.len(),
            counts: summary.counts,
            invalid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub owner: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct OwnerParams {
    pub owner: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub summary: SummaryResponse,
    pub recent: Vec<ClassifiedFoodResponse>,
    pub expiring_soon: Vec<ClassifiedFoodResponse>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct NotePermission {
    pub allowed: bool,
}
