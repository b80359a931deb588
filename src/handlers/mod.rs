//! Request handlers, one module per resource.

pub mod delivery;
pub mod farmers;
pub mod proof;
pub mod sales;

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Common list parameters: page/limit plus an optional `updated_at` window.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Alias for `limit` used by the delivery and invoice lists.
    #[serde(rename = "perPage")]
    pub per_page: Option<i64>,
    #[serde(rename = "updatedFrom")]
    pub updated_from: Option<String>,
    #[serde(rename = "updatedTo")]
    pub updated_to: Option<String>,
}

impl ListQuery {
    pub fn page_and_limit(&self) -> (i64, i64) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = self
            .limit
            .or(self.per_page)
            .filter(|l| *l > 0)
            .unwrap_or(10);
        (page, limit)
    }

    pub fn offset(&self) -> i64 {
        let (page, limit) = self.page_and_limit();
        (page - 1) * limit
    }

    /// Parse the `updatedFrom`/`updatedTo` bounds, rejecting malformed dates
    /// before any query runs.
    pub fn updated_range(
        &self,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AppError> {
        let from = parse_bound(self.updated_from.as_deref(), "updatedFrom")?;
        let to = parse_bound(self.updated_to.as_deref(), "updatedTo")?;
        Ok((from, to))
    }
}

fn parse_bound(raw: Option<&str>, name: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| {
                AppError::BadRequest(format!(
                    "invalid {} '{}': expected RFC 3339, e.g. 2026-01-02T15:04:05Z",
                    name, s
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_to_first_page_of_ten() {
        let q = ListQuery::default();
        assert_eq!(q.page_and_limit(), (1, 10));
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn zero_and_negative_paging_fall_back_to_defaults() {
        let q = ListQuery {
            page: Some(0),
            limit: Some(-5),
            ..Default::default()
        };
        assert_eq!(q.page_and_limit(), (1, 10));
    }

    #[test]
    fn per_page_is_an_alias_for_limit() {
        let q = ListQuery {
            per_page: Some(25),
            ..Default::default()
        };
        assert_eq!(q.page_and_limit(), (1, 25));
    }

    #[test]
    fn offset_skips_prior_pages() {
        let q = ListQuery {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn malformed_date_bound_is_rejected() {
        let q = ListQuery {
            updated_from: Some("2026-13-45".into()),
            ..Default::default()
        };
        assert!(matches!(q.updated_range(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn valid_bounds_parse_to_utc() {
        let q = ListQuery {
            updated_from: Some("2026-01-02T15:04:05Z".into()),
            updated_to: Some("2026-01-03T00:00:00+02:00".into()),
            ..Default::default()
        };
        let (from, to) = q.updated_range().unwrap();
        assert!(from.unwrap() < to.unwrap());
    }
}
