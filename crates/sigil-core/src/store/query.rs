// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role listing queries.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::types::Role;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 500;

/// The only field a role record carries.
const NAME_FIELD: &str = "name";

/// Equality filter, 1-based pagination and single-field ascending sort.
///
/// Filters on fields other than `name` match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuery {
    /// Field equality constraints, all of which must hold.
    pub filter: BTreeMap<String, String>,
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Field to sort by, ascending.
    pub sort_by: Option<String>,
}

impl Default for RoleQuery {
    fn default() -> Self {
        Self {
            filter: BTreeMap::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
        }
    }
}

impl RoleQuery {
    /// Creates an unfiltered query for the first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the exact-name existence query.
    pub fn by_name(role: &Role) -> Self {
        Self::new().filter(NAME_FIELD, role.as_str())
    }

    /// Adds an equality constraint.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Sets the page number.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the sort field.
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    /// Number of matching rows to skip.
    pub fn skip(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.page_size)
    }

    /// Maximum number of rows to return.
    pub fn limit(&self) -> usize {
        self.page_size
    }

    /// Returns `true` if `role` satisfies every filter constraint.
    pub fn matches(&self, role: &Role) -> bool {
        self.filter
            .iter()
            .all(|(field, value)| field == NAME_FIELD && value == role.as_str())
    }

    /// Returns `true` if results should be ordered by name.
    pub fn sorts_by_name(&self) -> bool {
        self.sort_by.as_deref() == Some(NAME_FIELD)
    }

    /// Builds a query from HTTP query parameters.
    ///
    /// `page`, `count` and `sort` are reserved; every other key becomes an
    /// equality constraint.
    pub fn from_params(params: &HashMap<String, String>) -> AuthResult<Self> {
        let mut query = Self::new();

        for (key, value) in params {
            match key.as_str() {
                "page" => query.page = parse_positive("page", value)?,
                "count" => {
                    let size = parse_positive("count", value)?;
                    if size > MAX_PAGE_SIZE {
                        return Err(AuthError::validation(
                            "count",
                            format!("must not exceed {}", MAX_PAGE_SIZE),
                        ));
                    }
                    query.page_size = size;
                }
                "sort" => {
                    if !value.is_empty() {
                        query.sort_by = Some(value.clone());
                    }
                }
                _ => {
                    query.filter.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(query)
    }
}

fn parse_positive(field: &str, value: &str) -> AuthResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AuthError::validation(field, "must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_by_name_matches_exactly() {
        let query = RoleQuery::by_name(&Role::new("admin"));

        assert!(query.matches(&Role::new("admin")));
        assert!(!query.matches(&Role::new("Admin")));
        assert!(!query.matches(&Role::new("admins")));
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let query = RoleQuery::new().filter("color", "red");
        assert!(!query.matches(&Role::new("red")));
        assert!(RoleQuery::new().matches(&Role::new("anything")));
    }

    #[test]
    fn test_skip_and_limit() {
        let query = RoleQuery::new().page(3).page_size(10);
        assert_eq!(query.skip(), 20);
        assert_eq!(query.limit(), 10);

        assert_eq!(RoleQuery::new().page(0).skip(), 0);
    }

    #[test]
    fn test_from_params() {
        let query =
            RoleQuery::from_params(&params(&[("page", "2"), ("count", "5"), ("sort", "name"), ("name", "admin")]))
                .unwrap();

        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 5);
        assert!(query.sorts_by_name());
        assert_eq!(query.filter.get("name").map(String::as_str), Some("admin"));
    }

    #[test]
    fn test_from_params_defaults() {
        let query = RoleQuery::from_params(&HashMap::new()).unwrap();
        assert_eq!(query, RoleQuery::default());
    }

    #[test]
    fn test_from_params_rejects_bad_numbers() {
        for bad in [("page", "0"), ("page", "x"), ("count", "0"), ("count", "501")] {
            let result = RoleQuery::from_params(&params(&[bad]));
            assert!(
                matches!(result, Err(AuthError::Validation { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
