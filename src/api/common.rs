//! Shared query parameter types for API handlers

use crate::models::ListParams;
use serde::Deserialize;

/// Standard pagination query (`?page=2&limit=20`)
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Resolve to list parameters with the given default page size
    pub fn to_params(&self, default_limit: u32) -> ListParams {
        ListParams::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let query = PaginationQuery {
            page: None,
            limit: None,
        };
        let params = query.to_params(10);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 10);

        let query = PaginationQuery {
            page: Some(3),
            limit: Some(25),
        };
        let params = query.to_params(10);
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 25);
    }
}
