//! Uniform JSON response envelope.
//!
//! Every response from the API, success or failure, has the shape
//! `{success, data?, message?, errors?, pagination?}`.

use serde::Serialize;

/// A single offending field in a validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl Pagination {
    /// Compute pagination metadata from the requested window and total count.
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// The response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> Envelope<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            pagination: None,
        }
    }

    /// A successful list response carrying `data` and pagination metadata.
    #[must_use]
    pub const fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            pagination: Some(pagination),
        }
    }
}

impl Envelope<()> {
    /// A successful response with no payload, just a message.
    #[must_use]
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }
    }

    /// A failure response with a human-readable message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }
    }

    /// A validation failure listing the offending fields.
    #[must_use]
    pub fn invalid(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: Some(errors),
            pagination: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = Envelope::ok(json!({"id": 1}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = Envelope::failure("boom");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"success": false, "message": "boom"}));
    }

    #[test]
    fn test_invalid_envelope_lists_fields() {
        let envelope = Envelope::invalid(
            "validation failed",
            vec![FieldError::new("phone", "must not be empty")],
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "message": "validation failed",
                "errors": [{"field": "phone", "message": "must not be empty"}],
            })
        );
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);

        let p = Pagination::new(1, 10, 10);
        assert_eq!(p.total_pages, 1);

        let p = Pagination::new(2, 10, 11);
        assert_eq!(p.total_pages, 2);

        let p = Pagination::new(1, 25, 100);
        assert_eq!(p.total_pages, 4);
    }

    #[test]
    fn test_pagination_serializes_camel_case_total_pages() {
        let value = serde_json::to_value(Pagination::new(1, 10, 42)).unwrap();
        assert_eq!(
            value,
            json!({"page": 1, "limit": 10, "total": 42, "totalPages": 5})
        );
    }
}
