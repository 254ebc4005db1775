//! Request payload validation.
//!
//! Wraps the `validator` crate so that every failure surfaces as a
//! [`FieldErrors`] value, which the error middleware maps to a 400 response
//! with a structured field list.

use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::errors::FieldErrors;

/// Returned when an identifier is not a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ID is not in its proper form")]
pub struct InvalidId;

/// Validates `val`, collecting every failed field.
pub fn check<T: Validate>(val: &T) -> Result<(), FieldErrors> {
    val.validate().map_err(|errors| field_errors(&errors))
}

fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::default();

    for (field, failures) in errors.field_errors() {
        for failure in failures.iter() {
            let message = failure
                .message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| format!("{} failed on the '{}' rule", field, failure.code));
            fields.push(field.to_string(), message);
        }
    }

    // HashMap iteration order is random; keep responses stable.
    fields.0.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Parses `id` as a UUID.
pub fn check_id(id: &str) -> Result<Uuid, InvalidId> {
    Uuid::parse_str(id).map_err(|_| InvalidId)
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_check_valid() {
        let s = Signup {
            name: "Bill".into(),
            email: "bill@example.com".into(),
        };
        assert!(check(&s).is_ok());
    }

    #[test]
    fn test_check_collects_all_fields_sorted() {
        let s = Signup {
            name: String::new(),
            email: "not-an-email".into(),
        };
        let fields = check(&s).unwrap_err();

        assert_eq!(fields.0.len(), 2);
        assert_eq!(fields.0[0].field, "email");
        assert_eq!(fields.0[0].error, "email failed on the 'email' rule");
        assert_eq!(fields.0[1].field, "name");
        assert_eq!(fields.0[1].error, "name is required");
    }

    #[test]
    fn test_check_id() {
        let id = generate_id();
        assert_eq!(check_id(&id).unwrap().to_string(), id);
        assert_eq!(check_id("12345"), Err(InvalidId));
    }
}
