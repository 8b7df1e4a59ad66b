//! Paid flag coercion
//!
//! Clients send the flag in a few shapes. Accepted:
//! - JSON booleans
//! - the strings "true" / "false" (case-insensitive)
//! - integers, where any non-zero value is true

use serde_json::Value;

use super::ValidationError;

const PAID_REASON: &str = "it must be a boolean (true or false)";

/// Coerce a JSON value into the paid flag.
///
/// # Example
/// ```
/// use serde_json::json;
/// use widgetctl_server::models::parse_paid;
///
/// assert_eq!(parse_paid(&json!("TRUE")).unwrap(), true);
/// assert_eq!(parse_paid(&json!(0)).unwrap(), false);
/// assert!(parse_paid(&json!("yes")).is_err());
/// ```
pub fn parse_paid(value: &Value) -> Result<bool, ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        field: "paid",
        reason: PAID_REASON,
    };

    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid()),
        },
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i != 0)
            } else if let Some(u) = n.as_u64() {
                Ok(u != 0)
            } else {
                // floats are not integers, even 1.0
                Err(invalid())
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn accepts_literals_and_complements() {
        assert!(parse_paid(&json!(true)).unwrap());
        assert!(!parse_paid(&json!(false)).unwrap());
        assert!(parse_paid(&json!("true")).unwrap());
        assert!(!parse_paid(&json!("false")).unwrap());
        assert!(parse_paid(&json!(1)).unwrap());
        assert!(!parse_paid(&json!(0)).unwrap());
    }

    #[test]
    fn case_insensitive_strings() {
        assert!(parse_paid(&json!("True")).unwrap());
        assert!(!parse_paid(&json!("FALSE")).unwrap());
    }

    #[test]
    fn rejects_other_shapes() {
        for value in [
            json!("yes"),
            json!(""),
            json!(1.5),
            json!(null),
            json!([true]),
            json!({"paid": true}),
        ] {
            let err = parse_paid(&value).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { field: "paid", .. }),
                "expected rejection for {value}"
            );
        }
    }

    proptest! {
        #[test]
        fn any_integer_is_truthy_unless_zero(i in any::<i64>()) {
            prop_assert_eq!(parse_paid(&json!(i)).unwrap(), i != 0);
        }

        #[test]
        fn unknown_words_rejected(s in "[a-z]{1,8}") {
            prop_assume!(s != "true" && s != "false");
            prop_assert!(parse_paid(&json!(s)).is_err());
        }
    }
}
