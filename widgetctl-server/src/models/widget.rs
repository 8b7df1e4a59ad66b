//! Widget identifiers and validated write payloads

use super::{Price, ValidationError};

/// Maximum length for widget ids (VARCHAR(30))
pub const MAX_WIDGET_ID_LEN: usize = 30;

/// Validated widget id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(String);

impl WidgetId {
    /// Create a widget id.
    ///
    /// # Rules
    /// - Not empty or whitespace-only
    /// - Max 30 characters
    ///
    /// # Example
    /// ```
    /// use widgetctl_server::models::WidgetId;
    ///
    /// assert!(WidgetId::new("chat-bubble").is_ok());
    /// assert!(WidgetId::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "id_widget" });
        }
        if s.chars().count() > MAX_WIDGET_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "id_widget",
                max: MAX_WIDGET_ID_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for WidgetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything needed to insert a widget row
#[derive(Debug, Clone, PartialEq)]
pub struct NewWidget {
    pub id: WidgetId,
    pub name: String,
    pub paid: bool,
    pub price: Option<Price>,
}

/// Partial update for a widget.
///
/// `None` leaves the column untouched. For the nullable columns the inner
/// `None` writes NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetChanges {
    pub name: Option<String>,
    pub paid: Option<Option<bool>>,
    pub price: Option<Option<Price>>,
}

impl WidgetChanges {
    /// True when the patch would not touch any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.paid.is_none() && self.price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_id_rules() {
        assert!(WidgetId::new("w1").is_ok());
        assert!(WidgetId::new("a/b c").is_ok());
        assert!(matches!(
            WidgetId::new("  ").unwrap_err(),
            ValidationError::Empty { field: "id_widget" }
        ));

        let id_30 = "w".repeat(30);
        assert!(WidgetId::new(&id_30).is_ok());

        let id_31 = "w".repeat(31);
        assert!(matches!(
            WidgetId::new(&id_31).unwrap_err(),
            ValidationError::TooLong { max: 30, .. }
        ));
    }

    #[test]
    fn empty_changes() {
        assert!(WidgetChanges::default().is_empty());
        let changes = WidgetChanges {
            price: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
