//! Installation keys and validated write payloads

use chrono::NaiveDate;

use super::{ValidationError, WidgetId};

/// Maximum length for client domains (VARCHAR(255))
pub const MAX_CLIENT_DOMAIN_LEN: usize = 255;

/// Days added by an extend request that does not say otherwise
pub const DEFAULT_EXTEND_DAYS: i32 = 10;

/// Latest date an installation may carry.
///
/// Postgres stores dates far beyond this, but `NaiveDate` cannot decode
/// them. Keep in sync with the CHECK constraint in `db::schema`.
pub fn latest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(262_142, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Validated client domain.
///
/// Any non-blank string up to 255 characters. Slashes are allowed, so
/// domains such as `example.com/shop` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientDomain(String);

impl ClientDomain {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "client_domain",
            });
        }
        if s.chars().count() > MAX_CLIENT_DOMAIN_LEN {
            return Err(ValidationError::TooLong {
                field: "client_domain",
                max: MAX_CLIENT_DOMAIN_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ClientDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Composite primary key of an installation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstallationKey {
    pub client_domain: ClientDomain,
    pub id_widget: WidgetId,
}

impl InstallationKey {
    /// Build a key from raw request fields, both required.
    pub fn from_parts(
        client_domain: Option<&str>,
        id_widget: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_domain: ClientDomain::new(client_domain.unwrap_or_default())?,
            id_widget: WidgetId::new(id_widget.unwrap_or_default())?,
        })
    }
}

/// Everything needed to insert an installation row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstallation {
    pub key: InstallationKey,
    pub date_install: NaiveDate,
    pub date_expire: NaiveDate,
    pub trial: Option<bool>,
    pub status: i16,
}

impl NewInstallation {
    /// Check cross-field rules.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.date_expire < self.date_install {
            return Err(ValidationError::OutOfRange {
                field: "date_expire",
                reason: "must not be earlier than date_install",
            });
        }
        if self.date_expire > latest_date() {
            return Err(ValidationError::OutOfRange {
                field: "date_expire",
                reason: "must not be later than 262142-12-31",
            });
        }
        Ok(self)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "it must be a calendar date (YYYY-MM-DD)",
    })
}

/// Turn an optional day count into the value added to the expiry date.
pub fn extend_days(days: Option<i64>) -> Result<i32, ValidationError> {
    match days {
        None => Ok(DEFAULT_EXTEND_DAYS),
        Some(d) => i32::try_from(d).map_err(|_| ValidationError::OutOfRange {
            field: "days",
            reason: "must fit in a 32-bit integer",
        }),
    }
}

/// Add `days` to `date`, returning `None` when the result leaves the
/// supported calendar range or passes [`latest_date`].
pub fn add_days(date: NaiveDate, days: i32) -> Option<NaiveDate> {
    date.checked_add_signed(chrono::Duration::days(i64::from(days)))
        .filter(|d| *d <= latest_date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn key_requires_both_parts() {
        assert!(InstallationKey::from_parts(Some("example.com"), Some("w1")).is_ok());
        assert!(matches!(
            InstallationKey::from_parts(None, Some("w1")).unwrap_err(),
            ValidationError::Empty { field: "client_domain" }
        ));
        assert!(matches!(
            InstallationKey::from_parts(Some("example.com"), Some("")).unwrap_err(),
            ValidationError::Empty { field: "id_widget" }
        ));
    }

    #[test]
    fn client_domain_keeps_slashes() {
        let domain = ClientDomain::new("example.com/shop/eu").unwrap();
        assert_eq!(domain.as_str(), "example.com/shop/eu");
    }

    #[test]
    fn client_domain_max_length() {
        assert!(ClientDomain::new(&"d".repeat(255)).is_ok());
        assert!(matches!(
            ClientDomain::new(&"d".repeat(256)).unwrap_err(),
            ValidationError::TooLong { max: 255, .. }
        ));
    }

    #[test]
    fn dates_parse_iso_only() {
        assert_eq!(parse_date("date_install", "2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(parse_date("date_install", "2023-02-29").is_err());
        assert!(parse_date("date_install", "29/02/2024").is_err());
    }

    #[test]
    fn expire_before_install_rejected() {
        let new = NewInstallation {
            key: InstallationKey::from_parts(Some("a.com"), Some("w1")).unwrap(),
            date_install: date(2024, 5, 2),
            date_expire: date(2024, 5, 1),
            trial: None,
            status: 1,
        };
        assert!(matches!(
            new.validate().unwrap_err(),
            ValidationError::OutOfRange { field: "date_expire", .. }
        ));
    }

    #[test]
    fn default_and_explicit_days() {
        assert_eq!(extend_days(None).unwrap(), 10);
        assert_eq!(extend_days(Some(-3)).unwrap(), -3);
        assert!(extend_days(Some(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn add_days_crosses_month_and_year() {
        assert_eq!(add_days(date(2024, 12, 25), 10), Some(date(2025, 1, 4)));
        assert_eq!(add_days(date(2024, 2, 28), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn add_days_stops_at_latest_date() {
        let start = date(2024, 1, 31);
        let room = (latest_date() - start).num_days() as i32;
        assert_eq!(add_days(start, room), Some(latest_date()));
        assert_eq!(add_days(start, room + 1), None);
        assert_eq!(add_days(start, 100_000_000), None);
    }

    #[test]
    fn expire_after_latest_date_rejected() {
        let new = NewInstallation {
            key: InstallationKey::from_parts(Some("a.com"), Some("w1")).unwrap(),
            date_install: date(2024, 5, 1),
            date_expire: date(262_143, 1, 1),
            trial: None,
            status: 1,
        };
        assert!(matches!(
            new.validate().unwrap_err(),
            ValidationError::OutOfRange { field: "date_expire", .. }
        ));
    }

    proptest! {
        #[test]
        fn extend_is_exact(offset in 0i64..200_000, days in -100_000i32..100_000) {
            let start = date(1900, 1, 1) + chrono::Duration::days(offset);
            let end = add_days(start, days).unwrap();
            prop_assert_eq!((end - start).num_days(), i64::from(days));
            prop_assert_eq!(add_days(start, 0), Some(start));
        }
    }
}
