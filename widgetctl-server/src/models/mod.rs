//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod widget;
pub mod installation;
pub mod paid;
pub mod price;

pub use validation::ValidationError;
pub use widget::{NewWidget, WidgetChanges, WidgetId};
pub use installation::{
    add_days, extend_days, latest_date, parse_date, ClientDomain, InstallationKey,
    NewInstallation, DEFAULT_EXTEND_DAYS,
};
pub use paid::parse_paid;
pub use price::Price;
