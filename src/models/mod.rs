pub mod booking;
pub mod catalog;
pub mod invoice;
pub mod mandate;
pub mod payment;
pub mod payment_option;
pub mod webhook_event;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::repository::RepositoryError;

/// Parse a TEXT-stored decimal column, surfacing bad catalog data as a
/// conversion error instead of silently defaulting.
pub(crate) fn parse_decimal(raw: &str, column: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(raw)
        .map_err(|err| RepositoryError::Conversion(format!("{column}: {raw:?} ({err})")))
}

/// Convert a TEXT-stored status column through the domain `TryFrom`.
pub(crate) fn parse_status<T>(raw: &str, column: &str) -> Result<T, RepositoryError>
where
    T: for<'a> TryFrom<&'a str, Error = String>,
{
    T::try_from(raw).map_err(|err| RepositoryError::Conversion(format!("{column}: {err}")))
}
