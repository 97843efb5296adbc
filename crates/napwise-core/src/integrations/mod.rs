pub mod calendar;

pub use calendar::{
    export_day, export_payloads, CalendarEventPayload, CalendarExporter, ExportReport,
    GoogleCalendarExporter, KeyringTokenSource, StaticToken, TokenSource,
};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::CalendarError;

    const SERVICE: &str = "napwise";

    fn entry(key: &str) -> Result<keyring::Entry, CalendarError> {
        keyring::Entry::new(SERVICE, key).map_err(|e| CalendarError::Credentials(e.to_string()))
    }

    pub fn get(key: &str) -> Result<Option<String>, CalendarError> {
        match entry(key)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CalendarError::Credentials(e.to_string())),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), CalendarError> {
        entry(key)?
            .set_password(value)
            .map_err(|e| CalendarError::Credentials(e.to_string()))
    }

    pub fn delete(key: &str) -> Result<(), CalendarError> {
        match entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CalendarError::Credentials(e.to_string())),
        }
    }
}
