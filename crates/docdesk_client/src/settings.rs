use std::time::Duration;

use thiserror::Error;

pub const ENV_BASE_URL: &str = "DOCDESK_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DOCDESK_TIMEOUT_SECS";
pub const ENV_LIST_LIMIT: &str = "DOCDESK_LIST_LIMIT";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Page size used while paging through the document list.
    pub list_limit: u32,
    pub max_upload_bytes: u64,
    /// Lowercase file extensions, including the dot.
    pub allowed_extensions: Vec<String>,
    pub upload_chunk_bytes: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Summaries and answers are generated synchronously by the service.
            request_timeout: Duration::from_secs(120),
            list_limit: 20,
            max_upload_bytes: 50 * 1024 * 1024,
            allowed_extensions: vec![".pdf".to_string()],
            upload_chunk_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl ClientSettings {
    /// Defaults overridden by any `DOCDESK_*` variables present in the environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            settings.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_LIST_LIMIT) {
            let limit = parse_number(ENV_LIST_LIMIT, &raw)?;
            settings.list_limit = u32::try_from(limit).map_err(|_| SettingsError::InvalidValue {
                key: ENV_LIST_LIMIT,
                value: raw.clone(),
            })?;
        }
        Ok(settings)
    }

    pub fn is_extension_allowed(&self, filename: &str) -> bool {
        let lower = filename.to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, SettingsError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let settings = ClientSettings::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://docs.internal:9000"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_LIST_LIMIT, "50"),
        ]))
        .unwrap();
        assert_eq!(settings.base_url, "http://docs.internal:9000");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.list_limit, 50);
        assert_eq!(settings.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = ClientSettings::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            SettingsError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: "soon".to_string()
            }
        );
        assert!(ClientSettings::from_lookup(lookup_from(&[(ENV_LIST_LIMIT, "0")])).is_err());
    }

    #[test]
    fn extension_check_ignores_case() {
        let settings = ClientSettings::default();
        assert!(settings.is_extension_allowed("Report.PDF"));
        assert!(!settings.is_extension_allowed("notes.txt"));
    }
}
