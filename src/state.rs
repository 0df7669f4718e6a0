// src/state.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::errors::AppError;
use crate::manager::ProductManager;

const DEFAULT_PRODUCT_API_URL: &str = "http://192.168.1.9:5000";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ProductManager>,
    pub max_upload_bytes: usize,
}

/// Adresy serwisu produktów.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Nieprawidłowy PRODUCT_API_URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "PRODUCT_API_URL musi używać http lub https: {}",
                base_url
            )));
        }

        Ok(ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn collection_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    pub fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), urlencoding::encode(id))
    }

    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.base_url, urlencoding::encode(filename))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Czyta konfigurację z dowolnego źródła zmiennych (ułatwia testy).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PRODUCT_API_URL").unwrap_or_else(|| DEFAULT_PRODUCT_API_URL.to_string());

        let timeout_secs = match lookup("PRODUCT_API_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("PRODUCT_API_TIMEOUT_SECS musi być liczbą: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("Nieprawidłowy BIND_ADDR '{}': {}", bind_raw, e)))?;

        let max_upload_mb = match lookup("MAX_UPLOAD_MB") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                AppError::Config(format!("MAX_UPLOAD_MB musi być liczbą: {}", raw))
            })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        let max_upload_bytes = max_upload_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            AppError::Config(format!("MAX_UPLOAD_MB jest zbyt duże: {}", max_upload_mb))
        })?;

        Ok(AppConfig {
            api: ApiConfig::new(&base_url, Duration::from_secs(timeout_secs))?,
            bind_addr,
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use testresult::TestResult;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() -> TestResult {
        let config = AppConfig::from_lookup(lookup_from(&[]))?;

        assert_eq!(config.api.base_url(), DEFAULT_PRODUCT_API_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        Ok(())
    }

    #[test]
    fn builds_endpoint_urls() -> TestResult {
        let api = ApiConfig::new("http://localhost:5000/", Duration::from_secs(1))?;

        assert_eq!(api.collection_url(), "http://localhost:5000/api/products");
        assert_eq!(api.item_url("abc 1"), "http://localhost:5000/api/products/abc%201");
        assert_eq!(api.image_url("pen.jpg"), "http://localhost:5000/uploads/pen.jpg");
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = AppConfig::from_lookup(lookup_from(&[("PRODUCT_API_URL", "not a url")]));
        assert!(matches!(bad_url, Err(AppError::Config(_))), "got {bad_url:?}");

        let bad_scheme = AppConfig::from_lookup(lookup_from(&[("PRODUCT_API_URL", "ftp://host")]));
        assert!(matches!(bad_scheme, Err(AppError::Config(_))), "got {bad_scheme:?}");

        let bad_timeout =
            AppConfig::from_lookup(lookup_from(&[("PRODUCT_API_TIMEOUT_SECS", "soon")]));
        assert!(matches!(bad_timeout, Err(AppError::Config(_))), "got {bad_timeout:?}");
    }

    #[test]
    fn oversized_upload_limit_is_a_config_error() {
        let huge = usize::MAX.to_string();
        let result = AppConfig::from_lookup(lookup_from(&[("MAX_UPLOAD_MB", huge.as_str())]));

        assert!(matches!(result, Err(AppError::Config(_))), "got {result:?}");
    }
}
