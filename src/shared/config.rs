use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub connectivity: ConnectivityConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    /// `None` leaves remote calls unbounded.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub reconcile_on_startup: bool,
    pub reindex_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    pub probe_interval_secs: u64,
    pub probe_timeout_secs: u64,
    pub force_offline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub acquisition_timeout_secs: u64,
    pub geocoder_url: Option<String>,
    pub geocoder_timeout_secs: u64,
    pub accept_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: 5,
            },
            remote: RemoteConfig {
                base_url: "http://localhost:3000/api".to_string(),
                request_timeout_secs: None,
            },
            sync: SyncConfig {
                reconcile_on_startup: true,
                reindex_on_startup: true,
            },
            connectivity: ConnectivityConfig {
                probe_interval_secs: 15,
                probe_timeout_secs: 5,
                force_offline: false,
            },
            location: LocationConfig {
                acquisition_timeout_secs: 15,
                geocoder_url: Some("https://nominatim.openstreetmap.org".to_string()),
                geocoder_timeout_secs: 5,
                accept_language: "uk,en-US;q=0.7,en;q=0.3".to_string(),
            },
        }
    }
}

fn default_database_url() -> String {
    match dirs::data_dir() {
        Some(dir) => {
            let path = dir.join("travel-journal").join("journal.db");
            format!("sqlite://{}?mode=rwc", path.display())
        }
        None => "sqlite:data/journal.db?mode=rwc".to_string(),
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_DATABASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.database.url = v.to_string();
            }
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_DATABASE_MAX_CONNECTIONS") {
            if let Some(value) = parse_u64(&v) {
                cfg.database.max_connections = value.clamp(1, u32::MAX as u64) as u32;
            }
        }

        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_REMOTE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.remote.base_url = v.to_string();
            }
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_REMOTE_TIMEOUT_SECS") {
            cfg.remote.request_timeout_secs = parse_u64(&v).filter(|secs| *secs > 0);
        }

        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_RECONCILE_ON_STARTUP") {
            cfg.sync.reconcile_on_startup = parse_bool(&v, cfg.sync.reconcile_on_startup);
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_REINDEX_ON_STARTUP") {
            cfg.sync.reindex_on_startup = parse_bool(&v, cfg.sync.reindex_on_startup);
        }

        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_PROBE_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.connectivity.probe_interval_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_PROBE_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.connectivity.probe_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_FORCE_OFFLINE") {
            cfg.connectivity.force_offline = parse_bool(&v, cfg.connectivity.force_offline);
        }

        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_LOCATION_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.location.acquisition_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_GEOCODER_URL") {
            let v = v.trim();
            // An explicit empty value disables reverse geocoding.
            cfg.location.geocoder_url = if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            };
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_GEOCODER_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.location.geocoder_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("TRAVEL_JOURNAL_ACCEPT_LANGUAGE") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.location.accept_language = v.to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if !is_http_url(&self.remote.base_url) {
            return Err(format!(
                "Remote base_url must be an http(s) url: {}",
                self.remote.base_url
            ));
        }
        if let Some(0) = self.remote.request_timeout_secs {
            return Err("Remote request_timeout_secs must be greater than 0".to_string());
        }
        if self.connectivity.probe_interval_secs == 0 {
            return Err("Connectivity probe_interval_secs must be greater than 0".to_string());
        }
        if self.connectivity.probe_timeout_secs == 0 {
            return Err("Connectivity probe_timeout_secs must be greater than 0".to_string());
        }
        if self.location.acquisition_timeout_secs == 0 {
            return Err("Location acquisition_timeout_secs must be greater than 0".to_string());
        }
        if let Some(url) = &self.location.geocoder_url {
            if !is_http_url(url) {
                return Err(format!("Location geocoder_url must be an http(s) url: {url}"));
            }
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
