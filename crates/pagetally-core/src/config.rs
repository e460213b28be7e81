#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub geoip_path: String,
    /// Public base URL of the site, used to recognise self-referrals.
    pub public_url: String,
    pub auth_mode: AuthMode,
    pub cors_origins: Vec<String>,
    pub duckdb_memory_limit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    None,
    /// HTTP Basic credentials from `PAGETALLY_ADMIN_USERNAME` /
    /// `PAGETALLY_ADMIN_PASSWORD`.
    Basic { username: String, password: String },
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("PAGETALLY_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("PAGETALLY_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            geoip_path: std::env::var("PAGETALLY_GEOIP_PATH")
                .unwrap_or_else(|_| "./GeoLite2-Country.mmdb".to_string()),
            public_url: std::env::var("PAGETALLY_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            auth_mode: {
                let raw = std::env::var("PAGETALLY_AUTH").unwrap_or_else(|_| "basic".to_string());
                match raw.as_str() {
                    "none" => AuthMode::None,
                    _ => {
                        let username = std::env::var("PAGETALLY_ADMIN_USERNAME").map_err(|_| {
                            "PAGETALLY_ADMIN_USERNAME required when AUTH=basic".to_string()
                        })?;
                        let password = std::env::var("PAGETALLY_ADMIN_PASSWORD").map_err(|_| {
                            "PAGETALLY_ADMIN_PASSWORD required when AUTH=basic".to_string()
                        })?;
                        AuthMode::Basic { username, password }
                    }
                }
            },
            cors_origins: std::env::var("PAGETALLY_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            duckdb_memory_limit: std::env::var("PAGETALLY_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
        })
    }

    pub fn db_path(&self) -> String {
        format!("{}/pagetally.db", self.data_dir)
    }
}
