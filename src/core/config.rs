use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub wilayah: WilayahConfig,
    pub submission: SubmissionConfig,
    pub form: FormConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Geographic reference service (emsifa api-wilayah-indonesia)
#[derive(Debug, Clone)]
pub struct WilayahConfig {
    /// Base URL without trailing slash, e.g. `https://www.emsifa.com/api-wilayah-indonesia/api`
    pub base_url: String,
    pub timeout: Duration,
}

/// Spreadsheet-backed submission endpoint (Apps Script web app)
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub url: String,
    /// Treat non-2xx responses as failures. When false only transport
    /// errors fail a submission and the response is never inspected.
    pub check_status: bool,
    pub timeout: Duration,
}

/// In-memory form session store
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            wilayah: WilayahConfig::from_env()?,
            submission: SubmissionConfig::from_env()?,
            form: FormConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Presensi API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the attendance form service".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Shared by both outbound clients
fn http_timeout() -> Result<Duration, String> {
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

    let secs = env::var("HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
        .parse::<u64>()
        .map_err(|_| "HTTP_TIMEOUT_SECS must be a valid number".to_string())?;

    Ok(Duration::from_secs(secs))
}

impl WilayahConfig {
    const DEFAULT_BASE_URL: &'static str = "https://www.emsifa.com/api-wilayah-indonesia/api";

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("WILAYAH_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            timeout: http_timeout()?,
        })
    }
}

impl SubmissionConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SUBMISSION_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SUBMISSION_URL environment variable is required".to_string())?;

        let check_status = parse_bool(
            "SUBMISSION_CHECK_STATUS",
            &env::var("SUBMISSION_CHECK_STATUS").unwrap_or_else(|_| "true".to_string()),
        )?;

        Ok(Self {
            url,
            check_status,
            timeout: http_timeout()?,
        })
    }
}

impl FormConfig {
    const DEFAULT_SESSION_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
    const DEFAULT_MAX_SESSIONS: usize = 10_000;

    pub fn from_env() -> Result<Self, String> {
        let session_ttl_secs = env::var("FORM_SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "FORM_SESSION_TTL_SECS must be a valid number".to_string())?;

        let sweep_interval_secs = env::var("FORM_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "FORM_SWEEP_INTERVAL_SECS must be a valid number".to_string())?;

        let max_sessions = env::var("FORM_MAX_SESSIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_SESSIONS.to_string())
            .parse::<usize>()
            .map_err(|_| "FORM_MAX_SESSIONS must be a valid number".to_string())?;

        if sweep_interval_secs == 0 {
            return Err("FORM_SWEEP_INTERVAL_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            session_ttl: Duration::from_secs(session_ttl_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            max_sessions,
        })
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(Self::DEFAULT_SESSION_TTL_SECS),
            sweep_interval: Duration::from_secs(Self::DEFAULT_SWEEP_INTERVAL_SECS),
            max_sessions: Self::DEFAULT_MAX_SESSIONS,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{} must be a boolean (true/false)", key)),
    }
}
