use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use cadence_ai::ProviderSettings;
use cadence_core::checkins::CheckInPolicy;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// HS256 secret for bearer tokens. Unset means single-user mode.
    pub jwt_secret: Option<String>,
    pub ai: ProviderSettings,
    pub search_api_key: Option<String>,
    pub policy: CheckInPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = parse_var("CADENCE_LISTEN_ADDR", "0.0.0.0:8080")?;
        let db_path =
            std::env::var("CADENCE_DB_PATH").unwrap_or_else(|_| "./db/cadence.db".into());
        let cors_allow = std::env::var("CADENCE_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_var("CADENCE_REQUEST_TIMEOUT_MS", "30000")?;

        let ai = ProviderSettings::new(
            &optional_var("CADENCE_AI_PROVIDER").unwrap_or_else(|| "anthropic".into()),
            optional_var("CADENCE_AI_MODEL").as_deref(),
        )
        .with_api_key(optional_var("CADENCE_AI_API_KEY"))
        .with_base_url(optional_var("CADENCE_AI_BASE_URL"));

        let defaults = CheckInPolicy::default();
        let mut policy = CheckInPolicy {
            window_days: parse_var(
                "CADENCE_CHECKIN_WINDOW_DAYS",
                &defaults.window_days.to_string(),
            )?,
            cooldown_days: parse_var(
                "CADENCE_CHECKIN_COOLDOWN_DAYS",
                &defaults.cooldown_days.to_string(),
            )?,
            ..defaults
        };
        policy.thresholds.baseline_min_days = parse_var(
            "CADENCE_BASELINE_MIN_DAYS",
            &policy.thresholds.baseline_min_days.to_string(),
        )?;
        policy.thresholds.sufficient_min_days = parse_var(
            "CADENCE_SUFFICIENT_MIN_DAYS",
            &policy.thresholds.sufficient_min_days.to_string(),
        )?;
        policy
            .validate()
            .context("Invalid check-in policy configuration")?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret: optional_var("CADENCE_JWT_SECRET"),
            ai,
            search_api_key: optional_var("CADENCE_SEARCH_API_KEY"),
            policy,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = optional_var(key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e))
}
