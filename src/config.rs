use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub strava_api_url: String,
    pub strava_web_url: String,
    pub request_timeout: Duration,
    pub sync_lookback_days: i64,
    pub activities_per_page: u32,
    pub max_sync_pages: u32,
    pub effort_activity_count: u32,
    pub enrich_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            strava_api_url: "https://www.strava.com/api/v3".to_string(),
            strava_web_url: "https://www.strava.com".to_string(),
            request_timeout: Duration::from_secs(15),
            sync_lookback_days: 30,
            activities_per_page: 50,
            max_sync_pages: 10,
            effort_activity_count: 3,
            enrich_concurrency: 8,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparsable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let url_or = |key: &str, default: String| {
            lookup(key)
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(default)
        };

        let timeout_seconds = parsed_or(
            lookup("REQUEST_TIMEOUT_SECONDS"),
            defaults.request_timeout.as_secs(),
        );

        Self {
            port: parsed_or(lookup("PORT"), defaults.port),
            strava_api_url: url_or("STRAVA_API_URL", defaults.strava_api_url),
            strava_web_url: url_or("STRAVA_WEB_URL", defaults.strava_web_url),
            request_timeout: Duration::from_secs(timeout_seconds.clamp(1, 300)),
            sync_lookback_days: parsed_or(lookup("SYNC_LOOKBACK_DAYS"), defaults.sync_lookback_days)
                .clamp(1, MAX_LOOKBACK_DAYS),
            activities_per_page: parsed_or(lookup("ACTIVITIES_PER_PAGE"), defaults.activities_per_page)
                .clamp(1, 200),
            max_sync_pages: parsed_or(lookup("MAX_SYNC_PAGES"), defaults.max_sync_pages).max(1),
            effort_activity_count: parsed_or(lookup("EFFORT_ACTIVITY_COUNT"), defaults.effort_activity_count)
                .max(1),
            enrich_concurrency: parsed_or(lookup("ENRICH_CONCURRENCY"), defaults.enrich_concurrency)
                .max(1),
        }
    }
}

/// Ten years.
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

fn parsed_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
