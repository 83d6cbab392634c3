use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory holding one sub-directory of shards per source.
    pub output_dir: PathBuf,
    pub log_level: String,
    /// Upper bound for a single page load before it counts as a navigation failure.
    pub navigation_timeout_secs: u64,
    pub user_agent: String,
    /// Pause before every navigation except the first one of a crawl.
    pub inter_request_delay_ms: u64,
}
