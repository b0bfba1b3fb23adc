use serde::Deserialize;

/// Default number of concurrent crawl workers
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Main configuration structure for a crawl
///
/// Every section and field has a default, so an empty TOML document (or no
/// file at all) yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of workers fetching pages concurrently
    pub concurrency: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// HTTP client configuration shared by the page fetcher and the status checker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the User-Agent header
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Value of the Accept header
    pub accept: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Extra probe attempts after a network-level failure
    #[serde(rename = "probe-retries")]
    pub probe_retries: u32,

    /// Pause between probe attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("dead-link-checker/", env!("CARGO_PKG_VERSION")).to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            timeout_secs: 10,
            max_redirects: 5,
            probe_retries: 0,
            retry_delay_ms: 500,
        }
    }
}

/// Link filtering policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Hrefs containing any of these path segments are never followed or probed
    #[serde(rename = "excluded-path-segments")]
    pub excluded_path_segments: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_path_segments: vec!["/cdn-cgi/".to_string()],
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives persisted reports
    #[serde(rename = "results-dir")]
    pub results_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "results".to_string(),
        }
    }
}
