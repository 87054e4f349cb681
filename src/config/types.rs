use serde::Deserialize;

/// Default cap on simultaneous resource downloads
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 2;

/// Default whole-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// The site to mirror and where to put it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Seed URL the crawl starts from
    pub url: String,

    /// Root directory the mirrored files are written under
    #[serde(rename = "location-on-disk")]
    pub location_on_disk: String,
}

/// Resource download behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Maximum number of resource downloads in flight at once.
    ///
    /// This is a politeness control towards the mirrored host, not a
    /// throughput knob.
    #[serde(rename = "max-concurrent-downloads", default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_DOWNLOADS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_crawler_name() -> String {
    "site-harvest".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
