//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FeedKind, IdRange};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote calendar endpoint and request pacing
    #[serde(default)]
    pub feed: FeedConfig,

    /// Identifier ranges probed per feed kind
    #[serde(default)]
    pub ranges: RangesConfig,

    /// Room acceptance filter
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Description field patterns
    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        Url::parse(&self.feed.base_url)
            .map_err(|e| AppError::validation(format!("feed.base_url is invalid: {e}")))?;

        for (name, kind) in [("ranges.rooms", FeedKind::Room), ("ranges.groups", FeedKind::Group)] {
            let range = self.range_for(kind);
            if range.start == 0 {
                return Err(AppError::validation(format!("{name}.start must be > 0")));
            }
            if range.start > range.end {
                return Err(AppError::validation(format!("{name} is empty ({range})")));
            }
        }

        if self.discovery.include_marker.is_empty() {
            return Err(AppError::validation("discovery.include_marker is empty"));
        }
        if self.discovery.exclude_marker.is_empty() {
            return Err(AppError::validation("discovery.exclude_marker is empty"));
        }
        if self.discovery.checkpoint_every == 0 {
            return Err(AppError::validation("discovery.checkpoint_every must be > 0"));
        }

        self.extract.compile()?;
        Ok(())
    }

    /// Identifier range configured for a feed kind.
    pub fn range_for(&self, kind: FeedKind) -> IdRange {
        match kind {
            FeedKind::Room => self.ranges.rooms,
            FeedKind::Group => self.ranges.groups,
        }
    }
}

/// Remote endpoint and HTTP behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Calendar endpoint, queried with `?{idAudLine|idGroup}={id}&iCal=true`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause after every request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangesConfig {
    /// Room-line identifiers probed by discovery
    #[serde(default = "defaults::room_range")]
    pub rooms: IdRange,

    /// Group identifiers fetched in bulk
    #[serde(default = "defaults::group_range")]
    pub groups: IdRange,
}

impl Default for RangesConfig {
    fn default() -> Self {
        Self {
            rooms: defaults::room_range(),
            groups: defaults::group_range(),
        }
    }
}

/// Room discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Feed text that marks a room of interest
    #[serde(default = "defaults::include_marker")]
    pub include_marker: String,

    /// Feed text that disqualifies a room even when `include_marker` matches
    #[serde(default = "defaults::exclude_marker")]
    pub exclude_marker: String,

    /// Persist the scan checkpoint after this many probes
    #[serde(default = "defaults::checkpoint_every")]
    pub checkpoint_every: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include_marker: defaults::include_marker(),
            exclude_marker: defaults::exclude_marker(),
            checkpoint_every: defaults::checkpoint_every(),
        }
    }
}

/// File locations. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the content store
    #[serde(default = "defaults::storage_dir")]
    pub storage_dir: PathBuf,

    /// Line-delimited list of discovered room identifiers
    #[serde(default = "defaults::identifiers_file")]
    pub identifiers_file: PathBuf,

    /// Dataset output
    #[serde(default = "defaults::output_file")]
    pub output_file: PathBuf,
}

impl PathsConfig {
    /// Content store directory for a feed kind.
    pub fn store_dir(&self, kind: FeedKind) -> PathBuf {
        self.storage_dir.join(kind.dir_name())
    }

    /// Discovery checkpoint file.
    pub fn checkpoint_file(&self) -> PathBuf {
        self.storage_dir.join("discovery.checkpoint")
    }

    /// JSON report of the last bulk fetch for a feed kind.
    pub fn report_file(&self, kind: FeedKind) -> PathBuf {
        self.storage_dir
            .join(format!("last_fetch_{}.json", kind.dir_name()))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            storage_dir: defaults::storage_dir(),
            identifiers_file: defaults::identifiers_file(),
            output_file: defaults::output_file(),
        }
    }
}

/// Patterns applied to the event description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Regex whose first capture group is the teacher name
    #[serde(default = "defaults::teacher_pattern")]
    pub teacher_pattern: String,

    /// Regex whose first capture group is the group code
    #[serde(default = "defaults::group_pattern")]
    pub group_pattern: String,
}

impl ExtractConfig {
    /// Compile both patterns, checking each has a capture group.
    pub fn compile(&self) -> Result<(Regex, Regex)> {
        Ok((
            compile_capturing(&self.teacher_pattern)?,
            compile_capturing(&self.group_pattern)?,
        ))
    }
}

fn compile_capturing(pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|e| AppError::pattern(pattern, e))?;
    if regex.captures_len() < 2 {
        return Err(AppError::pattern(pattern, "pattern has no capture group"));
    }
    Ok(regex)
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            teacher_pattern: defaults::teacher_pattern(),
            group_pattern: defaults::group_pattern(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::models::IdRange;

    // Feed defaults
    pub fn base_url() -> String {
        "https://eios.kosgos.ru/api/Rasp".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn request_delay() -> u64 {
        300
    }

    // Range defaults
    pub fn room_range() -> IdRange {
        IdRange::new(3_115_136, 3_130_000)
    }
    pub fn group_range() -> IdRange {
        IdRange::new(8149, 8515)
    }

    // Discovery defaults
    pub fn include_marker() -> String {
        "LOCATION:Б".into()
    }
    pub fn exclude_marker() -> String {
        "LOCATION:Б1".into()
    }
    pub fn checkpoint_every() -> u64 {
        50
    }

    // Path defaults
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("ical_files")
    }
    pub fn identifiers_file() -> PathBuf {
        PathBuf::from("auth_id.txt")
    }
    pub fn output_file() -> PathBuf {
        PathBuf::from("university_schedule.csv")
    }

    // Extraction defaults
    pub fn teacher_pattern() -> String {
        r"Преподаватель\s([^,]+)".into()
    }
    pub fn group_pattern() -> String {
        r"группа:?\s*([\w\-А-Яа-яЁё]+)".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
