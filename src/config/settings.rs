use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend endpoints used by the widget
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Base URL that page ids are appended to when linking a document
    #[serde(default = "default_article_base_url")]
    pub article_base_url: String,

    /// Timeout for every backend request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Minimum input length before autocomplete candidates are requested
    #[serde(default = "default_autocomplete_min_chars")]
    pub autocomplete_min_chars: usize,

    /// Topics offered when the suggest service is unavailable
    #[serde(default = "default_fallback_topics")]
    pub fallback_topics: Vec<String>,

    /// Write debug logs to a file
    #[serde(default)]
    pub debug: bool,

    /// Log file or directory; defaults next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// How many rotated log files to keep (0 = keep all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            article_base_url: default_article_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            autocomplete_min_chars: default_autocomplete_min_chars(),
            fallback_topics: default_fallback_topics(),
            debug: false,
            debug_log_path: None,
            debug_log_rotation: None,
            debug_log_keep: None,
        }
    }
}

/// URLs of the services the widget talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// GET `?q=<prefix>` → `{categories}`
    pub autocomplete: String,
    /// GET → `{categories}`
    pub suggest: String,
    /// GET `?q=<topic>&offset=<n>` → `{articles, more}`
    pub find: String,
    /// Page id is appended; GET → `{displaytitle, description}`
    pub metadata: String,
    /// POST `{type, title, weblink}`
    pub track: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            autocomplete: "https://mitmachen.toolforge.org/api/autocomplete".to_string(),
            suggest: "https://mitmachen.toolforge.org/api/suggest".to_string(),
            find: "https://mitmachen.toolforge.org/api/find".to_string(),
            metadata: "https://de.wikipedia.org/api/rest_v1/page/summary/".to_string(),
            track: "https://mitmachen.toolforge.org/api/track".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every widget endpoint at `base` (metadata included)
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            autocomplete: format!("{base}/autocomplete"),
            suggest: format!("{base}/suggest"),
            find: format!("{base}/find"),
            metadata: format!("{base}/summary/"),
            track: format!("{base}/track"),
        }
    }
}

/// Debug log file rotation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    /// Single file, appended to
    None,
    /// One file per day
    Daily,
    /// One file per run
    Session,
}

fn default_article_base_url() -> String {
    "https://de.wikipedia.org/wiki/".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_autocomplete_min_chars() -> usize {
    3
}

fn default_fallback_topics() -> Vec<String> {
    vec![
        "China".to_string(),
        "19. Jahrhundert".to_string(),
        "Fußball".to_string(),
    ]
}
