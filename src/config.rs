use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

pub const CONFIG_ELEMENT_ID: &str = "site-config";

/// Every tunable the page behaviours read. Values can be overridden per page
/// with a `<script type="application/json" id="site-config">` block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub navbar_threshold: f64,
    pub back_to_top_threshold: f64,
    pub section_offset: f64,
    pub header_offset: f64,
    pub slide_interval_ms: u32,
    pub count_duration_ms: u32,
    pub count_tick_ms: u32,
    pub stats_visibility: f64,
    pub toast_lifetime_ms: u32,
    pub toast_transition_ms: u32,
    pub submit_delay_ms: u32,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_selectors: Vec<String>,
    pub thousands_separator: String,
    pub fade_in_delay_ms: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            navbar_threshold: 50.0,
            back_to_top_threshold: 500.0,
            section_offset: 200.0,
            header_offset: 80.0,
            slide_interval_ms: 5000,
            count_duration_ms: 2000,
            count_tick_ms: 16,
            stats_visibility: 0.5,
            toast_lifetime_ms: 5000,
            toast_transition_ms: 300,
            submit_delay_ms: 1500,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_selectors: [
                ".destination-card",
                ".service-card",
                ".testimonial-card",
                ".about-content",
                ".about-images",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            thousands_separator: "\u{a0}".to_string(),
            fade_in_delay_ms: 100,
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the inline config block if the page has one. A broken block is
    /// never fatal, the defaults are used instead.
    pub fn load(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|err| {
                warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn reveal_selector(&self) -> String {
        self.reveal_selectors.join(", ")
    }
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
