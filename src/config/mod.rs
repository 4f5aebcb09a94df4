use crate::error::TocResult;
use crate::heading::{CollectOptions, ScanScope};
use crate::outline::OrphanPolicy;
use crate::page::{Eligibility, PageKind};
use crate::resize::ResizeBounds;
use crate::scrollspy::Threshold;
use leptos::logging::warn;
use serde::{Deserialize, Serialize};

/// Name of the global the host page may set to configure the widget.
pub const WINDOW_CONFIG_KEY: &str = "TOC_CONFIG";

/// Built-in configurations matching the site layouts the widget ships for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Home page only, `h2`/`h3`, toggle button.
    Dev,
    /// Like `Dev`, plus a drag handle for resizing the panel.
    Pkgdown,
    /// Every page but reference/article/changelog, `h1`–`h3`, text dedup,
    /// expand-on-scroll.
    #[default]
    Site,
}

/// What to do when the page has no linkable headings.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Do not insert anything.
    Skip,
    /// Insert the container but keep it hidden.
    Hide,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TocConfig {
    pub eligibility: Eligibility,
    /// Element marking a home page (`.home` on pkgdown sites).
    pub home_marker: String,

    /// `querySelectorAll` selector for candidate headings.
    pub selector: String,
    pub min_level: u8,
    pub max_level: u8,
    pub dedup_text: bool,
    pub excluded_ids: Vec<String>,
    /// Headings inside elements matching this selector are ignored.
    pub skip_within: String,
    pub orphans: OrphanPolicy,
    pub empty: EmptyPolicy,

    pub container_id: String,
    /// Ids of the widget's inner elements; host stylesheets target these.
    pub toggle_id: String,
    pub resize_handle_id: String,
    pub panel_id: String,
    pub nav_id: String,
    pub title: String,
    pub replace_existing: bool,
    pub hide_inline_toc: bool,

    pub resize: bool,
    pub resize_bounds: ResizeBounds,

    pub threshold: Threshold,
    pub expand_on_scroll: bool,
    pub active_class: String,
    pub expanded_class: String,
    pub collapsed_class: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl TocConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Dev => Self {
                eligibility: Eligibility::HomeOnly,
                home_marker: ".home".to_string(),
                selector: ".home h2, .home h3, main h2, main h3".to_string(),
                min_level: 2,
                max_level: 3,
                dedup_text: false,
                excluded_ids: Vec::new(),
                skip_within: String::new(),
                orphans: OrphanPolicy::Drop,
                empty: EmptyPolicy::Hide,
                container_id: "custom-toc-container".to_string(),
                toggle_id: "custom-toc-toggle".to_string(),
                resize_handle_id: "custom-toc-resize-handle".to_string(),
                panel_id: "custom-toc-content".to_string(),
                nav_id: "custom-toc-nav".to_string(),
                title: "Contents".to_string(),
                replace_existing: true,
                hide_inline_toc: false,
                resize: false,
                resize_bounds: ResizeBounds::default(),
                threshold: Threshold::Fixed(150.0),
                expand_on_scroll: false,
                active_class: "active".to_string(),
                expanded_class: "active-li".to_string(),
                collapsed_class: "collapsed".to_string(),
            },
            Preset::Pkgdown => Self {
                container_id: "toc-wrapper".to_string(),
                toggle_id: "toc-toggle".to_string(),
                resize_handle_id: "toc-resize-handle".to_string(),
                panel_id: "toc-panel".to_string(),
                nav_id: "toc-nav".to_string(),
                resize: true,
                ..Self::preset(Preset::Dev)
            },
            Preset::Site => Self {
                eligibility: Eligibility::Exclude(vec![
                    PageKind::Reference,
                    PageKind::Article,
                    PageKind::Changelog,
                ]),
                home_marker: ".home".to_string(),
                selector: "main h1, main h2, main h3".to_string(),
                min_level: 1,
                max_level: 3,
                dedup_text: true,
                excluded_ids: ["links", "license", "citation", "table-of-contents"]
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                skip_within: "#toc, .toc, #TOC, nav".to_string(),
                orphans: OrphanPolicy::Root,
                empty: EmptyPolicy::Skip,
                container_id: "simple-toc".to_string(),
                toggle_id: "toc-arrow-btn".to_string(),
                resize_handle_id: "simple-toc-resize-handle".to_string(),
                panel_id: "simple-toc-content".to_string(),
                nav_id: "simple-toc-nav".to_string(),
                title: "Contents".to_string(),
                replace_existing: true,
                hide_inline_toc: true,
                resize: false,
                resize_bounds: ResizeBounds::default(),
                threshold: Threshold::HalfViewport,
                expand_on_scroll: true,
                active_class: "active-link".to_string(),
                expanded_class: "active-li".to_string(),
                collapsed_class: "toc-hidden".to_string(),
            },
        }
    }

    /// Parse a JSON object. An optional `preset` key picks the base
    /// configuration; every other key overrides the field of the same name.
    pub fn from_json(json: &str) -> TocResult<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;

        let preset = match value.as_object_mut().and_then(|o| o.remove("preset")) {
            Some(p) => serde_json::from_value::<Preset>(p)?,
            None => Preset::default(),
        };

        let mut merged = serde_json::to_value(Self::preset(preset))?;
        if let (Some(base), Some(overrides)) = (merged.as_object_mut(), value.as_object()) {
            for (k, v) in overrides {
                base.insert(k.clone(), v.clone());
            }
        }

        Ok(serde_json::from_value(merged)?)
    }

    /// Read `window.TOC_CONFIG`, falling back to the default preset when it
    /// is absent or malformed.
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Some(raw) = window.get(WINDOW_CONFIG_KEY) else {
            return Self::default();
        };
        if raw.is_undefined() || raw.is_null() {
            return Self::default();
        }

        // A bare string names a preset.
        if let Some(name) = raw.as_string() {
            let json = serde_json::json!({ "preset": name }).to_string();
            return Self::from_json(&json).unwrap_or_else(|e| {
                warn!("[pagetoc] ignoring window.{WINDOW_CONFIG_KEY}: {e}");
                Self::default()
            });
        }

        let json = js_sys::JSON::stringify(&raw)
            .ok()
            .and_then(|s| s.as_string())
            .unwrap_or_default();
        Self::from_json(&json).unwrap_or_else(|e| {
            warn!("[pagetoc] ignoring window.{WINDOW_CONFIG_KEY}: {e}");
            Self::default()
        })
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            min_level: self.min_level,
            max_level: self.max_level,
            dedup_text: self.dedup_text,
            excluded_ids: self.excluded_ids.clone(),
        }
    }

    pub fn scan_scope(&self) -> ScanScope<'_> {
        ScanScope {
            selector: &self.selector,
            container_id: &self.container_id,
            skip_within: &self.skip_within,
        }
    }
}
