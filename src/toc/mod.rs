use crate::config::{EmptyPolicy, TocConfig};
use crate::error::{TocError, TocResult};
use crate::heading::{scan_document, Heading};
use crate::outline::OutlineTree;
use crate::page::{classify_page, PageKind};
use crate::scrollspy::{active_heading, ActiveState, Threshold};
use crate::widget::{TocSignals, TocWidget};
use leptos::ev;
use leptos::logging::log;
use leptos::mount::{mount_to, UnmountHandle};
use leptos::prelude::*;
use leptos::tachys::view::any_view::AnyViewState;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use std::collections::HashMap;
use wasm_bindgen::JsCast;

/// Builds and installs the TOC widget on the current page.
pub struct TocBuilder {
    config: TocConfig,
}

/// A widget that is live on the page. Dropping it detaches the scroll
/// listener and unmounts the view.
pub struct MountedToc {
    view: Option<UnmountHandle<AnyViewState>>,
    scroll: Option<WindowListenerHandle>,
    signals: TocSignals,
    entries: usize,
}

impl MountedToc {
    pub fn signals(&self) -> TocSignals {
        self.signals
    }

    /// Number of outline entries rendered.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for MountedToc {
    fn drop(&mut self) {
        if let Some(scroll) = self.scroll.take() {
            scroll.remove();
        }
        drop(self.view.take());
        // The signals live outside the view's owner, so unmounting alone
        // would leave them in the arena across rebuilds.
        self.signals.dispose();
    }
}

/// Measures the kept heading elements and feeds the highlight signals.
struct ScrollSync {
    targets: Vec<(String, web_sys::Element)>,
    trails: HashMap<String, Vec<String>>,
    threshold: Threshold,
    expand: bool,
    signals: TocSignals,
}

impl ScrollSync {
    fn update(&self) {
        let viewport = window()
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or_default();
        let threshold = self.threshold.resolve(viewport);

        let positions = self
            .targets
            .iter()
            .map(|(id, el)| (id.as_str(), el.get_bounding_client_rect().top()));
        let active = active_heading(positions, threshold);

        self.signals
            .apply(ActiveState::resolve(active, &self.trails, self.expand));
    }
}

impl TocBuilder {
    pub fn new(config: TocConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TocConfig {
        &self.config
    }

    pub fn page_kind(&self, window: &web_sys::Window, document: &web_sys::Document) -> PageKind {
        let has_marker = !self.config.home_marker.trim().is_empty()
            && document
                .query_selector(&self.config.home_marker)
                .ok()
                .flatten()
                .is_some();
        let path = window.location().pathname().unwrap_or_default();
        classify_page(&path, has_marker)
    }

    /// Install the widget on the global document.
    pub fn run(&self) -> TocResult<Option<MountedToc>> {
        let window = web_sys::window().ok_or(TocError::NoWindow)?;
        let document = window.document().ok_or(TocError::NoDocument)?;
        self.run_in(&window, &document)
    }

    /// Install the widget. `Ok(None)` means the page does not get one:
    /// it is ineligible, or it has no linkable headings and the empty
    /// policy is [`EmptyPolicy::Skip`].
    pub fn run_in(
        &self,
        window: &web_sys::Window,
        document: &web_sys::Document,
    ) -> TocResult<Option<MountedToc>> {
        let cfg = &self.config;

        let kind = self.page_kind(window, document);
        if !cfg.eligibility.allows(kind) {
            log!("[pagetoc] no TOC on {kind} page");
            return Ok(None);
        }

        let found = scan_document(document, &cfg.scan_scope(), &cfg.collect_options())?;
        let (headings, elements): (Vec<Heading>, Vec<web_sys::Element>) = found.into_iter().unzip();
        let ids: Vec<String> = headings.iter().map(|h| h.id.clone()).collect();

        let tree = OutlineTree::build(headings, cfg.min_level, cfg.orphans);
        let trails = tree.trails();
        let entries = tree.len();

        if tree.is_empty() && cfg.empty == EmptyPolicy::Skip {
            log!("[pagetoc] no headings found for TOC");
            return Ok(None);
        }

        if cfg.replace_existing {
            remove_containers(document, &cfg.container_id)?;
        }
        if cfg.hide_inline_toc {
            hide_inline_toc(document)?;
        }

        let body = document.body().ok_or(TocError::NoBody)?;
        let signals = TocSignals::new();
        let hidden = tree.is_empty();

        let view = {
            let config = cfg.clone();
            let roots = tree.into_roots();
            mount_to(body, move || {
                view! { <TocWidget config=config roots=roots signals=signals hidden=hidden /> }
                    .into_any()
            })
        };

        let scroll = (!hidden).then(|| {
            // Entries dropped from the outline must not steal the highlight.
            let targets = ids
                .into_iter()
                .zip(elements)
                .filter(|(id, _)| trails.contains_key(id))
                .collect();
            let sync = ScrollSync {
                targets,
                trails,
                threshold: cfg.threshold,
                expand: cfg.expand_on_scroll,
                signals,
            };
            sync.update();
            window_event_listener(ev::scroll, move |_ev: web_sys::Event| sync.update())
        });

        log!("[pagetoc] mounted #{} with {entries} entries", cfg.container_id);

        Ok(Some(MountedToc {
            view: Some(view),
            scroll,
            signals,
            entries,
        }))
    }
}

/// Remove every element carrying the widget's container id.
pub fn remove_containers(document: &web_sys::Document, container_id: &str) -> TocResult<usize> {
    let nodes = document.query_selector_all(&format!("[id=\"{container_id}\"]"))?;
    let mut removed = 0;
    for i in 0..nodes.length() {
        if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
            el.remove();
            removed += 1;
        }
    }
    Ok(removed)
}

/// Hide the markdown-generated TOC: the first list in `main` whose first
/// link points at a fragment.
pub fn hide_inline_toc(document: &web_sys::Document) -> TocResult<bool> {
    let Some(list) = document.query_selector("main ul")? else {
        return Ok(false);
    };
    let Some(first_link) = list.query_selector("a")? else {
        return Ok(false);
    };
    let is_fragment = first_link
        .get_attribute("href")
        .map(|h| h.starts_with('#'))
        .unwrap_or(false);
    if !is_fragment {
        return Ok(false);
    }

    let list: web_sys::HtmlElement = list
        .dyn_into()
        .map_err(|_| TocError::Dom("inline TOC list is not an HTML element".to_string()))?;
    list.style().set_property("display", "none")?;
    Ok(true)
}
