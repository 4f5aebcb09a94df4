//! Table-of-contents widget for static documentation pages.
//!
//! Compiled to WebAssembly and loaded by the page. On document-ready it
//! scans the rendered headings, builds a nested outline and mounts it in a
//! panel appended to `<body>`, with a collapse toggle, an optional resize
//! handle and scroll-synchronized highlighting.
//!
//! The page can set `window.TOC_CONFIG` before the module loads, either to a
//! preset name (`"dev"`, `"pkgdown"`, `"site"`) or to an object of field
//! overrides, see [`TocConfig::from_json`].

mod config;
mod error;
mod heading;
mod outline;
mod page;
mod resize;
mod scrollspy;
mod toc;
mod widget;

pub use config::{EmptyPolicy, Preset, TocConfig};
pub use error::{TocError, TocResult};
pub use heading::{collect_headings, filter_headings, CollectOptions, Heading, RawHeading};
pub use outline::{OrphanPolicy, OutlineNode, OutlineTree};
pub use page::{classify_page, Eligibility, PageKind};
pub use resize::{panel_width, ResizeBounds};
pub use scrollspy::{active_heading, ActiveState, Threshold};
pub use toc::{MountedToc, TocBuilder};

use leptos::logging::error;
use std::cell::RefCell;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsCast;

thread_local! {
    /// The widget installed by the exported entry points.
    static INSTALLED: RefCell<Option<MountedToc>> = const { RefCell::new(None) };
}

/// Tear down whatever the entry points installed earlier, then build afresh
/// from the current `window.TOC_CONFIG`.
fn install() {
    teardown();

    let builder = TocBuilder::new(TocConfig::from_window());
    match builder.run() {
        Ok(mounted) => INSTALLED.with(|slot| *slot.borrow_mut() = mounted),
        Err(e) => error!("[pagetoc] failed to build TOC: {e}"),
    }
}

fn teardown() {
    let previous = INSTALLED.with(|slot| slot.borrow_mut().take());
    drop(previous);
}

/// Run `f` once the DOM is parsed.
fn on_document_ready(f: impl FnOnce() + 'static) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() != "loading" {
        f();
        return;
    }

    let cb = wasm_bindgen::closure::Closure::once_into_js(f);
    let options = web_sys::AddEventListenerOptions::new();
    options.set_once(true);
    if let Err(e) = document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        cb.unchecked_ref(),
        &options,
    ) {
        error!("[pagetoc] could not wait for DOMContentLoaded: {}", TocError::from(e));
    }
}

/// Rebuild the widget, e.g. after a client-side navigation swapped the page
/// content without a full reload.
#[wasm_bindgen(js_name = rebuildToc)]
pub fn rebuild_toc() {
    install();
}

/// Remove the widget and its listeners.
#[wasm_bindgen(js_name = removeToc)]
pub fn remove_toc() {
    teardown();
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    on_document_ready(install);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tag: &str, id: Option<&str>, text: &str) -> RawHeading {
        RawHeading {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            text: text.to_string(),
            excluded_scope: false,
        }
    }

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_site_pipeline_from_raw_headings() {
        let cfg = TocConfig::preset(Preset::Site);
        let headings = filter_headings(
            vec![
                raw("H1", Some("pkg"), "pkg"),
                raw("H2", Some("installation"), "Installation"),
                raw("H3", Some("installation-1"), "Installation"),
                raw("H3", Some("from-github"), "From GitHub"),
                raw("H2", Some("license"), "License"),
                raw("H2", None, "Unanchored"),
                raw("H2", Some("usage"), "Usage"),
            ],
            &cfg.collect_options(),
        );
        let tree = OutlineTree::build(headings, cfg.min_level, cfg.orphans);

        assert_eq!(tree.roots().len(), 1);
        let pkg = &tree.roots()[0];
        let sections: Vec<&str> = pkg.children.iter().map(|n| n.heading.text.as_str()).collect();
        assert_eq!(sections, vec!["Installation", "Usage"]);
        assert_eq!(pkg.children[0].children.len(), 1);
        assert_eq!(pkg.children[0].children[0].heading.id, "from-github");
    }

    #[test]
    fn test_dev_pipeline_drops_orphans() {
        let cfg = TocConfig::preset(Preset::Dev);
        let headings = filter_headings(
            vec![
                raw("H1", Some("pkg"), "pkg"),
                raw("H3", Some("early"), "Early"),
                raw("H2", Some("a"), "A"),
                raw("H3", Some("b"), "B"),
            ],
            &cfg.collect_options(),
        );
        let tree = OutlineTree::build(headings, cfg.min_level, cfg.orphans);
        let ids: Vec<&str> = tree.iter().map(|(_, n)| n.heading.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_scroll_highlight_expands_ancestors() {
        let headings = vec![
            Heading { level: 1, id: "pkg".into(), text: "pkg".into() },
            Heading { level: 2, id: "install".into(), text: "Install".into() },
            Heading { level: 3, id: "source".into(), text: "Source".into() },
            Heading { level: 2, id: "usage".into(), text: "Usage".into() },
        ];
        let tree = OutlineTree::build(headings, 1, OrphanPolicy::Root);
        let trails = tree.trails();

        let positions = [("pkg", -800.0), ("install", -300.0), ("source", 120.0), ("usage", 700.0)];
        let active = active_heading(positions, Threshold::Fixed(150.0).resolve(1000.0));
        let state = ActiveState::resolve(active, &trails, true);

        assert_eq!(state.active.as_deref(), Some("source"));
        assert_eq!(state.expanded, vec!["pkg", "install", "source"]);
    }
}
