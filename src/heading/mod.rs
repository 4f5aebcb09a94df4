use crate::error::TocResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use wasm_bindgen::JsCast;

/// One linkable section heading, in document order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// A heading element as read from the page, before any filtering.
#[derive(Clone, Debug, Default)]
pub struct RawHeading {
    /// Tag name as reported by the DOM (`H2`, `h3`, ...).
    pub tag: String,
    pub id: Option<String>,
    pub text: String,
    /// Set when the element sits inside the widget itself or inside a
    /// region that should never feed the outline (an existing nav, say).
    pub excluded_scope: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectOptions {
    pub min_level: u8,
    pub max_level: u8,
    pub dedup_text: bool,
    pub excluded_ids: Vec<String>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 3,
            dedup_text: false,
            excluded_ids: Vec::new(),
        }
    }
}

/// `h1`..`h6` → 1..6, anything else → `None`.
pub fn heading_level(tag: &str) -> Option<u8> {
    let digits = tag.strip_prefix(['h', 'H'])?;
    match digits.parse::<u8>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

/// Filter raw headings down to the ones the outline can link to.
///
/// Each raw heading carries a payload (the DOM element during a real scan)
/// that is handed back alongside the surviving heading. First occurrence
/// wins for both duplicate ids and, when enabled, duplicate text.
pub fn collect_headings<T>(
    raw: impl IntoIterator<Item = (RawHeading, T)>,
    opts: &CollectOptions,
) -> Vec<(Heading, T)> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_text: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (h, payload) in raw {
        let Some(level) = heading_level(&h.tag) else {
            continue;
        };
        if level < opts.min_level || level > opts.max_level {
            continue;
        }

        let Some(id) = h.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
            continue;
        };
        if opts.excluded_ids.iter().any(|x| x == id) {
            continue;
        }
        if h.excluded_scope {
            continue;
        }
        if seen_ids.contains(id) {
            continue;
        }

        let text = h.text.trim();
        if opts.dedup_text && !seen_text.insert(text.to_string()) {
            continue;
        }

        seen_ids.insert(id.to_string());
        out.push((
            Heading {
                level,
                id: id.to_string(),
                text: text.to_string(),
            },
            payload,
        ));
    }

    out
}

/// Payload-free variant of [`collect_headings`].
pub fn filter_headings(raw: Vec<RawHeading>, opts: &CollectOptions) -> Vec<Heading> {
    collect_headings(raw.into_iter().map(|h| (h, ())), opts)
        .into_iter()
        .map(|(h, _)| h)
        .collect()
}

/// Where to look for headings, and which regions to ignore.
#[derive(Clone, Debug)]
pub struct ScanScope<'a> {
    pub selector: &'a str,
    pub container_id: &'a str,
    /// Extra selector whose descendants never feed the outline; may be empty.
    pub skip_within: &'a str,
}

/// Whether `el` or one of its ancestors carries `id`. Compared directly so
/// ids that are not valid CSS identifiers (`2toc`) need no escaping.
pub fn has_ancestor_with_id(el: &web_sys::Element, id: &str) -> bool {
    if id.is_empty() {
        return false;
    }
    let mut current = Some(el.clone());
    while let Some(node) = current {
        if node.id() == id {
            return true;
        }
        current = node.parent_element();
    }
    false
}

/// Run the scope selector against the document and collect linkable headings
/// together with their elements.
pub fn scan_document(
    document: &web_sys::Document,
    scope: &ScanScope<'_>,
    opts: &CollectOptions,
) -> TocResult<Vec<(Heading, web_sys::Element)>> {
    let nodes = document.query_selector_all(scope.selector)?;

    let mut raw = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };

        let inside_widget = has_ancestor_with_id(&el, scope.container_id);
        let inside_skipped = if scope.skip_within.trim().is_empty() {
            false
        } else {
            el.closest(scope.skip_within)?.is_some()
        };

        let id = el.id();
        let h = RawHeading {
            tag: el.tag_name(),
            id: (!id.is_empty()).then_some(id),
            text: el.text_content().unwrap_or_default(),
            excluded_scope: inside_widget || inside_skipped,
        };
        raw.push((h, el));
    }

    Ok(collect_headings(raw, opts))
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

    fn ids(hs: &[Heading]) -> Vec<&str> {
        hs.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("H1"), Some(1));
        assert_eq!(heading_level("h3"), Some(3));
        assert_eq!(heading_level("H7"), None);
        assert_eq!(heading_level("H0"), None);
        assert_eq!(heading_level("HEADER"), None);
        assert_eq!(heading_level("DIV"), None);
    }

    #[test]
    fn test_headings_without_id_are_skipped() {
        let hs = filter_headings(
            vec![
                raw("H2", Some("a"), "A"),
                raw("H2", None, "No id"),
                raw("H2", Some("  "), "Blank id"),
                raw("H3", Some("b"), "B"),
            ],
            &CollectOptions::default(),
        );
        assert_eq!(ids(&hs), vec!["a", "b"]);
    }

    #[test]
    fn test_text_is_trimmed() {
        let hs = filter_headings(
            vec![raw("H2", Some("a"), "\n   Getting started  \n")],
            &CollectOptions::default(),
        );
        assert_eq!(hs[0].text, "Getting started");
        assert_eq!(hs[0].level, 2);
    }

    #[test]
    fn test_levels_outside_range_are_skipped() {
        let opts = CollectOptions {
            min_level: 2,
            max_level: 3,
            ..Default::default()
        };
        let hs = filter_headings(
            vec![
                raw("H1", Some("title"), "Title"),
                raw("H2", Some("a"), "A"),
                raw("H4", Some("deep"), "Deep"),
                raw("H3", Some("b"), "B"),
            ],
            &opts,
        );
        assert_eq!(ids(&hs), vec!["a", "b"]);
    }

    #[test]
    fn test_dedup_by_text_keeps_first() {
        let opts = CollectOptions {
            dedup_text: true,
            ..Default::default()
        };
        let hs = filter_headings(
            vec![raw("H2", Some("intro"), "Intro"), raw("H3", Some("intro-1"), " Intro ")],
            &opts,
        );
        assert_eq!(ids(&hs), vec!["intro"]);
    }

    #[test]
    fn test_duplicate_text_kept_without_dedup() {
        let hs = filter_headings(
            vec![raw("H2", Some("intro"), "Intro"), raw("H3", Some("intro-1"), "Intro")],
            &CollectOptions::default(),
        );
        assert_eq!(hs.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let hs = filter_headings(
            vec![raw("H2", Some("a"), "First"), raw("H3", Some("a"), "Second")],
            &CollectOptions::default(),
        );
        assert_eq!(hs.len(), 1);
        assert_eq!(hs[0].text, "First");
    }

    #[test]
    fn test_excluded_ids_and_scope() {
        let opts = CollectOptions {
            excluded_ids: vec!["license".to_string(), "citation".to_string()],
            ..Default::default()
        };
        let mut in_nav = raw("H2", Some("nav-title"), "On this page");
        in_nav.excluded_scope = true;

        let hs = filter_headings(
            vec![
                raw("H2", Some("usage"), "Usage"),
                raw("H2", Some("license"), "License"),
                in_nav,
                raw("H2", Some("citation"), "Citation"),
            ],
            &opts,
        );
        assert_eq!(ids(&hs), vec!["usage"]);
    }

    #[test]
    fn test_excluded_heading_text_does_not_block_later_duplicate() {
        let opts = CollectOptions {
            dedup_text: true,
            ..Default::default()
        };
        let hs = filter_headings(
            vec![raw("H2", None, "Usage"), raw("H2", Some("usage"), "Usage")],
            &opts,
        );
        assert_eq!(ids(&hs), vec!["usage"]);
    }

    #[test]
    fn test_payload_follows_heading() {
        let out = collect_headings(
            vec![
                (raw("H2", None, "skip"), 0usize),
                (raw("H2", Some("a"), "A"), 1),
                (raw("H3", Some("b"), "B"), 2),
            ],
            &CollectOptions::default(),
        );
        let payloads: Vec<usize> = out.iter().map(|(_, p)| *p).collect();
        assert_eq!(payloads, vec![1, 2]);
    }
}
