use serde::{Deserialize, Serialize};

/// What kind of documentation page the widget is running on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PageKind {
    Home,
    Reference,
    Article,
    Changelog,
    Other,
}

/// Classify a page by its URL path and by whether it carries the home marker.
///
/// The marker wins over the path. License and author pages are grouped with
/// the reference section.
pub fn classify_page(path: &str, has_home_marker: bool) -> PageKind {
    if has_home_marker {
        return PageKind::Home;
    }

    let path = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());

    if path.contains("/reference/") || path.contains("LICENSE") || path.contains("authors.html") {
        PageKind::Reference
    } else if path.contains("/articles/") {
        PageKind::Article
    } else if path.contains("/news/") {
        PageKind::Changelog
    } else {
        PageKind::Other
    }
}

/// Which pages receive the widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "kinds")]
pub enum Eligibility {
    Always,
    HomeOnly,
    Exclude(Vec<PageKind>),
}

impl Eligibility {
    pub fn allows(&self, kind: PageKind) -> bool {
        match self {
            Eligibility::Always => true,
            Eligibility::HomeOnly => kind == PageKind::Home,
            Eligibility::Exclude(kinds) => !kinds.contains(&kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_wins_over_path() {
        assert_eq!(classify_page("/reference/foo.html", true), PageKind::Home);
    }

    #[test]
    fn test_classify_by_path_segment() {
        assert_eq!(classify_page("/pkg/reference/index.html", false), PageKind::Reference);
        assert_eq!(classify_page("/pkg/articles/intro.html", false), PageKind::Article);
        assert_eq!(classify_page("/pkg/news/index.html", false), PageKind::Changelog);
        assert_eq!(classify_page("/pkg/index.html", false), PageKind::Other);
        assert_eq!(classify_page("/", false), PageKind::Other);
    }

    #[test]
    fn test_license_and_authors_are_reference() {
        assert_eq!(classify_page("/pkg/LICENSE-text.html", false), PageKind::Reference);
        assert_eq!(classify_page("/pkg/authors.html", false), PageKind::Reference);
    }

    #[test]
    fn test_classify_decodes_percent_escapes() {
        assert_eq!(classify_page("/pkg%2Freference%2Fx.html", false), PageKind::Reference);
    }

    #[test]
    fn test_eligibility_rules() {
        assert!(Eligibility::Always.allows(PageKind::Changelog));

        assert!(Eligibility::HomeOnly.allows(PageKind::Home));
        assert!(!Eligibility::HomeOnly.allows(PageKind::Other));

        let rule = Eligibility::Exclude(vec![PageKind::Reference, PageKind::Article]);
        assert!(!rule.allows(PageKind::Reference));
        assert!(!rule.allows(PageKind::Article));
        assert!(rule.allows(PageKind::Other));
        assert!(rule.allows(PageKind::Home));
    }

    #[test]
    fn test_page_kind_display() {
        assert_eq!(PageKind::Changelog.to_string(), "changelog");
        assert_eq!(PageKind::Home.as_ref(), "home");
    }

    #[test]
    fn test_eligibility_deserialize() {
        // "news" is a path segment, not a page kind name.
        assert!(
            serde_json::from_str::<Eligibility>(r#"{"rule": "exclude", "kinds": ["news"]}"#)
                .is_err()
        );

        let rule: Eligibility =
            serde_json::from_str(r#"{"rule": "exclude", "kinds": ["changelog"]}"#)
                .expect("exclude rule should parse");
        assert_eq!(rule, Eligibility::Exclude(vec![PageKind::Changelog]));

        let rule: Eligibility =
            serde_json::from_str(r#"{"rule": "home_only"}"#).expect("home_only should parse");
        assert_eq!(rule, Eligibility::HomeOnly);
    }
}
