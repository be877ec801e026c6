//! URL joining for configured endpoints and navigation targets.

/// Strip trailing slashes from a base URL.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and a path with exactly one slash between them.
///
/// ```
/// use gem_assist::utils::url::join_url;
///
/// assert_eq!(
///     join_url("https://project.example.co/", "/functions/v1/gem-assist"),
///     "https://project.example.co/functions/v1/gem-assist"
/// );
/// ```
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = normalize_base_url(base_url);
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        return base;
    }
    format!("{base}/{path}")
}

/// Resolve a site-relative navigation target such as `/contact`.
///
/// Absolute targets are returned unchanged; relative ones are joined to
/// `site_url` when one is known.
pub fn navigation_url(site_url: Option<&str>, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    match site_url.filter(|site| !site.trim().is_empty()) {
        Some(site) => join_url(site, target),
        None => target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(normalize_base_url("https://a.example/v1"), "https://a.example/v1");
        assert_eq!(normalize_base_url("https://a.example/v1///"), "https://a.example/v1");
        assert_eq!(normalize_base_url(" https://a.example/ "), "https://a.example");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn join_handles_slashes_on_both_sides() {
        let expected = "https://a.example/functions/v1/contact-form";
        for (base, path) in [
            ("https://a.example", "functions/v1/contact-form"),
            ("https://a.example/", "functions/v1/contact-form"),
            ("https://a.example", "/functions/v1/contact-form"),
            ("https://a.example//", "///functions/v1/contact-form"),
        ] {
            assert_eq!(join_url(base, path), expected, "base={base} path={path}");
        }
        assert_eq!(join_url("https://a.example/", ""), "https://a.example");
    }

    #[test]
    fn navigation_targets_resolve_against_site() {
        assert_eq!(
            navigation_url(Some("https://gem.example/"), "/contact"),
            "https://gem.example/contact"
        );
        assert_eq!(navigation_url(None, "/contact"), "/contact");
        assert_eq!(navigation_url(Some(""), "/contact"), "/contact");
        assert_eq!(
            navigation_url(Some("https://gem.example"), "https://other.example/x"),
            "https://other.example/x"
        );
    }
}
