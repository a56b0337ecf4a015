use url::Url;

/// Resolves a link href to an absolute URL string
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that do not resolve to HTTP(S)
///
/// # Examples
///
/// ```
/// use anime_harvest::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/catalogue?page=2").unwrap();
/// assert_eq!(
///     resolve_link("/catalogue/frieren/", &base),
///     Some("https://example.com/catalogue/frieren/".to_string())
/// );
/// assert_eq!(resolve_link("javascript:void(0)", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

/// Returns `base` with `key=value` set in its query string
///
/// An existing parameter with the same key is replaced; other parameters keep
/// their order.
pub fn with_query_param(base: &Url, key: &str, value: &str) -> Url {
    let mut url = base.clone();

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(key, value);
    }

    url
}
