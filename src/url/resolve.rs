use url::Url;

/// Resolves an `href` found on `base_url` to an absolute HTTP(S) URL
///
/// Returns None if the link should not be followed:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that do not resolve to an http or https URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_harvest::url::resolve_link;
///
/// let base = Url::parse("https://doctorofcredit.com/page/2/").unwrap();
/// assert_eq!(
///     resolve_link("/page/3/", &base).unwrap().as_str(),
///     "https://doctorofcredit.com/page/3/"
/// );
/// assert!(resolve_link("#comments", &base).is_none());
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
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

    let resolved = base_url.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}
