use url::Url;

/// Parses a URL string into its canonical identity form
///
/// # Normalization Steps
///
/// 1. Parse the URL (the parser lowercases scheme and host, drops default
///    ports and resolves dot segments)
/// 2. Remove the fragment, since `page.html#top` and `page.html` name the
///    same document
///
/// Two URLs are the same resource iff their normalized forms are equal.
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80/a/../docs/page.html#intro").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/docs/page.html");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, url::ParseError> {
    Url::parse(url_str).map(strip_fragment)
}

/// Removes the fragment from an already parsed URL
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
