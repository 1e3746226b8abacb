use url::Url;

/// Hosts listing pages may be fetched from
///
/// Patterns are either an exact host ("doctorofcredit.com") or a wildcard
/// ("*.example.com") matching the bare domain and every subdomain. Hosts are
/// compared lowercase.
#[derive(Debug, Clone, Default)]
pub struct DomainAllowList {
    patterns: Vec<String>,
}

impl DomainAllowList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the URL's host matches one of the patterns
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use doc_harvest::url::DomainAllowList;
    ///
    /// let allow = DomainAllowList::new(&["doctorofcredit.com", "www.doctorofcredit.com"]);
    /// assert!(allow.permits(&Url::parse("https://www.doctorofcredit.com/page/2/").unwrap()));
    /// assert!(!allow.permits(&Url::parse("https://cdn.doctorofcredit.com/x.png").unwrap()));
    /// ```
    pub fn permits(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.permits_host(&host.to_lowercase()),
            None => false,
        }
    }

    /// Returns true if a lowercase host matches one of the patterns
    pub fn permits_host(&self, host: &str) -> bool {
        self.patterns.iter().any(|p| matches_pattern(p, host))
    }
}

fn matches_pattern(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}
