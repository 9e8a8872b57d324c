use url::Url;

/// Decides whether a link leaves the site.
#[derive(Debug, Clone, Default)]
pub struct LinkPolicy {
    own_domains: Vec<String>,
}

impl LinkPolicy {
    pub fn new(own_domains: &[String]) -> Self {
        let own_domains = own_domains.iter()
            .map(|d| d.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        LinkPolicy { own_domains }
    }

    /// Absolute `http(s)://` and protocol relative `//` links are external
    /// unless they point at one of our own domains or a subdomain of one.
    /// Everything else (relative paths, anchors, mailto) is internal.
    pub fn is_external(&self, href: &str) -> bool {
        let href = href.trim();
        let lower = href.to_ascii_lowercase();
        let absolute = if lower.starts_with("http://") || lower.starts_with("https://") {
            href.to_string()
        } else if lower.starts_with("//") {
            format!("https:{}", href)
        } else {
            return false;
        };

        match Url::parse(&absolute).ok().and_then(|u| u.host_str().map(|h| h.to_string())) {
            Some(host) => !self.is_own_host(&host),
            None => true,
        }
    }

    fn is_own_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.own_domains.iter().any(|domain| {
            host == *domain || host.ends_with(&format!(".{}", domain))
        })
    }
}
