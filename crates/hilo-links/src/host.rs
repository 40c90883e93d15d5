//! URL parsing helpers shared by the registry and the file-type detector.

use url::Url;

/// Site name used when a URL cannot be parsed at all.
pub const UNKNOWN_SITE: &str = "Web";

/// Second-level labels that form a public suffix together with a
/// two-letter country code (`co.uk`, `com.mx`, `gob.ar`, ...).
const COUNTRY_SECOND_LEVELS: &[&str] = &["co", "com", "org", "net", "gob", "gov", "edu", "ac", "ne", "or"];

/// The parts of a URL the extractors look at.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    /// Lowercase host without a trailing dot.
    pub host: String,
    /// Percent-encoded path, always starting with `/`.
    pub path: String,
    /// Decoded query pairs in order of appearance.
    pub query: Vec<(String, String)>,
    /// Percent-encoded fragment without the `#`, `None` when absent or empty.
    pub fragment: Option<String>,
}

impl ParsedUrl {
    /// Parse an absolute URL with a host. Returns `None` otherwise.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return None;
        }
        let path = match url.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let fragment = url.fragment().filter(|f| !f.is_empty()).map(str::to_string);
        Some(Self {
            host,
            path,
            query,
            fragment,
        })
    }

    /// First non-empty value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Host without a leading `www.`.
    #[must_use]
    pub fn bare_host(&self) -> &str {
        self.host.strip_prefix("www.").unwrap_or(&self.host)
    }

    /// First label of the host (`music` for `music.youtube.com`).
    #[must_use]
    pub fn first_label(&self) -> &str {
        self.host.split('.').next().unwrap_or_default()
    }

    /// Registrable label of the host (`devgenius` for `blog.devgenius.io`).
    #[must_use]
    pub fn registrable_label(&self) -> &str {
        registrable_label(&self.host)
    }

    /// Last path segment, percent-decoded. Empty for `/` and trailing slashes.
    #[must_use]
    pub fn file_name(&self) -> String {
        let last = self.path.rsplit('/').next().unwrap_or_default();
        decode_component(last)
    }
}

/// `true` when `host` equals `domain` or is one of its subdomains.
#[must_use]
pub fn host_matches_suffix(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
}

/// Percent-decode a URL component, keeping the raw text when it is not valid UTF-8.
#[must_use]
pub fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |s| s.into_owned())
}

/// Capitalized registrable label of a host: `Example` for `www.example.com`,
/// `Bbc` for `news.bbc.co.uk`. IP literals are returned as-is.
#[must_use]
pub fn generic_site_name(host: &str) -> String {
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return UNKNOWN_SITE.to_string();
    }
    if host.parse::<std::net::IpAddr>().is_ok() || host.starts_with('[') {
        return host.to_string();
    }

    capitalize(registrable_label(host))
}

/// Label just left of the public suffix, treating `<sld>.<cc>` pairs such as
/// `co.uk` and `com.mx` as one suffix. Empty for an empty host.
fn registrable_label(host: &str) -> &str {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.as_slice() {
        [] => "",
        [only] => *only,
        [.., sld, tld]
            if labels.len() >= 3 && tld.len() == 2 && COUNTRY_SECOND_LEVELS.contains(sld) =>
        {
            labels[labels.len() - 3]
        }
        [.., sld, _] => *sld,
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    chars.next().map_or_else(
        || UNKNOWN_SITE.to_string(),
        |first| first.to_uppercase().chain(chars).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_names_use_registrable_label() {
        assert_eq!(generic_site_name("www.example.com"), "Example");
        assert_eq!(generic_site_name("news.bbc.co.uk"), "Bbc");
        assert_eq!(generic_site_name("mercadolibre.com.mx"), "Mercadolibre");
        assert_eq!(generic_site_name("localhost"), "Localhost");
        assert_eq!(generic_site_name("192.168.1.10"), "192.168.1.10");
        assert_eq!(generic_site_name(""), "Web");
    }

    #[test]
    fn keeps_non_empty_fragment() {
        let url = ParsedUrl::parse("https://mail.google.com/mail/u/0/#inbox/FMfcgz").unwrap();
        assert_eq!(url.fragment.as_deref(), Some("inbox/FMfcgz"));
        let bare = ParsedUrl::parse("https://example.com/page#").unwrap();
        assert_eq!(bare.fragment, None);
    }

    #[test]
    fn registrable_label_skips_subdomains() {
        let label = |raw: &str| ParsedUrl::parse(raw).unwrap().registrable_label().to_string();
        assert_eq!(label("https://blog.devgenius.io/x"), "devgenius");
        assert_eq!(label("https://levelup.gitconnected.com/"), "gitconnected");
        assert_eq!(label("https://shop.example.com.mx/"), "example");
    }

    #[test]
    fn suffix_matching_requires_label_boundary() {
        assert!(host_matches_suffix("music.youtube.com", "youtube.com"));
        assert!(host_matches_suffix("youtube.com", "youtube.com"));
        assert!(!host_matches_suffix("notyoutube.com", "youtube.com"));
    }

    #[test]
    fn parses_query_and_file_name() {
        let url = ParsedUrl::parse("HTTPS://WWW.Example.com/docs/informe%20final.pdf?a=&a=2")
            .unwrap();
        assert_eq!(url.host, "www.example.com");
        assert_eq!(url.bare_host(), "example.com");
        assert_eq!(url.query_param("a"), Some("2"));
        assert_eq!(url.file_name(), "informe final.pdf");
        assert_eq!(url.fragment, None);
        assert!(ParsedUrl::parse("not a url").is_none());
        assert!(ParsedUrl::parse("mailto:someone@example.com").is_none());
    }
}
