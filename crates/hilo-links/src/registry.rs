//! Ordered extractor registry and the `classify` entry point.
//!
//! The registration order lives in `registry.toml`, never in code, and is
//! authoritative for host dispatch: exact domains, then the host without
//! `www.`, then suffix rules, each checked across extractors in order.

use std::path::Path;

use hilo_core::entities::LinkDescriptor;

use crate::error::RegistryError;
use crate::extractor::Extractor;
use crate::host::{ParsedUrl, UNKNOWN_SITE, generic_site_name};
use crate::record::{RegistryOrder, SiteRecord};

const BUILTIN_ORDER: &str = include_str!("../data/registry.toml");

const BUILTIN_SITES: &[(&str, &str)] = &[
    ("instagram", include_str!("../data/sites/instagram.toml")),
    ("youtube", include_str!("../data/sites/youtube.toml")),
    ("twitter", include_str!("../data/sites/twitter.toml")),
    ("github", include_str!("../data/sites/github.toml")),
    ("reddit", include_str!("../data/sites/reddit.toml")),
    ("facebook", include_str!("../data/sites/facebook.toml")),
    ("linkedin", include_str!("../data/sites/linkedin.toml")),
    ("threads", include_str!("../data/sites/threads.toml")),
    ("whatsapp", include_str!("../data/sites/whatsapp.toml")),
    ("discord", include_str!("../data/sites/discord.toml")),
    ("flickr", include_str!("../data/sites/flickr.toml")),
    ("likee", include_str!("../data/sites/likee.toml")),
    ("medium", include_str!("../data/sites/medium.toml")),
    ("pinterest", include_str!("../data/sites/pinterest.toml")),
    ("snapchat", include_str!("../data/sites/snapchat.toml")),
    ("stackoverflow", include_str!("../data/sites/stackoverflow.toml")),
    ("tumblr", include_str!("../data/sites/tumblr.toml")),
    ("amazon", include_str!("../data/sites/amazon.toml")),
    ("gitlab", include_str!("../data/sites/gitlab.toml")),
    ("google", include_str!("../data/sites/google.toml")),
    ("imgur", include_str!("../data/sites/imgur.toml")),
    ("telegram", include_str!("../data/sites/telegram.toml")),
];

/// Immutable, ordered set of extractors. Build once and share by reference.
#[derive(Debug)]
pub struct LinkRegistry {
    extractors: Vec<Extractor>,
}

impl LinkRegistry {
    /// Registry compiled from the records embedded in this crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_sources(BUILTIN_ORDER, |name| {
            BUILTIN_SITES
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, toml)| (*toml).to_string())
                .ok_or_else(|| RegistryError::UnknownSite(name.to_string()))
        })
    }

    /// Registry loaded from a directory with the builtin layout:
    /// `<dir>/registry.toml` and `<dir>/sites/<name>.toml`.
    pub fn from_dir(dir: &Path) -> Result<Self, RegistryError> {
        let order_path = dir.join("registry.toml");
        let order = std::fs::read_to_string(&order_path).map_err(|source| RegistryError::Io {
            path: order_path,
            source,
        })?;
        Self::from_sources(&order, |name| {
            let path = dir.join("sites").join(format!("{name}.toml"));
            match std::fs::read_to_string(&path) {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(RegistryError::UnknownSite(name.to_string()))
                }
                Err(source) => Err(RegistryError::Io { path, source }),
            }
        })
    }

    /// Build from an order document and a loader returning each record's TOML.
    pub fn from_sources<F>(order_toml: &str, mut load: F) -> Result<Self, RegistryError>
    where
        F: FnMut(&str) -> Result<String, RegistryError>,
    {
        let order: RegistryOrder =
            toml::from_str(order_toml).map_err(|source| RegistryError::Toml {
                site: "registry".to_string(),
                source,
            })?;

        let mut extractors: Vec<Extractor> = Vec::with_capacity(order.order.len());
        for name in &order.order {
            if extractors.iter().any(|e| e.key() == name) {
                return Err(RegistryError::DuplicateSite { site: name.clone() });
            }
            let text = load(name)?;
            let record: SiteRecord =
                toml::from_str(&text).map_err(|source| RegistryError::Toml {
                    site: name.clone(),
                    source,
                })?;
            extractors.push(Extractor::compile(name, record)?);
        }

        tracing::debug!(extractors = extractors.len(), "link registry compiled");
        Ok(Self { extractors })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Registry keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.extractors.iter().map(Extractor::key)
    }

    /// Extractor owning a lowercase host, if any.
    #[must_use]
    pub fn select(&self, host: &str) -> Option<&Extractor> {
        let bare = host.strip_prefix("www.");
        self.extractors
            .iter()
            .find(|e| e.claims_exact(host))
            .or_else(|| bare.and_then(|b| self.extractors.iter().find(|e| e.claims_exact(b))))
            .or_else(|| self.extractors.iter().find(|e| e.claims_suffix(host)))
    }

    /// Classify a URL. Total: unclaimed or malformed URLs get the generic
    /// descriptor named after the registrable domain.
    #[must_use]
    pub fn classify(&self, raw: &str) -> LinkDescriptor {
        let Some(url) = ParsedUrl::parse(raw) else {
            return LinkDescriptor::generic(UNKNOWN_SITE);
        };
        self.classify_parsed(&url)
    }

    #[must_use]
    pub fn classify_parsed(&self, url: &ParsedUrl) -> LinkDescriptor {
        self.select(&url.host).map_or_else(
            || LinkDescriptor::generic(&generic_site_name(&url.host)),
            |extractor| extractor.describe(url),
        )
    }
}
