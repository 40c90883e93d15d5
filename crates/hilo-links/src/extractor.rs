//! A compiled extractor: one site family's domains, ordered patterns,
//! content table and display fields.

use std::collections::{BTreeMap, HashMap, HashSet};

use hilo_core::entities::{DisplayField, LinkDescriptor};
use regex::{Captures, Regex};

use crate::error::RegistryError;
use crate::host::{ParsedUrl, decode_component, host_matches_suffix};
use crate::record::{PatternRecord, PostProcessor, SiteRecord};

/// Content type of the descriptor returned when a claimed host matches no pattern.
pub const FALLBACK_CONTENT_TYPE: &str = "link";
const FALLBACK_LABEL: &str = "Enlace";

#[derive(Debug, Clone)]
struct ContentEntry {
    emoji: String,
    label: String,
}

#[derive(Debug)]
struct CompiledPattern {
    content_type: String,
    path: Regex,
    host: Option<Regex>,
    fragment: Option<Regex>,
    query: BTreeMap<String, String>,
    requires: Vec<String>,
    guard: Option<String>,
    set: BTreeMap<String, String>,
    post: Option<PostProcessor>,
}

/// Result of the first pattern that accepted a URL.
#[derive(Debug)]
struct PatternMatch {
    content_type: String,
    fields: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct Extractor {
    key: String,
    site_name: String,
    emoji: String,
    domains: HashSet<String>,
    suffixes: Vec<String>,
    reserved: HashSet<String>,
    content: HashMap<String, ContentEntry>,
    display: Vec<DisplayField>,
    patterns: Vec<CompiledPattern>,
}

impl Extractor {
    /// Compile a record. Every regex is compiled and every content type a
    /// pattern can produce must have a content entry.
    pub(crate) fn compile(key: &str, record: SiteRecord) -> Result<Self, RegistryError> {
        let content: HashMap<String, ContentEntry> = record
            .content
            .into_iter()
            .map(|c| {
                (
                    c.content_type,
                    ContentEntry {
                        emoji: c.emoji,
                        label: c.label,
                    },
                )
            })
            .collect();

        let patterns = record
            .patterns
            .into_iter()
            .map(|p| compile_pattern(key, p))
            .collect::<Result<Vec<_>, _>>()?;

        for pattern in &patterns {
            let mut produced = vec![pattern.content_type.as_str()];
            if let Some(PostProcessor::QueryVariant { variants, .. }) = &pattern.post {
                produced.extend(variants.values().map(String::as_str));
            }
            if let Some(missing) = produced.into_iter().find(|ct| !content.contains_key(*ct)) {
                return Err(RegistryError::MissingContent {
                    site: key.to_string(),
                    content_type: missing.to_string(),
                });
            }
        }

        Ok(Self {
            key: key.to_string(),
            site_name: record.site_name,
            emoji: record.emoji,
            domains: record.domains.into_iter().map(|d| d.to_ascii_lowercase()).collect(),
            suffixes: record.suffixes.into_iter().map(|d| d.to_ascii_lowercase()).collect(),
            reserved: record
                .reserved_slugs
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
            content,
            display: record.display,
            patterns,
        })
    }

    /// Registry key (file stem of the record).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    #[must_use]
    pub fn claims_exact(&self, host: &str) -> bool {
        self.domains.contains(host)
    }

    #[must_use]
    pub fn claims_suffix(&self, host: &str) -> bool {
        self.suffixes.iter().any(|s| host_matches_suffix(host, s))
    }

    #[must_use]
    pub fn is_reserved(&self, slug: &str) -> bool {
        self.reserved.contains(&slug.to_lowercase())
    }

    /// Describe a URL whose host this extractor claims. The first accepting
    /// pattern wins; a claimed URL no pattern accepts gets the site fallback.
    #[must_use]
    pub fn describe(&self, url: &ParsedUrl) -> LinkDescriptor {
        self.patterns
            .iter()
            .find_map(|p| self.apply(p, url))
            .map_or_else(|| self.fallback(), |m| self.build(m))
    }

    fn apply(&self, pattern: &CompiledPattern, url: &ParsedUrl) -> Option<PatternMatch> {
        if let Some(host_re) = &pattern.host
            && !host_re.is_match(&url.host)
        {
            return None;
        }
        let caps = pattern.path.captures(&url.path)?;
        let fragment_caps = match &pattern.fragment {
            Some(fragment_re) => Some(fragment_re.captures(url.fragment.as_deref()?)?),
            None => None,
        };
        if !pattern
            .requires
            .iter()
            .all(|param| url.query_param(param).is_some())
        {
            return None;
        }

        let mut fields = BTreeMap::new();
        insert_captures(&mut fields, &pattern.path, &caps);
        if let (Some(fragment_re), Some(fragment_caps)) = (&pattern.fragment, &fragment_caps) {
            insert_captures(&mut fields, fragment_re, fragment_caps);
        }
        for (param, field) in &pattern.query {
            if let Some(value) = url.query_param(param) {
                fields
                    .entry(field.clone())
                    .or_insert_with(|| value.to_string());
            }
        }
        for (field, value) in &pattern.set {
            fields.insert(field.clone(), value.clone());
        }

        let mut content_type = pattern.content_type.clone();
        match &pattern.post {
            Some(PostProcessor::QueryVariant { param, variants }) => {
                if let Some(variant) = url.query_param(param).and_then(|v| variants.get(v)) {
                    content_type.clone_from(variant);
                }
            }
            Some(PostProcessor::SubdomainPrefix { subdomains }) => {
                let label = url.first_label();
                if subdomains.iter().any(|s| s == label) {
                    content_type = format!("{label}_{content_type}");
                }
            }
            Some(PostProcessor::HostLabel { field, exclude }) => {
                let label = self.publication_label(url);
                if label.is_empty() || exclude.iter().any(|e| e == label) {
                    return None;
                }
                fields.insert(field.clone(), label.to_string());
            }
            None => {}
        }

        if let Some(guard) = &pattern.guard
            && fields.get(guard).is_some_and(|v| self.is_reserved(v))
        {
            return None;
        }

        Some(PatternMatch {
            content_type,
            fields,
        })
    }

    /// Label naming whoever publishes under a host: the subdomain of a
    /// claimed suffix (`team.medium.com`), otherwise the registrable label
    /// (`levelup.gitconnected.com` -> `gitconnected`).
    fn publication_label<'u>(&self, url: &'u ParsedUrl) -> &'u str {
        let under_suffix = self
            .suffixes
            .iter()
            .any(|s| url.host != *s && host_matches_suffix(&url.host, s));
        if under_suffix {
            url.first_label()
        } else {
            url.registrable_label()
        }
    }

    /// Content entry for a type, falling back to the unprefixed type
    /// (`music_video` -> `video`).
    fn entry(&self, content_type: &str) -> Option<&ContentEntry> {
        self.content.get(content_type).or_else(|| {
            content_type
                .split_once('_')
                .and_then(|(_, base)| self.content.get(base))
        })
    }

    fn build(&self, m: PatternMatch) -> LinkDescriptor {
        let (emoji, label) = self.entry(&m.content_type).map_or_else(
            || (self.emoji.clone(), FALLBACK_LABEL.to_string()),
            |e| (e.emoji.clone(), e.label.clone()),
        );
        let display = self
            .display
            .iter()
            .filter(|d| m.fields.get(&d.field).is_some_and(|v| !v.is_empty()))
            .cloned()
            .collect();
        LinkDescriptor {
            site_name: self.site_name.clone(),
            emoji,
            content_type: m.content_type,
            label,
            fields: m.fields,
            display,
        }
    }

    fn fallback(&self) -> LinkDescriptor {
        LinkDescriptor {
            site_name: self.site_name.clone(),
            emoji: self.emoji.clone(),
            content_type: FALLBACK_CONTENT_TYPE.to_string(),
            label: FALLBACK_LABEL.to_string(),
            fields: BTreeMap::new(),
            display: Vec::new(),
        }
    }
}

fn insert_captures(fields: &mut BTreeMap<String, String>, re: &Regex, caps: &Captures<'_>) {
    for name in re.capture_names().flatten() {
        if let Some(m) = caps.name(name)
            && !m.as_str().is_empty()
        {
            fields.insert(name.to_string(), decode_component(m.as_str()));
        }
    }
}

fn compile_pattern(site: &str, record: PatternRecord) -> Result<CompiledPattern, RegistryError> {
    let compile = |source: &str| {
        Regex::new(source).map_err(|e| RegistryError::InvalidRegex {
            site: site.to_string(),
            pattern: source.to_string(),
            source: e,
        })
    };
    Ok(CompiledPattern {
        path: compile(&record.path)?,
        host: record.host.as_deref().map(compile).transpose()?,
        fragment: record.fragment.as_deref().map(compile).transpose()?,
        content_type: record.content_type,
        query: record.query,
        requires: record.requires,
        guard: record.guard,
        set: record.set,
        post: record.post,
    })
}
