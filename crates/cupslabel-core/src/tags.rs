// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Attribute wire-tag registry.
//
// Decides which IPP value tag each job attribute is encoded with. The
// registry only ever grows: a name, once mapped, keeps its tag for the life
// of the process, so concurrent print calls registering the same custom PPD
// key converge on the same answer.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

/// IPP value tags (RFC 8010 §3.5.2) used for job attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireTag {
    Integer,
    Boolean,
    Enum,
    TextWithoutLanguage,
    NameWithoutLanguage,
    Keyword,
}

/// Tags known before any job options are parsed.
const SEEDED_TAGS: &[(&str, WireTag)] = &[
    // Operation attributes.
    ("job-name", WireTag::NameWithoutLanguage),
    ("document-name", WireTag::NameWithoutLanguage),
    ("requesting-user-name", WireTag::NameWithoutLanguage),
    ("ipp-attribute-fidelity", WireTag::Boolean),
    ("last-document", WireTag::Boolean),
    // Job template attributes (RFC 8011 §5.2, PWG 5100.13).
    ("copies", WireTag::Integer),
    ("job-priority", WireTag::Integer),
    ("job-sheets", WireTag::NameWithoutLanguage),
    ("job-hold-until", WireTag::Keyword),
    ("multiple-document-handling", WireTag::Keyword),
    ("finishings", WireTag::Enum),
    ("media", WireTag::Keyword),
    ("number-up", WireTag::Integer),
    ("orientation-requested", WireTag::Enum),
    ("output-bin", WireTag::Keyword),
    ("print-color-mode", WireTag::Keyword),
    ("print-quality", WireTag::Enum),
    ("print-scaling", WireTag::Keyword),
    ("sides", WireTag::Keyword),
    // CUPS PPD option keys of the DevTerm thermal queue.
    ("TrimMode", WireTag::Keyword),
    ("BlankSpace", WireTag::Boolean),
    ("FeedWhere", WireTag::Keyword),
    ("FeedDist", WireTag::Keyword),
];

/// Thread-safe, extend-only map of attribute name to wire tag.
///
/// Share it between print calls behind an `Arc`.
#[derive(Debug)]
pub struct AttributeTagRegistry {
    tags: RwLock<HashMap<String, WireTag>>,
}

impl AttributeTagRegistry {
    /// An empty registry with nothing seeded.
    pub fn empty() -> Self {
        Self {
            tags: RwLock::new(HashMap::new()),
        }
    }

    /// A registry seeded with the standard attributes and the vendor PPD keys.
    pub fn with_defaults() -> Self {
        let tags = SEEDED_TAGS
            .iter()
            .map(|(name, tag)| ((*name).to_owned(), *tag))
            .collect();
        Self {
            tags: RwLock::new(tags),
        }
    }

    /// Look up the tag for `name`.
    pub fn tag_for(&self, name: &str) -> Option<WireTag> {
        let guard = self.tags.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.get(name).copied()
    }

    /// Register `name` with `tag` unless it is already known.
    ///
    /// Returns the tag that is in effect afterwards, which is the existing
    /// one when the name was already registered.
    pub fn register_if_absent(&self, name: &str, tag: WireTag) -> WireTag {
        if let Some(existing) = self.tag_for(name) {
            return existing;
        }

        let mut guard = self.tags.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let effective = *guard.entry(name.to_owned()).or_insert_with(|| {
            debug!(attribute = name, ?tag, "registered attribute tag");
            tag
        });
        effective
    }

    pub fn len(&self) -> usize {
        let guard = self.tags.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AttributeTagRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
