// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Media size resolution.
//
// Maps the configured media policy onto the IPP `media` value for a job:
//   - blank          → no `media` attribute, the queue default applies
//   - "auto"         → `Custom.<W>x<H>mm` measured from the PDF's first page
//   - anything else  → passed through as an explicit media name
//
// Measuring tries a structured parse first and falls back to scanning the
// raw bytes for a MediaBox, which copes with minimal or damaged PDFs that
// still carry a readable page box.

use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::pdf::reader::{PageBox, PdfReader};

/// First `/MediaBox [x1 y1 x2 y2]` in a byte stream.
static MEDIA_BOX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/MediaBox\s*\[\s*(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s*\]",
    )
    .expect("MediaBox pattern is valid")
});

/// How the `media` attribute of a job is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPolicy {
    /// Leave `media` unset.
    Unset,
    /// Derive a custom size from the document.
    Auto,
    /// Use this media name verbatim.
    Explicit(String),
}

impl MediaPolicy {
    /// Interpret a user-entered policy string.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::Unset
        } else if trimmed.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Explicit(trimmed.to_owned())
        }
    }
}

/// Resolves a media policy against a document.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaResolver;

impl MediaResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `policy_text` to a media name for `document`.
    ///
    /// An empty string means no `media` attribute should be sent.
    pub fn resolve(&self, policy_text: &str, document: &[u8]) -> String {
        match MediaPolicy::parse(policy_text) {
            MediaPolicy::Unset => String::new(),
            MediaPolicy::Explicit(name) => name,
            MediaPolicy::Auto => match self.measure(document) {
                Some(page_box) => custom_media_name(&page_box),
                None => {
                    warn!("media=auto failed to parse PDF page size; media will not be set");
                    String::new()
                }
            },
        }
    }

    /// Find the first page's box, structured parse first.
    pub fn measure(&self, document: &[u8]) -> Option<PageBox> {
        if let Some(page_box) = structured_media_box(document) {
            return Some(page_box);
        }
        debug!("structured PDF parse found no MediaBox, scanning raw bytes");
        scan_media_box(document)
    }
}

fn structured_media_box(document: &[u8]) -> Option<PageBox> {
    match PdfReader::from_bytes(document) {
        Ok(reader) => reader.first_page_media_box(),
        Err(err) => {
            debug!(%err, "structured PDF parse failed");
            None
        }
    }
}

/// Scan raw bytes for the first `/MediaBox` array.
pub fn scan_media_box(document: &[u8]) -> Option<PageBox> {
    let caps = MEDIA_BOX_PATTERN.captures(document)?;
    let mut coords = [0.0f64; 4];
    for (i, slot) in coords.iter_mut().enumerate() {
        let raw = caps.get(i + 1)?.as_bytes();
        *slot = std::str::from_utf8(raw).ok()?.parse().ok()?;
    }
    Some(PageBox::new(coords[0], coords[1], coords[2], coords[3]))
}

/// `Custom.<W>x<H>mm` for a page box.
pub fn custom_media_name(page_box: &PageBox) -> String {
    format!(
        "Custom.{}x{}mm",
        format_mm(page_box.width_mm()),
        format_mm(page_box.height_mm())
    )
}

/// Format millimetres with at most two decimals and no trailing zeros.
pub fn format_mm(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::tests::single_page_pdf;

    #[test]
    fn policy_parsing() {
        assert_eq!(MediaPolicy::parse("   "), MediaPolicy::Unset);
        assert_eq!(MediaPolicy::parse(" AUTO "), MediaPolicy::Auto);
        assert_eq!(
            MediaPolicy::parse(" Custom.48x30mm "),
            MediaPolicy::Explicit("Custom.48x30mm".into())
        );
    }

    #[test]
    fn blank_policy_sets_nothing() {
        let resolver = MediaResolver::new();
        assert_eq!(resolver.resolve("", b"%PDF anything"), "");
        assert_eq!(resolver.resolve(" \t", b""), "");
    }

    #[test]
    fn explicit_media_passes_through() {
        let resolver = MediaResolver::new();
        assert_eq!(resolver.resolve("Custom.48x30mm", b""), "Custom.48x30mm");
        assert_eq!(resolver.resolve(" na_letter_8.5x11in ", b""), "na_letter_8.5x11in");
    }

    #[test]
    fn auto_from_structured_pdf() {
        let pdf = single_page_pdf([0, 0, 136, 85], false);
        let resolver = MediaResolver::new();
        // 136pt = 47.977mm, 85pt = 29.986mm
        assert_eq!(resolver.resolve("auto", &pdf), "Custom.47.98x29.99mm");
    }

    #[test]
    fn auto_is_case_insensitive() {
        let pdf = single_page_pdf([0, 0, 144, 72], false);
        assert_eq!(MediaResolver::new().resolve("Auto", &pdf), "Custom.50.8x25.4mm");
    }

    #[test]
    fn auto_a4_page() {
        let pdf = single_page_pdf([0, 0, 595, 842], true);
        assert_eq!(MediaResolver::new().resolve("auto", &pdf), "Custom.209.9x297.04mm");
    }

    #[test]
    fn auto_falls_back_to_byte_scan() {
        let minimal = b"1 0 obj << /Type /Page /MediaBox [ 0 0 136.0 85 ] >> endobj";
        assert!(structured_media_box(minimal).is_none());
        assert_eq!(
            MediaResolver::new().resolve("auto", minimal),
            "Custom.47.98x29.99mm"
        );
    }

    #[test]
    fn byte_scan_handles_signed_offsets() {
        let page_box = scan_media_box(b"/MediaBox[-10.5 -20 125.5 65]").expect("match");
        assert_eq!(page_box.width_pt(), 136.0);
        assert_eq!(page_box.height_pt(), 85.0);
    }

    #[test]
    fn byte_scan_uses_first_match() {
        let data = b"/MediaBox [0 0 72 72] /MediaBox [0 0 144 144]";
        let page_box = scan_media_box(data).expect("match");
        assert_eq!(page_box.width_pt(), 72.0);
    }

    #[test]
    fn auto_without_any_box_sets_nothing() {
        assert_eq!(MediaResolver::new().resolve("auto", b"plain label text"), "");
        assert_eq!(MediaResolver::new().resolve("auto", b"/MediaBox [0 0 1]"), "");
    }

    #[test]
    fn mm_formatting() {
        assert_eq!(format_mm(48.0), "48");
        assert_eq!(format_mm(47.5), "47.5");
        assert_eq!(format_mm(0.0), "0");
        assert_eq!(format_mm(0.001), "0");
        assert_eq!(format_mm(120.0), "120");
        assert_eq!(format_mm(47.977), "47.98");
    }
}
