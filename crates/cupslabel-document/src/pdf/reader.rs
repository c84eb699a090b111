// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — structured inspection of page geometry using the `lopdf`
// crate.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

use cupslabel_core::error::{LabelError, Result};

/// PostScript points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Maximum `/Parent` hops followed when looking for an inherited MediaBox.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A page rectangle in PDF user-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PageBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width_pt(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height_pt(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    pub fn width_mm(&self) -> f64 {
        points_to_mm(self.width_pt())
    }

    pub fn height_mm(&self) -> f64 {
        points_to_mm(self.height_pt())
    }
}

/// Convert PDF points to millimetres.
pub fn points_to_mm(points: f64) -> f64 {
    points * MM_PER_INCH / POINTS_PER_INCH
}

/// Reads page geometry from an in-memory PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            LabelError::InvalidInput(format!("failed to load PDF from memory: {err}"))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// MediaBox of the first page, following page-tree inheritance.
    ///
    /// Returns `None` when the document has no pages or no usable MediaBox.
    pub fn first_page_media_box(&self) -> Option<PageBox> {
        let pages = self.document.get_pages();
        let (_, page_id) = pages.iter().next()?;
        self.media_box(*page_id)
    }

    fn media_box(&self, page_id: ObjectId) -> Option<PageBox> {
        let mut dict = self.document.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(object) = dict.get(b"MediaBox") {
                return self.page_box(object);
            }
            dict = self.parent_of(dict)?;
        }

        debug!("page tree deeper than inheritance limit");
        None
    }

    fn parent_of(&self, dict: &Dictionary) -> Option<&Dictionary> {
        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        self.document.get_dictionary(parent_id).ok()
    }

    fn page_box(&self, object: &Object) -> Option<PageBox> {
        let (_, resolved) = self.document.dereference(object).ok()?;
        let values = resolved.as_array().ok()?;
        if values.len() != 4 {
            debug!(len = values.len(), "MediaBox does not have four entries");
            return None;
        }

        let mut coords = [0.0f64; 4];
        for (slot, value) in coords.iter_mut().zip(values) {
            let (_, value) = self.document.dereference(value).ok()?;
            *slot = number(value)?;
        }

        Some(PageBox::new(coords[0], coords[1], coords[2], coords[3]))
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
