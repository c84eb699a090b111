// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label payload normalisation.
//
// Hosts hand over rendered labels in whatever shape they have at hand: raw
// bytes, a path to a file they wrote, the document text itself, or an open
// stream. Everything downstream works on plain bytes.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use cupslabel_core::error::{LabelError, Result};

/// A label document in one of the shapes a host may supply.
pub enum LabelPayload {
    /// Document bytes.
    Bytes(Vec<u8>),
    /// A path to an existing file, or otherwise the document content itself.
    Text(String),
    /// A readable stream positioned at the start of the document.
    Reader(Box<dyn Read + Send>),
}

impl LabelPayload {
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Interpret a loosely-typed host value.
    ///
    /// `null` means no payload. Strings are [`LabelPayload::Text`], arrays of
    /// byte-sized integers are [`LabelPayload::Bytes`]; every other shape is
    /// rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Self>> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(Self::Text(text.clone()))),
            Value::Array(items) => {
                let bytes = items
                    .iter()
                    .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
                    .collect::<Option<Vec<u8>>>()
                    .ok_or_else(|| {
                        LabelError::UnsupportedPayloadType(
                            "array containing non-byte values".into(),
                        )
                    })?;
                Ok(Some(Self::Bytes(bytes)))
            }
            Value::Bool(_) => Err(LabelError::UnsupportedPayloadType("boolean".into())),
            Value::Number(_) => Err(LabelError::UnsupportedPayloadType("number".into())),
            Value::Object(_) => Err(LabelError::UnsupportedPayloadType("object".into())),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Reader(_) => "reader",
        }
    }
}

impl std::fmt::Debug for LabelPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<Vec<u8>> for LabelPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for LabelPayload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for LabelPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for LabelPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Turn a payload into document bytes.
///
/// Fails with [`LabelError::InvalidInput`] when there is no payload. The only
/// side effect is reading the named file or the stream.
pub fn normalize(payload: Option<LabelPayload>) -> Result<Vec<u8>> {
    let payload =
        payload.ok_or_else(|| LabelError::InvalidInput("no label payload provided".into()))?;
    let kind = payload.kind();

    let bytes = match payload {
        LabelPayload::Bytes(bytes) => bytes,
        LabelPayload::Text(text) => {
            let path = Path::new(&text);
            if path.is_file() {
                debug!(path = %path.display(), "reading label payload from file");
                std::fs::read(path)?
            } else {
                text.into_bytes()
            }
        }
        LabelPayload::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            buf
        }
    };

    debug!(kind, len = bytes.len(), "label payload normalised");
    Ok(bytes)
}
