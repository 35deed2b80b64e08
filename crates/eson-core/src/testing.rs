//! Byte builders for test fixtures.

use crate::decoder::{ValueKind, SIZE_HEADER_LEN};

/// Prefix `payload` with its 8-byte size header.
pub(crate) fn sized(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SIZE_HEADER_LEN + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Assembles an object or array body and frames it with a size header.
///
/// The declared size counts the header itself, as the decoder expects.
pub(crate) struct Builder {
    kind: ValueKind,
    body: Vec<u8>,
    terminate: bool,
    next_index: Option<usize>,
}

impl Builder {
    pub(crate) fn object() -> Self {
        Self {
            kind: ValueKind::Object,
            body: Vec::new(),
            terminate: true,
            next_index: None,
        }
    }

    pub(crate) fn array() -> Self {
        Self {
            kind: ValueKind::Array,
            ..Self::object()
        }
    }

    /// Array whose items carry keys "0", "1", ...
    pub(crate) fn indexed_array() -> Self {
        Self {
            next_index: Some(0),
            ..Self::array()
        }
    }

    pub(crate) fn unterminated(mut self) -> Self {
        self.terminate = false;
        self
    }

    pub(crate) fn field(mut self, kind: ValueKind, key: &str, payload: &[u8]) -> Self {
        self.body.push(kind.tag());
        self.body.extend_from_slice(key.as_bytes());
        self.body.push(0);
        self.body.extend_from_slice(payload);
        self
    }

    pub(crate) fn item(mut self, kind: ValueKind, payload: &[u8]) -> Self {
        match self.next_index {
            Some(index) => {
                self.next_index = Some(index + 1);
                self.field(kind, &index.to_string(), payload)
            }
            None => {
                self.body.push(kind.tag());
                self.body.extend_from_slice(payload);
                self
            }
        }
    }

    pub(crate) fn nested_item(self, child: Builder) -> Self {
        let bytes = child.build();
        self.item(child.kind, &bytes)
    }

    pub(crate) fn float(self, key: &str, v: f64) -> Self {
        self.field(ValueKind::Float64, key, &v.to_le_bytes())
    }

    pub(crate) fn int(self, key: &str, v: i64) -> Self {
        self.field(ValueKind::Int64, key, &v.to_le_bytes())
    }

    pub(crate) fn boolean(self, key: &str, v: bool) -> Self {
        self.field(ValueKind::Boolean, key, &[u8::from(v)])
    }

    pub(crate) fn string(self, key: &str, v: &str) -> Self {
        self.field(ValueKind::String, key, &sized(v.as_bytes()))
    }

    pub(crate) fn binary(self, key: &str, v: &[u8]) -> Self {
        self.field(ValueKind::Binary, key, &sized(v))
    }

    pub(crate) fn nested(self, key: &str, child: Builder) -> Self {
        let bytes = child.build();
        self.field(child.kind, key, &bytes)
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut body = self.body.clone();
        if self.terminate {
            body.push(ValueKind::End.tag());
        }
        let total = (SIZE_HEADER_LEN + body.len()) as u32;

        let mut out = Vec::with_capacity(total as usize);
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&body);
        out
    }
}
