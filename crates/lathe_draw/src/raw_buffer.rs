//! Raw byte sources for dynamic buffers
//!
//! Upload code reads every source the same way: a byte length plus either a
//! pointer or a byte slice. Missing data reads as null or empty, never as an
//! error.

use std::sync::Arc;

/// Which source a [`RawBufferDescription`] wraps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawBufferDataType {
    Pointer,
    Owned,
    Shared,
}

/// Raw data for a dynamic buffer upload
#[derive(Clone, Debug, Default)]
pub enum RawBufferDescription {
    /// No data
    #[default]
    Empty,
    /// Externally owned memory; never dereferenced here
    Pointer { data: *const u8, len: usize },
    Owned(Vec<u8>),
    /// Shared view of bytes owned elsewhere
    Shared(Arc<[u8]>),
}

impl RawBufferDescription {
    /// Wrap external memory; negative lengths clamp to zero
    pub fn from_pointer(data: *const u8, len: i64) -> Self {
        RawBufferDescription::Pointer {
            data,
            len: len.max(0) as usize,
        }
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        RawBufferDescription::Owned(data)
    }

    pub fn from_shared(data: impl Into<Arc<[u8]>>) -> Self {
        RawBufferDescription::Shared(data.into())
    }

    pub fn byte_length(&self) -> usize {
        match self {
            RawBufferDescription::Empty => 0,
            RawBufferDescription::Pointer { len, .. } => *len,
            RawBufferDescription::Owned(data) => data.len(),
            RawBufferDescription::Shared(data) => data.len(),
        }
    }

    /// The external pointer, or null for every other source
    pub fn as_pointer(&self) -> *const u8 {
        match self {
            RawBufferDescription::Pointer { data, .. } => *data,
            _ => std::ptr::null(),
        }
    }

    /// The bytes of owned or shared data; empty for pointers and `Empty`
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawBufferDescription::Owned(data) => data,
            RawBufferDescription::Shared(data) => data,
            _ => &[],
        }
    }

    /// Source kind; `None` for [`RawBufferDescription::Empty`]
    pub fn data_type(&self) -> Option<RawBufferDataType> {
        match self {
            RawBufferDescription::Empty => None,
            RawBufferDescription::Pointer { .. } => Some(RawBufferDataType::Pointer),
            RawBufferDescription::Owned(_) => Some(RawBufferDataType::Owned),
            RawBufferDescription::Shared(_) => Some(RawBufferDataType::Shared),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.byte_length() == 0
    }
}
