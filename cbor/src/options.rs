/// How a NaN float is written.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NanPolicy {
    /// As a float of the requested precision, keeping the NaN bit pattern.
    #[default]
    Float,

    /// As the simple value `undefined` (0xF7), matching older encoders that
    /// treated NaN as "no value".
    Undefined,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nested arrays, maps and tags.
    pub max_depth: usize,

    /// Strings of at least this many bytes are written as indefinite-length
    /// items split into chunks no longer than this. Zero disables chunking.
    pub chunk_size: usize,

    pub nan: NanPolicy,
}

pub(crate) const DEFAULT_MAX_DEPTH: usize = 128;
pub(crate) const DEFAULT_CHUNK_SIZE: usize = 250;

// Every UTF-8 character must fit in a single chunk
const MIN_CHUNK_SIZE: usize = 4;

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            nan: NanPolicy::default(),
        }
    }
}

impl Options {
    pub(crate) fn effective_chunk_size(&self) -> Option<usize> {
        match self.chunk_size {
            0 => None,
            n => Some(n.max(MIN_CHUNK_SIZE)),
        }
    }
}
