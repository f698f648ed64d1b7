use core::convert::Infallible;
use thiserror::Error;

/// Reasons an encode can fail.
///
/// `E` is the error type of the [`Replacer`](crate::Replacer) in use, and is
/// passed through untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error<E = Infallible> {
    /// The value has no CBOR representation, e.g. a reserved simple value.
    #[error("Unsupported value kind: {0}")]
    UnsupportedValueKind(&'static str),

    /// The integer lies outside the native CBOR range of -2^64..=2^64-1.
    #[error("Integer {0} does not fit in a 64-bit CBOR argument")]
    IntegerOverflow(i128),

    /// Nesting went deeper than [`Options::max_depth`](crate::Options::max_depth).
    #[error("Value nesting exceeds the maximum depth of {0}")]
    DepthLimitExceeded(usize),

    #[error(transparent)]
    Replacer(E),
}
