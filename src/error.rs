use std::fmt::Display;

/// Failures raised by the tile, attribute, block and nametable codecs.
///
/// All of these are validation failures on caller-supplied data; none of them leave
/// partially-updated state behind.
#[derive(Debug)]
pub enum CodecError {
    /// A sequence had the wrong length (pixel rows, raw tile bytes, block tiles, ...).
    InvalidDimensions { what: &'static str, expected: String, actual: usize },
    /// A pixel value outside 0-3.
    InvalidPixelValue { row: usize, col: usize, value: u8 },
    /// An out-of-range id or field value.
    InvalidArgument(String),
    Io(std::io::Error),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub fn dimensions(what: &'static str, expected: impl ToString, actual: usize) -> Self {
        CodecError::InvalidDimensions {
            what,
            expected: expected.to_string(),
            actual,
        }
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        CodecError::InvalidArgument(msg.into())
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::InvalidDimensions {
                what,
                expected,
                actual,
            } => write!(f, "invalid dimensions for {what}: expected {expected}, got {actual}"),
            CodecError::InvalidPixelValue { row, col, value } => {
                write!(f, "invalid pixel value {value} at row {row}, column {col} (must be 0-3)")
            }
            CodecError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            CodecError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e)
    }
}
