//! Error types for the codec, the streaming source and graph descriptions.

use thiserror::Error;

/// Result type for fallible sigwave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Origin reported for readers that carry no name of their own.
pub const STREAM_ORIGIN: &str = "<stream>";

/// Errors raised while encoding, decoding or streaming PCM audio.
///
/// Decode errors carry the origin of the offending source (a file path, or
/// [`STREAM_ORIGIN`] for anonymous readers) so a caller juggling several
/// inputs can tell which one failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Not enough bytes for a header, or a magic identifier did not match.
    #[error("WAVE parse, {description} ({origin})")]
    MalformedHeader {
        /// What was wrong with the header.
        description: String,
        /// Where the bytes came from.
        origin: String,
    },

    /// The container is well formed but describes audio we cannot represent.
    #[error("WAVE parse, unsupported format: {description} ({origin})")]
    UnsupportedFormat {
        /// What was unsupported.
        description: String,
        /// Where the bytes came from.
        origin: String,
    },

    /// Fewer bytes were available than a chunk declared.
    #[error("WAVE parse, short read: {description} ({origin})")]
    ShortRead {
        /// What was being read when the data ran out.
        description: String,
        /// Where the bytes came from.
        origin: String,
    },

    /// A sample width outside 1, 2, 3, 4, 6 or 8 bytes.
    #[error("unsupported sample width: {0} bytes")]
    UnsupportedSampleWidth(u16),

    /// A streaming source announced a content type we do not understand.
    #[error("source in unrecognized format: {0}")]
    UnrecognizedFormat(String),

    /// The rendered data does not fit the 32-bit RIFF size fields.
    #[error("encoded data too large for RIFF: {bytes} bytes")]
    TooLarge {
        /// Size the data chunk would have had.
        bytes: u64,
    },

    /// A per-channel producer failed while rendering.
    #[error("channel {channel} producer failed: {message}")]
    Producer {
        /// Index of the failing channel.
        channel: usize,
        /// Failure description.
        message: String,
    },

    /// I/O error on the output sink or input source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A signal graph description names a node that cannot be built.
    #[error("invalid graph node: {0}")]
    InvalidGraph(String),

    /// A signal graph description could not be (de)serialized.
    #[error("graph description error: {0}")]
    Graph(String),
}

impl Error {
    /// Creates a malformed-header error.
    pub fn malformed(description: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::MalformedHeader {
            description: description.into(),
            origin: origin.into(),
        }
    }

    /// Creates an unsupported-format error.
    pub fn unsupported(description: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            description: description.into(),
            origin: origin.into(),
        }
    }

    /// Creates a short-read error.
    pub fn short_read(description: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::ShortRead {
            description: description.into(),
            origin: origin.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_mentions_origin() {
        let err = Error::malformed("not WAVE format", "song.wav");
        let text = err.to_string();
        assert!(text.contains("not WAVE format"));
        assert!(text.contains("song.wav"));
    }

    #[test]
    fn test_short_read_helper() {
        let err = Error::short_read("read incomplete", STREAM_ORIGIN);
        assert!(matches!(err, Error::ShortRead { .. }));
        assert!(err.to_string().contains("<stream>"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
