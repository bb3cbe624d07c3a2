//! Decoder error taxonomy
use thiserror::Error;

/// Structural errors produced while decoding a Deflate stream
///
/// Every variant except [`Error::EndOfStream`] indicates invalid compressed
/// data; running out of input or output space is not an error but a normal
/// return of [`Inflate::write`](crate::Inflate::write). Errors are sticky:
/// once `write` has reported one, every later call reports the same value
/// without consuming input or producing output.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input ended before the final block completed
    ///
    /// Reported by [`InflateStream`](crate::InflateStream) when the wrapped
    /// reader hits EOF mid-stream; the core decoder itself suspends instead
    #[error("truncated Deflate stream")]
    EndOfStream,
    /// A block header carried the reserved type 3
    #[error("invalid block type")]
    InvalidBlockType,
    /// A literal/length code with the invalid marker was decoded
    #[error("invalid literal/length code")]
    InvalidLiteralLengthCode,
    /// A distance code with the invalid marker was decoded
    #[error("invalid distance code")]
    InvalidDistanceCode,
    /// A stored block length does not match its one's complement check
    #[error("invalid stored block lengths")]
    InvalidStoredLength,
    /// A length repeat in the dynamic header had no previous length or
    /// overflowed the declared symbol count
    #[error("invalid bit length repeat")]
    InvalidBitLengthRepeat,
    /// The dynamic header defines no end-of-block code
    #[error("missing end-of-block code")]
    MissingEndOfBlock,
    /// The literal/length code lengths are over- or under-subscribed
    #[error("invalid literal/lengths set")]
    InvalidLiteralLengths,
    /// The distance code lengths are over- or under-subscribed
    #[error("invalid distances set")]
    InvalidDistances,
    /// The code-lengths code itself is over-subscribed
    #[error("invalid code lengths set")]
    InvalidCodeLengths,
    /// A code set requires more table space than the provable bound
    #[error("code table overflow")]
    TableOverflow,
    /// A match reaches back beyond the bytes emitted so far
    #[error("invalid distance too far back")]
    InvalidWindowOffset,
    /// A dynamic header declares more than 286 literal/length or 30
    /// distance symbols
    #[error("too many length or distance symbols")]
    TooManySymbols,
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}
