//! Raw Deflate decompression library
//!
//! Written from scratch, based on RFC 1951
//!
//! # Design goals and implementation #
//!
//! The main development goal is a fully native, fully incremental decoder
//! for the raw Deflate bitstream: no FFI, no assumptions about how much
//! input or output is available at a time, and no blocking reads hidden
//! inside the decoder. The caller lends buffers, the decoder makes as
//! much progress as they allow and suspends at any bit position, which is
//! what protocol work (notably compressed message payloads) needs.
//!
//! Container formats and their integrity checks are deliberately out of
//! scope: zlib (RFC 1950) and gzip (RFC 1952) framing, Adler-32 and
//! CRC-32 belong to the layers wrapping this one, as does any encoder.
//!
//! Two interfaces are provided:
//! - [`Inflate`]: the resumable core, driven one buffer pair at a time
//!   through [`Params`]
//! - [`InflateStream`]: a higher-level adapter exposing the decoded bytes
//!   through the `Read` trait
//!
//! # Examples #
//! ```
//! use std::io::Read;
//!
//! let compressed = b"\x01\x04\x00\xfb\xffaCaB";
//! let mut decomp = Vec::new();
//! ctxinflate::InflateStream::new(compressed.as_ref())
//!     .read_to_end(&mut decomp)
//!     .unwrap();
//! assert_eq!(decomp, b"aCaB");
//! ```

mod bitstream;
mod error;
mod fixed;
mod huffman;
mod inflate;
mod window;

pub use error::Error;
pub use inflate::{Inflate, InflateStream, Params};
