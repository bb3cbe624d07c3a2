//! Native raw Deflate (RFC 1951) streaming decompressor
//!
//! The stream is a sequence of blocks, each either stored verbatim or
//! compressed with Huffman-coded literals and LZ77 back-references into a
//! sliding window of the most recent output. [`Inflate`] decodes it
//! incrementally: the caller lends one input and one output slice per
//! [`write`](Inflate::write) call and the decoder advances as far as those
//! allow, suspending mid-block (even mid-code) and resuming on the next
//! call. [`InflateStream`] wraps the same engine behind [`Read`] for
//! callers that just want a byte stream.

use crate::bitstream::BitStream;
use crate::error::Error;
use crate::fixed::{DISTFIX, LENFIX};
use crate::huffman::{build_table, BuildError, Code, Kind, ENOUGH};
use crate::window::Window;
use std::io::Read;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Transmission order of the code-lengths code lengths
const ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Window size used when the stream's producer is unknown
const DEFAULT_WINDOW_BITS: u8 = 15;

/// Decoder position in the block grammar
///
/// Each state either consumes something, emits something, or hands over to
/// the next state; a `write` call returns from whichever state first finds
/// its input or output exhausted, and the next call resumes there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Head,
    Type,
    TypeDo,
    Stored,
    Copy,
    Table,
    LenLens,
    CodeLens,
    Len,
    LenExt,
    Dist,
    DistExt,
    Match,
    Lit,
    Done,
    Bad,
}

/// Where an active decoding table lives
#[derive(Clone, Copy)]
enum TableRef {
    /// One of the baked-in fixed tables
    Fixed,
    /// Built into the shared table storage at this offset
    Dynamic(usize),
}

/// Buffer descriptors for [`Inflate::write`]
///
/// `next_in` and `next_out` double as the availability counters through
/// their lengths; `write` advances both slices in place past whatever it
/// consumed and produced. The totals accumulate for as long as the caller
/// carries them forward.
pub struct Params<'i, 'o> {
    /// Remaining compressed input
    pub next_in: &'i [u8],
    /// Remaining room for decompressed output
    pub next_out: &'o mut [u8],
    /// Compressed bytes consumed so far
    pub total_in: u64,
    /// Decompressed bytes produced so far
    pub total_out: u64,
}

impl<'i, 'o> Params<'i, 'o> {
    /// Creates a parameter block with zeroed totals
    pub fn new(next_in: &'i [u8], next_out: &'o mut [u8]) -> Self {
        Self {
            next_in,
            next_out,
            total_in: 0,
            total_out: 0,
        }
    }
}

/// Raw Deflate streaming decompressor
///
/// One instance owns the complete state of one stream: the bit
/// accumulator, the sliding window, the code tables and whatever decode is
/// mid-flight. It never reads past the input slice nor writes past the
/// output slice it is given, and it can suspend at any bit position.
///
/// # Examples #
/// ```
/// use ctxinflate::{Inflate, Params};
///
/// let mut out = [0u8; 16];
/// let mut ps = Params::new(b"\x01\x04\x00\xfb\xffaCaB", &mut out);
/// let mut z = Inflate::new(15);
/// assert!(z.write(&mut ps).unwrap());
/// assert_eq!(ps.total_out, 4);
/// assert_eq!(&out[..4], b"aCaB");
/// ```
pub struct Inflate {
    mode: Mode,
    err: Option<Error>,
    /// Processing the last block
    last: bool,
    bits: BitStream,
    window: Window,

    // active code tables
    lencode: TableRef,
    distcode: TableRef,
    lenbits: u8,
    distbits: u8,

    // in-flight literal/match decode
    length: usize,
    offset: usize,
    extra: u8,
    was: usize,

    // dynamic table construction
    nlen: usize,
    ndist: usize,
    ncode: usize,
    have: usize,
    next: usize,
    lens: [u16; 320],
    work: [u16; 288],
    codes: [Code; ENOUGH],
}

/// Resolves one Huffman code against a two-level table
///
/// Consumes the code bits on success; returns `None` with nothing consumed
/// when the accumulator plus remaining input cannot cover the code, so the
/// caller can suspend and retry verbatim.
fn decode_one(
    bits: &mut BitStream,
    table: &[Code],
    root: u8,
    input: &[u8],
    next: &mut usize,
) -> Option<Code> {
    let mut here;
    loop {
        here = table[bits.peek(root) as usize];
        if here.bits <= bits.count() {
            break;
        }
        if !bits.fill(bits.count() + 8, input, next) {
            return None;
        }
    }
    if here.op != 0 && here.op & 0xf0 == 0 {
        let first = here;
        loop {
            let idx = first.val as usize + (bits.peek(first.bits + first.op) >> first.bits) as usize;
            here = table[idx];
            if first.bits + here.bits <= bits.count() {
                break;
            }
            if !bits.fill(bits.count() + 8, input, next) {
                return None;
            }
        }
        bits.drop(first.bits);
    }
    bits.drop(here.bits);
    Some(here)
}

impl Inflate {
    /// Creates a decoder with a window of `1 << window_bits` bytes
    ///
    /// `window_bits` must lie in `8..=15`; streams compressed with the full
    /// 32 KiB window need 15.
    pub fn new(window_bits: u8) -> Self {
        assert!(
            (8..=15).contains(&window_bits),
            "window_bits out of range: {window_bits}"
        );
        Self {
            mode: Mode::Head,
            err: None,
            last: false,
            bits: BitStream::default(),
            window: Window::new(window_bits),
            lencode: TableRef::Fixed,
            distcode: TableRef::Fixed,
            lenbits: 0,
            distbits: 0,
            length: 0,
            offset: 0,
            extra: 0,
            was: 0,
            nlen: 0,
            ndist: 0,
            ncode: 0,
            have: 0,
            next: 0,
            lens: [0; 320],
            work: [0; 288],
            codes: [Code::default(); ENOUGH],
        }
    }

    /// Returns the decoder to its freshly constructed state
    ///
    /// The window allocation is kept when `window_bits` is unchanged.
    pub fn reset(&mut self, window_bits: u8) {
        assert!(
            (8..=15).contains(&window_bits),
            "window_bits out of range: {window_bits}"
        );
        self.mode = Mode::Head;
        self.err = None;
        self.last = false;
        self.bits.flush();
        self.window.reset(window_bits);
        self.lencode = TableRef::Fixed;
        self.distcode = TableRef::Fixed;
        self.lenbits = 0;
        self.distbits = 0;
        self.length = 0;
        self.offset = 0;
        self.extra = 0;
        self.was = 0;
        self.nlen = 0;
        self.ndist = 0;
        self.ncode = 0;
        self.have = 0;
        self.next = 0;
    }

    /// Decodes as much as the lent buffers allow
    ///
    /// Returns once `ps.next_in` is drained, `ps.next_out` is full, or the
    /// stream ends (`Ok(true)`, after which further calls keep returning
    /// `Ok(true)` without consuming anything). Malformed input yields an
    /// error which is latched: every later call fails identically. Either
    /// way the slices and totals in `ps` reflect the progress made.
    pub fn write(&mut self, ps: &mut Params<'_, '_>) -> Result<bool, Error> {
        if let Some(err) = self.err {
            return Err(err);
        }
        let input = ps.next_in;
        let out = std::mem::take(&mut ps.next_out);
        let mut next = 0usize;
        let mut put = 0usize;

        let result = self.process(input, out, &mut next, &mut put);
        match result {
            Ok(_) => {
                // Anything no longer reachable through the output slice must
                // be recoverable from the window by a later match
                self.window.write(&out[..put]);
            }
            Err(err) => {
                self.mode = Mode::Bad;
                self.err = Some(err);
            }
        }
        ps.total_in += next as u64;
        ps.total_out += put as u64;
        ps.next_in = &input[next..];
        ps.next_out = &mut out[put..];
        result
    }

    fn process(
        &mut self,
        input: &[u8],
        out: &mut [u8],
        next: &mut usize,
        put: &mut usize,
    ) -> Result<bool, Error> {
        loop {
            match self.mode {
                Mode::Head | Mode::Type => {
                    if self.last {
                        self.bits.flush_byte();
                        self.mode = Mode::Done;
                        continue;
                    }
                    self.mode = Mode::TypeDo;
                }
                Mode::TypeDo => {
                    if !self.bits.fill(3, input, next) {
                        return Ok(false);
                    }
                    self.last = self.bits.read(1) != 0;
                    match self.bits.read(2) {
                        0 => {
                            self.mode = Mode::Stored;
                        }
                        1 => {
                            trace!(last = self.last, "fixed Huffman block");
                            self.lencode = TableRef::Fixed;
                            self.lenbits = 9;
                            self.distcode = TableRef::Fixed;
                            self.distbits = 5;
                            self.mode = Mode::Len;
                        }
                        2 => {
                            self.mode = Mode::Table;
                        }
                        _ => {
                            debug!("block with reserved type");
                            return Err(Error::InvalidBlockType);
                        }
                    }
                }
                Mode::Stored => {
                    self.bits.flush_byte();
                    if !self.bits.fill(32, input, next) {
                        return Ok(false);
                    }
                    let v = self.bits.peek(32);
                    if (v & 0xffff) ^ 0xffff != v >> 16 {
                        return Err(Error::InvalidStoredLength);
                    }
                    self.length = (v & 0xffff) as usize;
                    trace!(length = self.length, last = self.last, "stored block");
                    // A whole 32-bit peek can only be retired wholesale
                    self.bits.flush();
                    self.mode = Mode::Copy;
                }
                Mode::Copy => {
                    if self.length == 0 {
                        self.mode = Mode::Type;
                        continue;
                    }
                    let n = self
                        .length
                        .min(input.len() - *next)
                        .min(out.len() - *put);
                    if n == 0 {
                        return Ok(false);
                    }
                    out[*put..*put + n].copy_from_slice(&input[*next..*next + n]);
                    *put += n;
                    *next += n;
                    self.length -= n;
                }
                Mode::Table => {
                    if !self.bits.fill(14, input, next) {
                        return Ok(false);
                    }
                    self.nlen = self.bits.read(5) as usize + 257;
                    self.ndist = self.bits.read(5) as usize + 1;
                    self.ncode = self.bits.read(4) as usize + 4;
                    if self.nlen > 286 || self.ndist > 30 {
                        debug!(nlen = self.nlen, ndist = self.ndist, "symbol counts out of range");
                        return Err(Error::TooManySymbols);
                    }
                    trace!(
                        nlen = self.nlen,
                        ndist = self.ndist,
                        ncode = self.ncode,
                        last = self.last,
                        "dynamic Huffman block"
                    );
                    self.have = 0;
                    self.mode = Mode::LenLens;
                }
                Mode::LenLens => {
                    while self.have < self.ncode {
                        if !self.bits.fill(3, input, next) {
                            return Ok(false);
                        }
                        self.lens[ORDER[self.have]] = self.bits.read(3) as u16;
                        self.have += 1;
                    }
                    while self.have < 19 {
                        self.lens[ORDER[self.have]] = 0;
                        self.have += 1;
                    }
                    self.next = 0;
                    self.lenbits = build_table(
                        Kind::Codes,
                        &self.lens[..19],
                        &mut self.codes,
                        &mut self.next,
                        7,
                        &mut self.work,
                    )
                    .map_err(|e| match e {
                        BuildError::Overflow => Error::TableOverflow,
                        _ => Error::InvalidCodeLengths,
                    })?;
                    self.lencode = TableRef::Dynamic(0);
                    self.have = 0;
                    self.mode = Mode::CodeLens;
                }
                Mode::CodeLens => {
                    while self.have < self.nlen + self.ndist {
                        let here = loop {
                            let e = self.codes[self.bits.peek(self.lenbits) as usize];
                            if e.bits <= self.bits.count() {
                                break e;
                            }
                            let want = self.bits.count() + 8;
                            if !self.bits.fill(want, input, next) {
                                return Ok(false);
                            }
                        };
                        if here.val < 16 {
                            self.bits.drop(here.bits);
                            self.lens[self.have] = here.val;
                            self.have += 1;
                            continue;
                        }
                        let (xbits, base) = match here.val {
                            16 => (2u8, 3usize),
                            17 => (3, 3),
                            _ => (7, 11),
                        };
                        // The code bits stay unconsumed until its extra bits
                        // are covered too, so a suspension replays cleanly
                        if !self.bits.fill(here.bits + xbits, input, next) {
                            return Ok(false);
                        }
                        self.bits.drop(here.bits);
                        let repeat = base + self.bits.read(xbits) as usize;
                        let value = if here.val == 16 {
                            if self.have == 0 {
                                return Err(Error::InvalidBitLengthRepeat);
                            }
                            self.lens[self.have - 1]
                        } else {
                            0
                        };
                        if self.have + repeat > self.nlen + self.ndist {
                            return Err(Error::InvalidBitLengthRepeat);
                        }
                        self.lens[self.have..self.have + repeat].fill(value);
                        self.have += repeat;
                    }
                    if self.lens[256] == 0 {
                        return Err(Error::MissingEndOfBlock);
                    }
                    self.next = 0;
                    self.lenbits = build_table(
                        Kind::Lens,
                        &self.lens[..self.nlen],
                        &mut self.codes,
                        &mut self.next,
                        9,
                        &mut self.work,
                    )
                    .map_err(|e| match e {
                        BuildError::Overflow => Error::TableOverflow,
                        _ => Error::InvalidLiteralLengths,
                    })?;
                    self.lencode = TableRef::Dynamic(0);
                    let dist_off = self.next;
                    self.distbits = build_table(
                        Kind::Dists,
                        &self.lens[self.nlen..self.nlen + self.ndist],
                        &mut self.codes,
                        &mut self.next,
                        6,
                        &mut self.work,
                    )
                    .map_err(|e| match e {
                        BuildError::Overflow => Error::TableOverflow,
                        _ => Error::InvalidDistances,
                    })?;
                    self.distcode = TableRef::Dynamic(dist_off);
                    trace!(
                        lenbits = self.lenbits,
                        distbits = self.distbits,
                        entries = self.next,
                        "code tables built"
                    );
                    self.mode = Mode::Len;
                }
                Mode::Len => {
                    let table: &[Code] = match self.lencode {
                        TableRef::Fixed => &LENFIX,
                        TableRef::Dynamic(off) => &self.codes[off..],
                    };
                    let Some(here) = decode_one(&mut self.bits, table, self.lenbits, input, next)
                    else {
                        return Ok(false);
                    };
                    self.length = here.val as usize;
                    if here.op == 0 {
                        self.mode = Mode::Lit;
                    } else if here.op & 32 != 0 {
                        trace!("end of block");
                        self.mode = Mode::Type;
                    } else if here.op & 64 != 0 {
                        return Err(Error::InvalidLiteralLengthCode);
                    } else {
                        self.extra = here.op & 15;
                        self.mode = Mode::LenExt;
                    }
                }
                Mode::LenExt => {
                    if self.extra > 0 {
                        if !self.bits.fill(self.extra, input, next) {
                            return Ok(false);
                        }
                        self.length += self.bits.read(self.extra) as usize;
                    }
                    self.was = self.length;
                    self.mode = Mode::Dist;
                }
                Mode::Dist => {
                    let table: &[Code] = match self.distcode {
                        TableRef::Fixed => &DISTFIX,
                        TableRef::Dynamic(off) => &self.codes[off..],
                    };
                    let Some(here) = decode_one(&mut self.bits, table, self.distbits, input, next)
                    else {
                        return Ok(false);
                    };
                    if here.op & 64 != 0 {
                        return Err(Error::InvalidDistanceCode);
                    }
                    self.offset = here.val as usize;
                    self.extra = here.op & 15;
                    self.mode = Mode::DistExt;
                }
                Mode::DistExt => {
                    if self.extra > 0 {
                        if !self.bits.fill(self.extra, input, next) {
                            return Ok(false);
                        }
                        self.offset += self.bits.read(self.extra) as usize;
                    }
                    trace!(length = self.was, distance = self.offset, "match");
                    self.mode = Mode::Match;
                }
                Mode::Match => {
                    if *put == out.len() {
                        return Ok(false);
                    }
                    let left = out.len() - *put;
                    if self.offset > *put {
                        // The match starts before this call's output: the
                        // missing prefix has to come out of the window
                        let shortfall = self.offset - *put;
                        if shortfall > self.window.have() {
                            debug!(
                                distance = self.offset,
                                history = *put + self.window.have(),
                                "match beyond available history"
                            );
                            return Err(Error::InvalidWindowOffset);
                        }
                        let n = shortfall.min(self.length).min(left);
                        self.window.read(shortfall, &mut out[*put..*put + n]);
                        *put += n;
                        self.length -= n;
                    } else {
                        // Byte order matters: with distance < length the
                        // copy overlaps itself and repeats the tail
                        let n = self.length.min(left);
                        for i in *put..*put + n {
                            out[i] = out[i - self.offset];
                        }
                        *put += n;
                        self.length -= n;
                    }
                    if self.length == 0 {
                        self.mode = Mode::Len;
                    }
                }
                Mode::Lit => {
                    if *put == out.len() {
                        return Ok(false);
                    }
                    out[*put] = self.length as u8;
                    *put += 1;
                    self.mode = Mode::Len;
                }
                Mode::Done => {
                    return Ok(true);
                }
                Mode::Bad => unreachable!("write resumed after a latched error"),
            }
        }
    }
}

/// Input buffer size
const BUFSIZ: usize = 8 * 1024;

/// Deflate streaming decompressor
///
/// Use the `Read` trait
pub struct InflateStream<R: Read> {
    /// The wrapped `Read`er
    r: R,
    /// The decoding engine
    z: Inflate,
    /// Input buffer
    input: [u8; BUFSIZ],
    /// Valid bytes in the input buffer
    len: usize,
    /// Consumed bytes in the input buffer
    pos: usize,
    /// EOF flag
    eof: bool,
}

impl<R: Read> InflateStream<R> {
    /// Creates the decompressor
    pub fn new(r: R) -> Self {
        Self {
            r,
            z: Inflate::new(DEFAULT_WINDOW_BITS),
            input: [0u8; BUFSIZ],
            len: 0,
            pos: 0,
            eof: false,
        }
    }

    /// Inflates stream data into the provided buffer
    pub fn inflate(&mut self, outbuf: &mut [u8]) -> Result<usize, std::io::Error> {
        if self.eof {
            return Ok(0);
        }
        let mut written = 0usize;
        while written < outbuf.len() {
            if self.pos == self.len {
                self.pos = 0;
                self.len = match self.r.read(&mut self.input) {
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                    Ok(v) => v,
                };
                if self.len == 0 {
                    return Err(Error::EndOfStream.into());
                }
            }
            let outbuf_len = outbuf.len();
            let mut ps = Params::new(&self.input[self.pos..self.len], &mut outbuf[written..]);
            let done = self.z.write(&mut ps)?;
            self.pos = self.len - ps.next_in.len();
            written = outbuf_len - ps.next_out.len();
            if done {
                self.eof = true;
                break;
            }
        }
        Ok(written)
    }
}

impl<R: Read> Read for InflateStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, std::io::Error> {
        self.inflate(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn inflate_all(data: &[u8]) -> Result<(Vec<u8>, bool), Error> {
        let mut out = vec![0u8; 1 << 16];
        let mut z = Inflate::new(15);
        let mut ps = Params::new(data, &mut out);
        let done = z.write(&mut ps)?;
        let n = ps.total_out as usize;
        out.truncate(n);
        Ok((out, done))
    }

    #[test]
    fn stored_blocks() {
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 16];
        let mut ps = Params::new(b"\x01\x04\x00\x13\x37aCaB", &mut out);
        assert_eq!(inf.write(&mut ps), Err(Error::InvalidStoredLength));

        let (out, done) = inflate_all(b"\x01\x04\x00\xfb\xffaCaB").unwrap();
        assert!(done);
        assert_eq!(out, b"aCaB");

        // correct complement but truncated payload: suspend, then resume
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 16];
        let mut ps = Params::new(b"\x01\x05\x00\xfa\xffaCaB", &mut out);
        assert_eq!(inf.write(&mut ps), Ok(false));
        assert_eq!(ps.total_out, 4);
        assert!(ps.next_in.is_empty());
        let mut ps2 = Params::new(b"!", ps.next_out);
        assert!(inf.write(&mut ps2).unwrap());
        assert_eq!(&out[..5], b"aCaB!");
    }

    #[test]
    fn stored_block_of_length_zero() {
        let (out, done) = inflate_all(b"\x01\x00\x00\xff\xff").unwrap();
        assert!(done);
        assert!(out.is_empty());

        // a non-final empty stored block just moves on to the next header
        let (out, done) = inflate_all(b"\x00\x00\x00\xff\xffKtNt\x02\x00").unwrap();
        assert!(done);
        assert_eq!(out, b"aCaB");
    }

    #[test]
    fn fixed_blocks() {
        let (out, done) = inflate_all(b"\x03\x00").unwrap();
        assert!(done);
        assert!(out.is_empty());

        let (out, done) = inflate_all(b"KtNt\x02\x00").unwrap();
        assert!(done);
        assert_eq!(out, b"aCaB");

        let (out, done) = inflate_all(b"\x73\x04\x00").unwrap();
        assert!(done);
        assert_eq!(out, b"A");
    }

    #[test]
    fn overlapping_match_repeats_one_byte() {
        // 'B', then a match of length 10 at distance 1
        let (out, done) = inflate_all(b"\x73\x42\x00\x00").unwrap();
        assert!(done);
        assert_eq!(out, b"BBBBBBBBBBB");
    }

    #[test]
    fn dynamic_block_with_only_end_of_block() {
        let data = [
            0x05, 0xc0, 0x11, 0x01, 0x00, 0x00, 0x00, 0x00, 0xa0, 0xff, 0xaf, 0x0b,
        ];
        let (out, done) = inflate_all(&data).unwrap();
        assert!(done);
        assert!(out.is_empty());
    }

    #[test]
    fn match_reaches_into_previous_write() {
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 8];
        // non-final stored "aCaB"
        let mut ps = Params::new(b"\x00\x04\x00\xfb\xffaCaB", &mut out);
        assert_eq!(inf.write(&mut ps), Ok(false));
        assert_eq!(ps.total_out, 4);
        // fixed block: match length 4 at distance 4, taken from the window
        let mut out2 = [0u8; 8];
        let mut ps = Params::new(b"\x03\x61\x00", &mut out2);
        assert!(inf.write(&mut ps).unwrap());
        assert_eq!(&out2[..4], b"aCaB");
    }

    #[test]
    fn match_beyond_history_is_rejected() {
        let data = [
            0x0c, 0xc0, 0x81, 0x00, 0x00, 0x00, 0x00, 0x00, 0x90, 0xff, 0x6b, 0x04, 0x00,
        ];
        assert_eq!(inflate_all(&data), Err(Error::InvalidWindowOffset));
    }

    #[test]
    fn coverage_rejections() {
        // vectors from the zlib coverage suite, pinned to their error kinds
        let cases: [(&[u8], Error); 10] = [
            (b"\x00\x00\x00\x00\x00", Error::InvalidStoredLength),
            (b"\x06", Error::InvalidBlockType),
            (b"\xfc\x00\x00", Error::TooManySymbols),
            (b"\x04\x00\x24\x49\x00", Error::InvalidBitLengthRepeat),
            (b"\x04\x00\x24\xe9\xff\xff", Error::InvalidBitLengthRepeat),
            (b"\x04\x00\x24\xe9\xff\x6d", Error::MissingEndOfBlock),
            (
                b"\x04\x80\x49\x92\x24\x49\x92\x24\x71\xff\xff\x93\x11\x00",
                Error::InvalidLiteralLengths,
            ),
            (
                b"\x04\x80\x49\x92\x24\x49\x92\x24\x0f\xb4\xff\xff\xc3\x84",
                Error::InvalidDistances,
            ),
            (b"\x02\x7e\xff\xff", Error::InvalidDistanceCode),
            (
                b"\x04\xc0\x81\x08\x00\x00\x00\x00\x20\x7f\xeb\x0b\x00\x00",
                Error::InvalidLiteralLengthCode,
            ),
        ];
        for (data, want) in cases {
            assert_eq!(inflate_all(data).unwrap_err(), want, "vector {data:02x?}");
        }
    }

    #[test]
    fn oversubscribed_code_lengths_are_rejected() {
        // nineteen one-bit code-length codes
        let data = [
            0x05, 0xe0, 0x93, 0x24, 0x49, 0x92, 0x24, 0x49, 0x92, 0x00,
        ];
        assert_eq!(inflate_all(&data), Err(Error::InvalidCodeLengths));
    }

    #[test]
    fn incomplete_code_lengths_are_tolerated() {
        // zlib proper rejects this dynamic header outright; here the table
        // builds with invalid-marker fill and the decoder just runs dry
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 16];
        let mut ps = Params::new(b"\x04\x00\xfe\xff", &mut out);
        assert_eq!(inf.write(&mut ps), Ok(false));
        assert!(ps.next_in.is_empty());
        assert_eq!(ps.total_out, 0);
    }

    #[test]
    fn errors_are_sticky() {
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 16];
        let mut ps = Params::new(b"\x06", &mut out);
        assert_eq!(inf.write(&mut ps), Err(Error::InvalidBlockType));
        // a perfectly valid stream afterwards must change nothing
        let mut ps = Params::new(b"\x01\x00\x00\xff\xff", &mut out);
        assert_eq!(inf.write(&mut ps), Err(Error::InvalidBlockType));
        assert_eq!(ps.next_in.len(), 5);
        assert_eq!(ps.total_out, 0);
    }

    #[test]
    fn write_after_end_of_stream_consumes_nothing() {
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 16];
        let mut ps = Params::new(b"\x03\x00", &mut out);
        assert!(inf.write(&mut ps).unwrap());
        let mut ps = Params::new(b"\x01\x00\x00\xff\xff", &mut out);
        assert!(inf.write(&mut ps).unwrap());
        assert_eq!(ps.next_in.len(), 5);
    }

    #[test]
    fn input_split_at_every_byte() {
        let data = b"KtNt\x02\x00";
        for split in 0..=data.len() {
            let mut inf = Inflate::new(15);
            let mut out = [0u8; 16];
            let mut total = 0u64;
            let mut done = false;
            for piece in [&data[..split], &data[split..]] {
                let mut ps = Params::new(piece, &mut out[total as usize..]);
                done = inf.write(&mut ps).unwrap();
                total += ps.total_out;
            }
            assert!(done, "split at {split}");
            assert_eq!(&out[..total as usize], b"aCaB", "split at {split}");
        }
    }

    #[test]
    fn output_one_byte_at_a_time() {
        let mut rest: &[u8] = b"\x73\x42\x00\x00";
        let mut inf = Inflate::new(15);
        let mut collected = Vec::new();
        loop {
            let mut byte = [0u8];
            let mut step = Params::new(rest, &mut byte);
            let done = inf.write(&mut step).unwrap();
            let emitted = step.total_out == 1;
            rest = step.next_in;
            if emitted {
                collected.push(byte[0]);
            }
            if done {
                break;
            }
        }
        assert_eq!(collected, b"BBBBBBBBBBB");
    }

    #[test]
    fn totals_accumulate_across_calls() {
        let data = b"KtNt\x02\x00";
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 2];
        let mut ps = Params::new(&data[..3], &mut out);
        assert!(!inf.write(&mut ps).unwrap());
        let (total_in, total_out) = (ps.total_in, ps.total_out);
        let mut out2 = [0u8; 16];
        let mut ps = Params {
            next_in: &data[3..],
            next_out: &mut out2,
            total_in,
            total_out,
        };
        assert!(inf.write(&mut ps).unwrap());
        assert_eq!(ps.total_in, 6);
        assert_eq!(ps.total_out, 4);
    }

    #[test]
    fn reset_allows_reuse() {
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 16];
        let mut ps = Params::new(b"\x06", &mut out);
        assert!(inf.write(&mut ps).is_err());
        inf.reset(15);
        let mut ps = Params::new(b"KtNt\x02\x00", &mut out);
        assert!(inf.write(&mut ps).unwrap());
        assert_eq!(&out[..4], b"aCaB");
    }

    #[test]
    fn reset_clears_the_window() {
        let mut inf = Inflate::new(15);
        let mut out = [0u8; 8];
        let mut ps = Params::new(b"\x00\x04\x00\xfb\xffaCaB", &mut out);
        assert_eq!(inf.write(&mut ps), Ok(false));
        inf.reset(15);
        // the same window-match block now has no history to draw from
        let mut out2 = [0u8; 8];
        let mut ps = Params::new(b"\x03\x61\x00", &mut out2);
        assert_eq!(inf.write(&mut ps), Err(Error::InvalidWindowOffset));
    }

    #[test]
    fn read_adapter_decodes() {
        let mut stream = InflateStream::new(b"\x01\x04\x00\xfb\xffaCaB".as_ref());
        let mut decomp = Vec::new();
        stream.read_to_end(&mut decomp).unwrap();
        assert_eq!(decomp, b"aCaB");
        // reads after the end keep returning zero
        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn read_adapter_reports_truncation() {
        let mut stream = InflateStream::new(b"\x01\x05\x00\xfa\xffaCaB".as_ref());
        let mut decomp = Vec::new();
        let err = stream.read_to_end(&mut decomp).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_adapter_reports_bad_data() {
        let mut stream = InflateStream::new(b"\x06".as_ref());
        let mut decomp = Vec::new();
        let err = stream.read_to_end(&mut decomp).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
