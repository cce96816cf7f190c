//! stream.rs - Chunk-boundary-safe normalization and redaction of file content.
//!
//! [`ChunkNormalizer`] turns a byte stream delivered in arbitrary pieces into
//! UTF-8 text with `\n` line endings and secrets masked. Its output does not
//! depend on how the input was chunked: text is only released at positions
//! where no redaction rule could match across the cut.
//!
//! [`stream_redacted`] and [`stream_file`] drive a normalizer between an
//! `AsyncRead` source and an `AsyncWrite` sink.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, trace};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::StreamError;
use crate::redaction::{CompiledRules, BUILTIN};

/// Minimum look-ahead kept behind a cut that does not follow a newline.
pub const CARRY_LEN: usize = 200;

/// Carried text beyond this size is cut even without a safe position.
pub const MAX_CARRY_LEN: usize = 1 << 20;

/// Size of each read from the source.
pub const READ_CHUNK_LEN: usize = 8 * 1024;

/// Incremental UTF-8 decoder that matches a one-shot lossy decode.
#[derive(Debug, Default)]
struct Utf8Decoder {
    partial: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8], out: &mut String) {
        let joined;
        let mut input: &[u8] = if self.partial.is_empty() {
            bytes
        } else {
            let mut buffered = std::mem::take(&mut self.partial);
            buffered.extend_from_slice(bytes);
            joined = buffered;
            &joined
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    return;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&input[..valid_up_to]) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &input[valid_up_to + len..];
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more bytes.
                            self.partial = input[valid_up_to..].to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    fn finish(&mut self, out: &mut String) {
        if !self.partial.is_empty() {
            self.partial.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

/// Rewrites `\r\n` and bare `\r` as `\n`, holding a trailing `\r` until the
/// next character is known.
#[derive(Debug, Default)]
struct LineEndings {
    pending_cr: bool,
}

impl LineEndings {
    fn normalize(&mut self, text: &str, out: &mut String) {
        for ch in text.chars() {
            if self.pending_cr {
                self.pending_cr = false;
                out.push('\n');
                if ch == '\n' {
                    continue;
                }
            }
            if ch == '\r' {
                self.pending_cr = true;
            } else {
                out.push(ch);
            }
        }
    }

    fn finish(&mut self, out: &mut String) {
        if self.pending_cr {
            self.pending_cr = false;
            out.push('\n');
        }
    }
}

/// Stateful stream transform: bytes in, normalized and redacted text out.
///
/// Feed chunks with [`push`](Self::push) and call [`finish`](Self::finish)
/// once at the end. Concatenating every returned string gives the same text
/// regardless of chunk sizes.
///
/// ```
/// use codectx_core::ChunkNormalizer;
///
/// let mut normalizer = ChunkNormalizer::new(true);
/// let mut out = String::new();
/// for byte in b"API_KEY=supersecret\r\n" {
///     out.push_str(&normalizer.push(&[*byte]));
/// }
/// out.push_str(&normalizer.finish());
/// assert_eq!(out, "API_KEY=[REDACTED]\n");
/// ```
#[derive(Debug)]
pub struct ChunkNormalizer<'r> {
    decoder: Utf8Decoder,
    line_endings: LineEndings,
    rules: Option<&'r CompiledRules>,
    carry: String,
    next_attempt: usize,
}

impl ChunkNormalizer<'static> {
    /// Creates a normalizer using the built-in rules, or none when `redact`
    /// is false.
    pub fn new(redact: bool) -> Self {
        let rules: Option<&'static CompiledRules> = if redact { Some(&*BUILTIN) } else { None };
        ChunkNormalizer::with_rules(rules)
    }
}

impl<'r> ChunkNormalizer<'r> {
    /// Creates a normalizer applying `rules`. `None` disables redaction.
    pub fn with_rules(rules: Option<&'r CompiledRules>) -> Self {
        Self {
            decoder: Utf8Decoder::default(),
            line_endings: LineEndings::default(),
            rules,
            carry: String::new(),
            next_attempt: CARRY_LEN,
        }
    }

    /// Consumes one chunk and returns the text that is now safe to emit.
    /// The result is often empty.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        let mut decoded = String::with_capacity(chunk.len());
        self.decoder.decode(chunk, &mut decoded);
        self.line_endings.normalize(&decoded, &mut self.carry);
        self.release()
    }

    /// Ends the stream and returns everything still held back.
    pub fn finish(mut self) -> String {
        let mut tail = String::new();
        self.decoder.finish(&mut tail);
        self.line_endings.normalize(&tail, &mut self.carry);
        self.line_endings.finish(&mut self.carry);
        let rest = std::mem::take(&mut self.carry);
        self.render(&rest)
    }

    fn render(&self, text: &str) -> String {
        match self.rules {
            Some(rules) => rules.redact(text),
            None => text.to_string(),
        }
    }

    fn release(&mut self) -> String {
        let Some(rules) = self.rules else {
            return std::mem::take(&mut self.carry);
        };
        // Cut attempts are spaced out so a long carry is not rescanned on
        // every small push.
        if self.carry.len() < self.next_attempt {
            return String::new();
        }

        let cut = safe_cut(rules, &self.carry);
        if cut == 0 {
            self.next_attempt = (self.carry.len() * 2).min(MAX_CARRY_LEN + 1);
            trace!(target: "codectx_core::stream", "No safe cut in {} carried bytes.", self.carry.len());
            return String::new();
        }

        let head: String = self.carry.drain(..cut).collect();
        self.next_attempt = self.carry.len() + CARRY_LEN;
        trace!(target: "codectx_core::stream", "Released {} bytes, carrying {}.", head.len(), self.carry.len());
        rules.redact(&head)
    }
}

/// Furthest position in `text` at which it can be split without changing
/// what `rules` would mask. Returns 0 when there is none.
fn safe_cut(rules: &CompiledRules, text: &str) -> usize {
    let limit = rules.open_block_start(text).unwrap_or(text.len());
    let horizon = text.len().saturating_sub(CARRY_LEN);
    // A key-value separator may still be growing at the end of the buffer.
    let blank_tail = text.trim_end_matches([' ', '\t']).len();
    let spans = rules.protected_spans(text);

    let cut = text[..limit]
        .char_indices()
        .rev()
        .filter(|(_, ch)| ch.is_whitespace())
        .map(|(idx, ch)| (idx + ch.len_utf8(), ch))
        .find(|&(pos, ch)| {
            (ch == '\n' || pos <= horizon)
                && pos <= blank_tail
                && !spans.iter().any(|span| span.start < pos && pos < span.end)
        })
        .map(|(pos, _)| pos)
        .unwrap_or(0);

    if cut == 0 && text.len() > MAX_CARRY_LEN {
        let mut forced = horizon;
        while !text.is_char_boundary(forced) {
            forced -= 1;
        }
        debug!(
            target: "codectx_core::stream",
            "Carry exceeded {} bytes without a safe cut; forcing one at {}.",
            MAX_CARRY_LEN,
            forced
        );
        return forced;
    }
    cut
}

/// Streams `reader` through a [`ChunkNormalizer`] into `writer`.
///
/// Each piece of output is written with `write_all`, so a slow sink holds
/// back further reads. Returns the number of bytes written. A write failure
/// stops the stream immediately.
pub async fn stream_redacted<R, W>(mut reader: R, writer: &mut W, redact: bool) -> Result<u64, StreamError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut normalizer = ChunkNormalizer::new(redact);
    let mut buf = vec![0u8; READ_CHUNK_LEN];
    let mut written = 0u64;

    loop {
        let read = reader.read(&mut buf).await.map_err(StreamError::Read)?;
        if read == 0 {
            break;
        }
        let text = normalizer.push(&buf[..read]);
        written += write_text(writer, &text).await?;
    }

    let tail = normalizer.finish();
    written += write_text(writer, &tail).await?;
    Ok(written)
}

async fn write_text<W>(writer: &mut W, text: &str) -> Result<u64, StreamError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if text.is_empty() {
        return Ok(0);
    }
    writer
        .write_all(text.as_bytes())
        .await
        .map_err(StreamError::Write)?;
    Ok(text.len() as u64)
}

/// Opens `path` and streams its normalized content into `writer`.
///
/// The file handle is dropped when this returns, on success or failure.
pub async fn stream_file<P, W>(path: P, writer: &mut W, redact: bool) -> Result<u64, StreamError>
where
    P: AsRef<Path>,
    W: AsyncWrite + Unpin + ?Sized,
{
    let path = path.as_ref();
    let file = File::open(path).await.map_err(|source| StreamError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let written = stream_redacted(file, writer, redact).await?;
    debug!(target: "codectx_core::stream", "Streamed {} bytes from {}", written, path.display());
    Ok(written)
}
