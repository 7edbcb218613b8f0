use std::io;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// Largest status line plus header block accepted before giving up.
pub(crate) const MAX_HEAD_BYTES: usize = 64 * 1024;

const CRLF: &[u8] = b"\r\n";
const HEAD_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    Size,
    Data { remaining: u64 },
    DataCrlf,
    Trailers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Head,
    Body { status: u16, remaining: u64 },
    Chunked { status: u16, chunk: ChunkState },
    UntilClose { status: u16 },
}

enum Framing {
    Empty,
    Length(u64),
    Chunked,
    UntilClose,
}

/// Splits an HTTP/1.1 response stream into one status code per response.
///
/// Bodies are consumed and discarded; only the final status of each
/// response is yielded. Interim `1xx` responses are skipped.
#[derive(Debug)]
pub(crate) struct ResponseDecoder {
    state: State,
}

impl ResponseDecoder {
    pub(crate) const fn new() -> Self {
        Self { state: State::Head }
    }
}

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_head(head: &[u8]) -> io::Result<(u16, Framing)> {
    let text = std::str::from_utf8(head).map_err(|err| invalid(err.to_string()))?;
    let mut lines = text.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(invalid(format!("bad status line: {status_line}")));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|code| (100..=999).contains(code))
        .ok_or_else(|| invalid(format!("bad status line: {status_line}")))?;

    let mut content_length = None;
    let mut chunked = false;
    for line in lines.filter(|line| !line.is_empty()) {
        let Some((name, value)) = line.split_once(':') else {
            return Err(invalid(format!("bad header line: {line}")));
        };
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            let length = value
                .parse::<u64>()
                .map_err(|err| invalid(format!("bad content-length {value}: {err}")))?;
            content_length = Some(length);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = value
                .rsplit(',')
                .next()
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }
    }

    let framing = if matches!(status, 100..=199 | 204 | 304) {
        Framing::Empty
    } else if chunked {
        Framing::Chunked
    } else {
        match content_length {
            Some(0) => Framing::Empty,
            Some(length) => Framing::Length(length),
            None => Framing::UntilClose,
        }
    };
    Ok((status, framing))
}

/// Drop up to `remaining` bytes from `src`, returning what is still owed.
fn skip(src: &mut BytesMut, remaining: u64) -> u64 {
    let available = u64::try_from(src.len()).unwrap_or(u64::MAX);
    let take = remaining.min(available);
    src.advance(usize::try_from(take).unwrap_or(src.len()));
    remaining.saturating_sub(take)
}

impl Decoder for ResponseDecoder {
    type Item = u16;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                State::Head => {
                    let Some(end) = find(src, HEAD_END) else {
                        if src.len() > MAX_HEAD_BYTES {
                            return Err(invalid("response head too large"));
                        }
                        return Ok(None);
                    };
                    let head = src.split_to(end.saturating_add(HEAD_END.len()));
                    let (status, framing) = parse_head(&head)?;
                    if (100..=199).contains(&status) {
                        continue;
                    }
                    match framing {
                        Framing::Empty => return Ok(Some(status)),
                        Framing::Length(remaining) => {
                            self.state = State::Body { status, remaining };
                        }
                        Framing::Chunked => {
                            self.state = State::Chunked {
                                status,
                                chunk: ChunkState::Size,
                            };
                        }
                        Framing::UntilClose => self.state = State::UntilClose { status },
                    }
                }
                State::Body { status, remaining } => {
                    let remaining = skip(src, remaining);
                    if remaining == 0 {
                        self.state = State::Head;
                        return Ok(Some(status));
                    }
                    self.state = State::Body { status, remaining };
                    return Ok(None);
                }
                State::Chunked { status, chunk } => {
                    let next = match chunk {
                        ChunkState::Size => {
                            let Some(end) = find(src, CRLF) else {
                                return self.need_line(src);
                            };
                            let line = src.split_to(end.saturating_add(CRLF.len()));
                            let size = parse_chunk_size(&line)?;
                            if size == 0 {
                                ChunkState::Trailers
                            } else {
                                ChunkState::Data { remaining: size }
                            }
                        }
                        ChunkState::Data { remaining } => {
                            let remaining = skip(src, remaining);
                            if remaining > 0 {
                                self.state = State::Chunked {
                                    status,
                                    chunk: ChunkState::Data { remaining },
                                };
                                return Ok(None);
                            }
                            ChunkState::DataCrlf
                        }
                        ChunkState::DataCrlf => {
                            if src.len() < CRLF.len() {
                                return Ok(None);
                            }
                            if !src.starts_with(CRLF) {
                                return Err(invalid("chunk data not followed by CRLF"));
                            }
                            src.advance(CRLF.len());
                            ChunkState::Size
                        }
                        ChunkState::Trailers => {
                            let Some(end) = find(src, CRLF) else {
                                return self.need_line(src);
                            };
                            src.advance(end.saturating_add(CRLF.len()));
                            if end == 0 {
                                self.state = State::Head;
                                return Ok(Some(status));
                            }
                            ChunkState::Trailers
                        }
                    };
                    self.state = State::Chunked {
                        status,
                        chunk: next,
                    };
                }
                State::UntilClose { .. } => {
                    src.clear();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(status) = self.decode(buf)? {
            return Ok(Some(status));
        }
        match self.state {
            State::UntilClose { status } => {
                self.state = State::Head;
                Ok(Some(status))
            }
            State::Head if buf.is_empty() => Ok(None),
            State::Head | State::Body { .. } | State::Chunked { .. } => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-response",
            )),
        }
    }
}

impl ResponseDecoder {
    fn need_line(&self, src: &BytesMut) -> io::Result<Option<u16>> {
        if src.len() > MAX_HEAD_BYTES {
            return Err(invalid(format!(
                "chunk framing line too long in state {:?}",
                self.state
            )));
        }
        Ok(None)
    }
}

fn parse_chunk_size(line: &[u8]) -> io::Result<u64> {
    let text = std::str::from_utf8(line).map_err(|err| invalid(err.to_string()))?;
    let size = text
        .trim_end_matches(['\r', '\n'])
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    u64::from_str_radix(size, 16).map_err(|err| invalid(format!("bad chunk size {size}: {err}")))
}
