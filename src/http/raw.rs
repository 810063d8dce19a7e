//! Captured response parsing.
//!
//! # Responsibilities
//! - Turn a raw `HTTP/1.x` response blob into status, headers and body
//! - Drop `Transfer-Encoding` so chunking markers never reach the replayed response
//!
//! # Design Decisions
//! - Accepts CRLF and bare LF line endings in the head
//! - The body is every byte after the first blank line, untouched
//! - A missing blank line means "no body"
//! - Obsolete line folding is joined onto the previous header value

use axum::body::Bytes;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, TRANSFER_ENCODING};
use axum::http::StatusCode;

/// Error type for fixture parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("response has no status line")]
    MissingStatusLine,

    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("invalid status code: {0:?}")]
    InvalidStatusCode(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },
}

/// Structured form of a fixture, built fresh for every request.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub status: StatusCode,
    /// Reason phrase from the status line, possibly empty.
    pub reason: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Parse a captured response.
pub fn parse(raw: &Bytes) -> Result<ParsedResponse, ParseError> {
    let (head, body) = split_head(raw);
    let mut lines = head.iter().copied();

    let status_line = match lines.next() {
        Some(line) if !line.is_empty() => String::from_utf8_lossy(line).into_owned(),
        _ => return Err(ParseError::MissingStatusLine),
    };
    let (status, reason) = parse_status_line(&status_line)?;

    let mut headers = HeaderMap::new();
    let mut last: Option<(HeaderName, Vec<u8>)> = None;

    for line in lines {
        if line.first().is_some_and(|b| *b == b' ' || *b == b'\t') {
            match last.as_mut() {
                Some((_, value)) => {
                    value.push(b' ');
                    value.extend_from_slice(trim(line));
                    continue;
                }
                None => {
                    return Err(ParseError::MalformedHeader(
                        String::from_utf8_lossy(line).into_owned(),
                    ))
                }
            }
        }

        if let Some((name, value)) = last.take() {
            append_header(&mut headers, name, value)?;
        }

        let colon = line
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| ParseError::MalformedHeader(String::from_utf8_lossy(line).into_owned()))?;
        let raw_name = trim(&line[..colon]);
        let name = HeaderName::from_bytes(raw_name).map_err(|_| ParseError::InvalidHeader {
            name: String::from_utf8_lossy(raw_name).into_owned(),
        })?;
        last = Some((name, trim(&line[colon + 1..]).to_vec()));
    }

    if let Some((name, value)) = last.take() {
        append_header(&mut headers, name, value)?;
    }

    Ok(ParsedResponse {
        status,
        reason,
        headers,
        body,
    })
}

fn append_header(headers: &mut HeaderMap, name: HeaderName, value: Vec<u8>) -> Result<(), ParseError> {
    if name == TRANSFER_ENCODING {
        return Ok(());
    }
    let value = HeaderValue::from_bytes(&value).map_err(|_| ParseError::InvalidHeader {
        name: name.to_string(),
    })?;
    headers.append(name, value);
    Ok(())
}

/// `HTTP/1.1 201 Created` → (201, "Created").
fn parse_status_line(line: &str) -> Result<(StatusCode, String), ParseError> {
    let mut parts = line.trim().splitn(3, ' ');
    let proto = parts.next().unwrap_or_default();
    if !proto.starts_with("HTTP/") {
        return Err(ParseError::MalformedStatusLine(line.to_string()));
    }

    let code = parts
        .next()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ParseError::MalformedStatusLine(line.to_string()))?;
    if code.len() != 3 {
        return Err(ParseError::InvalidStatusCode(code.to_string()));
    }
    let status = StatusCode::from_bytes(code.as_bytes())
        .map_err(|_| ParseError::InvalidStatusCode(code.to_string()))?;

    let reason = parts.next().unwrap_or_default().trim().to_string();
    Ok((status, reason))
}

/// Split into head lines (without terminators) and the body slice.
fn split_head(raw: &Bytes) -> (Vec<&[u8]>, Bytes) {
    let mut lines = Vec::new();
    let mut start = 0;

    while start < raw.len() {
        let (line, next) = match raw[start..].iter().position(|b| *b == b'\n') {
            Some(nl) => (&raw[start..start + nl], start + nl + 1),
            None => (&raw[start..], raw.len()),
        };
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        if line.is_empty() && !lines.is_empty() {
            return (lines, raw.slice(next..));
        }
        lines.push(line);
        start = next;
    }

    (lines, Bytes::new())
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(raw: &'static str) -> Result<ParsedResponse, ParseError> {
        parse(&Bytes::from_static(raw.as_bytes()))
    }

    #[test]
    fn parses_status_headers_and_body() {
        let resp = parse_str(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"a\":1}",
        )
        .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.reason, "OK");
        assert_eq!(resp.headers["content-type"], "application/json");
        assert_eq!(resp.body.as_ref(), b"{\"a\":1}");
    }

    #[test]
    fn accepts_bare_newlines() {
        let resp = parse_str("HTTP/1.1 201 Created\nLocation: /unicorns/1\n\nbody\n").unwrap();
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(resp.headers["location"], "/unicorns/1");
        assert_eq!(resp.body.as_ref(), b"body\n");
    }

    #[test]
    fn strips_transfer_encoding_only_from_head() {
        let resp = parse_str(
            "HTTP/1.1 200 OK\nTransfer-Encoding: chunked\nTRANSFER-ENCODING: gzip\nServer: nginx\n\nTransfer-Encoding: stays in body",
        )
        .unwrap();

        assert!(resp.headers.get(TRANSFER_ENCODING).is_none());
        assert_eq!(resp.headers["server"], "nginx");
        assert_eq!(resp.body.as_ref(), b"Transfer-Encoding: stays in body");
    }

    #[test]
    fn keeps_duplicate_headers_in_order() {
        let resp = parse_str("HTTP/1.1 200 OK\nSet-Cookie: a=1\nset-cookie: b=2\n\n").unwrap();
        let cookies: Vec<_> = resp.headers.get_all("set-cookie").iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }

    #[test]
    fn missing_separator_means_empty_body() {
        let resp = parse_str("HTTP/1.1 200 OK\nContent-Length: 0\nConnection: keep-alive").unwrap();
        assert_eq!(resp.headers["connection"], "keep-alive");
        assert!(resp.body.is_empty());
    }

    #[test]
    fn body_bytes_are_verbatim() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\n\x00\xff\r\n\r\nmore".to_vec();
        let resp = parse(&Bytes::from(raw)).unwrap();
        assert_eq!(resp.body.as_ref(), b"\x00\xff\r\n\r\nmore");
    }

    #[test]
    fn status_without_reason() {
        let resp = parse_str("HTTP/1.1 204\r\n\r\n").unwrap();
        assert_eq!(resp.status, StatusCode::NO_CONTENT);
        assert_eq!(resp.reason, "");
    }

    #[test]
    fn folded_header_is_joined() {
        let resp = parse_str("HTTP/1.1 200 OK\nX-Long: first\n  second\n\n").unwrap();
        assert_eq!(resp.headers["x-long"], "first second");
    }

    #[test]
    fn rejects_broken_fixtures() {
        assert!(matches!(parse_str(""), Err(ParseError::MissingStatusLine)));
        assert!(matches!(parse_str("\r\nHTTP/1.1 200 OK"), Err(ParseError::MissingStatusLine)));
        assert!(matches!(parse_str("200 OK\n\n"), Err(ParseError::MalformedStatusLine(_))));
        assert!(matches!(parse_str("HTTP/1.1\n\n"), Err(ParseError::MalformedStatusLine(_))));
        assert!(matches!(parse_str("HTTP/1.1 2000 OK\n\n"), Err(ParseError::InvalidStatusCode(_))));
        assert!(matches!(parse_str("HTTP/1.1 abc OK\n\n"), Err(ParseError::InvalidStatusCode(_))));
        assert!(matches!(
            parse_str("HTTP/1.1 200 OK\nno colon here\n\n"),
            Err(ParseError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_str("HTTP/1.1 200 OK\nbad name: x\n\n"),
            Err(ParseError::InvalidHeader { .. })
        ));
    }
}
