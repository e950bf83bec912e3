//! Just enough RFC 5322 / MIME to pull the subject, date and body out of a
//! saved newsletter email.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENCODED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=\?([^?]+)\?([BbQq])\?([^?]*)\?=").unwrap());
static BETWEEN_ENCODED_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?=\s+=\?").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub mime: String,
    pub boundary: Option<String>,
    pub charset: Option<String>,
}

impl ContentType {
    fn parse(raw: &str) -> Self {
        let mut pieces = raw.split(';');
        let mime = pieces
            .next()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "text/plain".to_string());

        let mut boundary = None;
        let mut charset = None;
        for param in pieces {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim().to_lowercase().as_str() {
                "boundary" => boundary = Some(value),
                "charset" => charset = Some(value),
                _ => {}
            }
        }

        Self {
            mime,
            boundary,
            charset,
        }
    }

    pub fn is_multipart(&self) -> bool {
        self.mime.starts_with("multipart/")
    }
}

/// A message or one part of a multipart body.
#[derive(Debug, Clone)]
pub struct Message {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Message {
    pub fn parse(raw: &[u8]) -> Self {
        let start = raw
            .iter()
            .position(|b| *b != b'\r' && *b != b'\n')
            .unwrap_or(raw.len());
        let (head, body) = split_head_and_body(&raw[start..]);

        Self {
            headers: parse_headers(&String::from_utf8_lossy(head)),
            body: body.to_vec(),
        }
    }

    /// The first header with this name, with encoded words decoded.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| decode_encoded_words(value))
    }

    pub fn content_type(&self) -> ContentType {
        ContentType::parse(&self.header("Content-Type").unwrap_or_default())
    }

    /// The body with its transfer encoding undone, decoded from its charset.
    pub fn decoded_body(&self) -> String {
        let encoding = self
            .header("Content-Transfer-Encoding")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let bytes = match encoding.as_str() {
            "base64" => {
                let compact: Vec<u8> = self
                    .body
                    .iter()
                    .copied()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                match STANDARD.decode(compact) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!(error = %e, "Body is not valid base64, keeping it as is");
                        self.body.clone()
                    }
                }
            }
            "quoted-printable" => decode_quoted_printable(&self.body),
            _ => self.body.clone(),
        };

        decode_charset(&bytes, self.content_type().charset.as_deref())
    }

    pub fn parts(&self) -> Vec<Message> {
        let content_type = self.content_type();
        match content_type.boundary {
            Some(boundary) if content_type.is_multipart() => {
                split_multipart(&self.body, &boundary)
                    .iter()
                    .map(|part| Message::parse(part))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Depth-first search for the first leaf part of the given type.
    pub fn find_text(&self, mime: &str) -> Option<String> {
        let content_type = self.content_type();
        if content_type.is_multipart() {
            return self.parts().iter().find_map(|part| part.find_text(mime));
        }

        (content_type.mime == mime).then(|| self.decoded_body())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split_head_and_body(raw: &[u8]) -> (&[u8], &[u8]) {
    for separator in [&b"\r\n\r\n"[..], &b"\n\n"[..]] {
        if let Some(at) = find(raw, separator) {
            return (&raw[..at], &raw[at + separator.len()..]);
        }
    }
    (raw, &raw[raw.len()..])
}

fn parse_headers(head: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in head.lines() {
        if line.starts_with([' ', '\t']) {
            // Folded continuation of the previous header.
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}

fn split_multipart(body: &[u8], boundary: &str) -> Vec<Vec<u8>> {
    let delimiter = format!("--{}", boundary);
    let terminator = format!("--{}--", boundary);

    let mut parts = Vec::new();
    let mut current: Option<Vec<&[u8]>> = None;

    for line in body.split(|b| *b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let trimmed = String::from_utf8_lossy(line);
        let trimmed = trimmed.trim_end();
        if trimmed == terminator {
            break;
        }
        if trimmed == delimiter {
            if let Some(lines) = current.take() {
                parts.push(lines.join(&b'\n'));
            }
            current = Some(Vec::new());
            continue;
        }
        if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some(lines) = current {
        parts.push(lines.join(&b'\n'));
    }

    parts
}

/// Decode text in the named charset. Unknown or missing charsets are read as
/// UTF-8.
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(charset = encoding.name(), "Text has bytes outside its charset");
    }
    text.into_owned()
}

pub fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] != b'=' {
            out.push(input[i]);
            i += 1;
            continue;
        }

        // Soft line break.
        if input[i + 1..].starts_with(b"\r\n") {
            i += 3;
            continue;
        }
        if input[i + 1..].starts_with(b"\n") {
            i += 2;
            continue;
        }

        let hex = input
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok());
        match hex {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}

/// Decode RFC 2047 encoded words such as `=?UTF-8?B?...?=`.
pub fn decode_encoded_words(value: &str) -> String {
    let joined = BETWEEN_ENCODED_WORDS.replace_all(value, "?==?");

    ENCODED_WORD
        .replace_all(&joined, |caps: &Captures| {
            let charset = Some(&caps[1]);
            let text = &caps[3];
            match &caps[2] {
                "B" | "b" => STANDARD
                    .decode(text)
                    .map(|bytes| decode_charset(&bytes, charset))
                    .unwrap_or_else(|_| caps[0].to_string()),
                _ => decode_charset(
                    &decode_quoted_printable(text.replace('_', " ").as_bytes()),
                    charset,
                ),
            }
        })
        .into_owned()
}
