//! HTML utility functions.
//!
//! The `tl` parser hands out attribute values and text as written in the
//! source, so entity references have to be decoded before values are compared.
//! It also stops an unquoted attribute value at the first `/`, so sources are
//! normalized with [`quote_unquoted_attributes`] before parsing.

use std::borrow::Cow;

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }

        // Collect entity
        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if entity.len() > 10 || next == '&' || next.is_whitespace() {
                break;
            }
            entity.push(next);
            chars.next();
        }

        if !terminated {
            // Not an entity reference, keep the text as written
            result.push('&');
            result.push_str(&entity);
            continue;
        }

        match decode_entity(&entity) {
            Some(decoded) => result.push(decoded),
            None => {
                result.push('&');
                result.push_str(&entity);
                result.push(';');
            }
        }
    }

    Cow::Owned(result)
}

/// Decode a single entity name (without `&` and `;`).
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse().ok()
            };
            code.and_then(char::from_u32)
        }
        _ => None,
    }
}

/// Elements whose content is raw text: no tags are recognized inside.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Wrap unquoted attribute values of start tags in double quotes.
///
/// `href=https://example.org/a` becomes `href="https://example.org/a"`.
/// Comments and the content of raw-text elements are copied unchanged.
pub fn quote_unquoted_attributes(html: &str) -> Cow<'_, str> {
    let bytes = html.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        if html[i..].starts_with("<!--") {
            i = html[i + 4..]
                .find("-->")
                .map_or(bytes.len(), |end| i + 4 + end + 3);
            continue;
        }
        if !bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < bytes.len() && !is_tag_delimiter(bytes[j]) {
            j += 1;
        }
        let name = html[i + 1..j].to_ascii_lowercase();

        loop {
            while j < bytes.len() && (bytes[j].is_ascii_whitespace() || bytes[j] == b'/') {
                j += 1;
            }
            if j >= bytes.len() {
                break;
            }
            if bytes[j] == b'>' {
                j += 1;
                break;
            }

            // Attribute name, at least one byte so a stray `=` cannot stall the scan
            j += 1;
            while j < bytes.len() && !is_tag_delimiter(bytes[j]) && bytes[j] != b'=' {
                j += 1;
            }

            let mut k = skip_whitespace(bytes, j);
            if bytes.get(k) != Some(&b'=') {
                continue;
            }
            k = skip_whitespace(bytes, k + 1);

            match bytes.get(k) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    j = html[k + 1..]
                        .find(char::from(quote))
                        .map_or(bytes.len(), |end| k + 1 + end + 1);
                }
                Some(_) => {
                    let start = k;
                    while k < bytes.len() && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        k += 1;
                    }
                    let buf = out.get_or_insert_with(|| String::with_capacity(html.len() + 16));
                    buf.push_str(&html[copied..start]);
                    buf.push('"');
                    buf.push_str(&html[start..k].replace('"', "&quot;"));
                    buf.push('"');
                    copied = k;
                    j = k;
                }
                None => j = k,
            }
        }
        i = j;

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            let close = format!("</{name}");
            i = find_ignore_ascii_case(&html[i..], &close).map_or(bytes.len(), |pos| i + pos);
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&html[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(html),
    }
}

#[inline]
fn is_tag_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

#[inline]
fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
