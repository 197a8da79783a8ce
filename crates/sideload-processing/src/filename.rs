//! Filename selection for stored files
//!
//! A non-empty title becomes a URL-safe slug plus the extension for the
//! detected type; otherwise the URL's last path segment is used as-is.

use deunicode::deunicode;
use percent_encoding::percent_decode_str;
use sideload_core::mime::extension_for_mime_type;

/// Byte budget for a name's stem. Leaves room for a `-N` collision suffix and
/// the extension inside the usual 255-byte filesystem limit.
const MAX_STEM_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;
const FALLBACK_STEM: &str = "image";

/// Lowercase slug: accented letters are transliterated to ASCII, then ASCII
/// alphanumerics, `_` and `-` survive, whitespace and `.` turn into `-`, and
/// everything else is dropped. Dash runs collapse and edge dashes are trimmed.
pub fn sanitize_title_with_dashes(title: &str) -> String {
    let ascii = deunicode(title.trim());
    let mut slug = String::with_capacity(ascii.len());

    for c in ascii.chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'a'..='z' | '0'..='9' | '_' => Some(c),
            '-' | '.' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        };

        if let Some(m) = mapped {
            if m == '-' && slug.ends_with('-') {
                continue;
            }
            slug.push(m);
        }
    }

    slug.trim_matches('-').to_string()
}

/// Cut `stem` to the byte budget on a char boundary. A cut stem loses any
/// trailing `-` or `.`.
fn fit_stem(stem: &str) -> &str {
    if stem.len() <= MAX_STEM_BYTES {
        return stem;
    }
    let mut end = MAX_STEM_BYTES;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem[..end].trim_end_matches(['-', '.'])
}

/// Reduce a name to filesystem-safe characters. Returns `None` when nothing
/// usable is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    if base.contains("..") {
        return None;
    }

    let s: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let (stem, extension) = match s.rfind('.') {
        Some(idx) if idx > 0 && s.len() - idx <= MAX_EXTENSION_BYTES => s.split_at(idx),
        _ => (s.as_str(), ""),
    };
    let s = format!("{}{}", fit_stem(stem), extension);

    if s.chars().all(|c| c == '.' || c == '_') {
        None
    } else {
        Some(s)
    }
}

/// Last path segment of `url`, percent-decoded and sanitized. Query string
/// and fragment are ignored.
pub fn filename_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);

    // Skip past "scheme://host" so a bare host never becomes the name.
    let path = match path.find("://") {
        Some(idx) => {
            let rest = &path[idx + 3..];
            rest.find('/').map(|slash| &rest[slash..]).unwrap_or("")
        }
        None => path,
    };

    let segment = path.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        return None;
    }

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    sanitize_filename(&decoded)
}

/// Filename to store an import under.
pub fn select_filename(title: &str, url: &str, mime_type: &str) -> String {
    let extension = extension_for_mime_type(mime_type);

    if title.is_empty() {
        return filename_from_url(url)
            .unwrap_or_else(|| format!("{}{}", FALLBACK_STEM, extension));
    }

    let slug = sanitize_title_with_dashes(title);
    let stem = match fit_stem(&slug) {
        "" => FALLBACK_STEM,
        fitted => fitted,
    };
    format!("{}{}", stem, extension)
}
