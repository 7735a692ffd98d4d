//! HTML to plain text conversion.

/// Tags whose contents are never visible.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "head", "title"];

/// Tags that start or end a line of text.
const BLOCK_TAGS: [&str; 22] = [
    "br", "p", "div", "tr", "li", "ul", "ol", "table", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "pre", "hr", "section", "article", "header", "footer", "td",
];

/// Converts HTML to its visible plain text.
///
/// This is a simple conversion that:
/// - Strips tags and comments
/// - Drops `<script>`, `<style>` and `<head>` contents
/// - Converts block elements to line breaks
/// - Decodes named and numeric entities
/// - Collapses runs of whitespace
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' if starts_markup(rest) => {
                if let Some(after) = rest.strip_prefix("<!--") {
                    rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                    continue;
                }

                let Some(end) = rest.find('>') else {
                    // Unterminated tag reads as text
                    out.push('<');
                    rest = &rest[1..];
                    continue;
                };
                let tag = &rest[1..end];
                rest = &rest[end + 1..];

                let name = tag_name(tag);
                if HIDDEN_TAGS.contains(&name.as_str()) && !tag.ends_with('/') {
                    rest = skip_element(rest, &name);
                } else if BLOCK_TAGS.contains(&name.trim_start_matches('/')) {
                    push_break(&mut out);
                }
            }
            '&' => {
                let (decoded, consumed) = decode_entity(rest);
                match decoded {
                    Some(ch) if ch.is_whitespace() => push_space(&mut out),
                    Some(ch) => out.push(ch),
                    None => out.push('&'),
                }
                rest = &rest[consumed..];
            }
            c if c.is_whitespace() => {
                push_space(&mut out);
                rest = &rest[c.len_utf8()..];
            }
            c => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out.trim().to_string()
}

/// Whether the `<` at the start of `s` opens a tag, comment or declaration.
fn starts_markup(s: &str) -> bool {
    s[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Lowercased tag name, keeping a leading `/` for closing tags.
fn tag_name(tag: &str) -> String {
    let tag = tag.trim_start();
    let (slash, body) = tag
        .strip_prefix('/')
        .map_or(("", tag), |body| ("/", body.trim_start()));
    let name: String = body
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect();
    format!("{slash}{}", name.to_ascii_lowercase())
}

/// Skips past the closing tag of `name`, or to the end of input.
fn skip_element<'a>(rest: &'a str, name: &str) -> &'a str {
    let closing = format!("</{name}");
    // ASCII lowercasing keeps byte offsets intact
    let Some(start) = rest.to_ascii_lowercase().find(&closing) else {
        return "";
    };
    let after = &rest[start..];
    after.find('>').map_or("", |end| &after[end + 1..])
}

fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
        out.push(' ');
    }
}

fn push_break(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Decodes an entity at the start of `s` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed; unknown or
/// unterminated entities consume only the `&`.
fn decode_entity(s: &str) -> (Option<char>, usize) {
    let Some(end) = s[1..].find(';').filter(|&end| end > 0 && end <= 10) else {
        return (None, 1);
    };
    let entity = &s[1..=end];

    let decoded = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "hellip" => Some('\u{2026}'),
        "laquo" => Some('\u{00AB}'),
        "raquo" => Some('\u{00BB}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "copy" => Some('\u{00A9}'),
        "reg" => Some('\u{00AE}'),
        "trade" => Some('\u{2122}'),
        "euro" => Some('\u{20AC}'),
        _ => entity
            .strip_prefix("#x")
            .or_else(|| entity.strip_prefix("#X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| entity.strip_prefix('#')?.parse::<u32>().ok())
            .and_then(char::from_u32),
    };

    match decoded {
        Some(ch) => (Some(ch), end + 2),
        None => (None, 1),
    }
}
