//! HTML to plain text extraction

/// Elements dropped together with their content
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "nav", "footer", "header",
];

/// Check if content is HTML based on content type and body
pub fn is_html(content_type: Option<&str>, body: &str) -> bool {
    if let Some(ct) = content_type {
        let ct_lower = ct.to_lowercase();
        if ct_lower.contains("text/html") || ct_lower.contains("application/xhtml") {
            return true;
        }
    }

    let head: String = body.trim_start().chars().take(16).collect();
    let head = head.to_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Elements whose content is raw text and may contain a bare `<`
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Extract the visible text of an HTML document.
///
/// Navigation, header, footer, script and style blocks are removed, tags are
/// dropped, entities decoded and every whitespace run collapsed to one space.
pub fn html_to_text(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lower = html.to_ascii_lowercase();
    let mut output = String::new();
    let mut skip_elements: Vec<String> = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        let Some(lt) = rest.find('<') else {
            if skip_elements.is_empty() {
                push_text(&mut output, rest);
            }
            break;
        };
        if skip_elements.is_empty() {
            push_text(&mut output, &rest[..lt]);
        }

        let markup = pos + lt + 1;
        let after = &html[markup..];
        if !starts_markup(after) {
            // A literal '<' in text
            if skip_elements.is_empty() {
                output.push('<');
            }
            pos = markup;
            continue;
        }

        if after.starts_with("!--") {
            pos = match after[3..].find("-->") {
                Some(end) => markup + 3 + end + 3,
                None => html.len(),
            };
            continue;
        }

        // Unterminated tag at the end of the document
        let Some(gt) = after.find('>') else {
            break;
        };
        let tag = &lower[markup..markup + gt];
        pos = markup + gt + 1;

        // Doctype and processing instructions
        if tag.starts_with('!') || tag.starts_with('?') {
            continue;
        }

        let is_closing = tag.starts_with('/');
        let tag_name = tag
            .trim_start_matches('/')
            .split(|ch: char| ch.is_whitespace() || ch == '/')
            .next()
            .unwrap_or("");

        if SKIP_TAGS.contains(&tag_name) {
            if is_closing {
                if let Some(idx) = skip_elements.iter().rposition(|t| t == tag_name) {
                    skip_elements.truncate(idx);
                }
            } else if !tag.ends_with('/') {
                if RAW_TEXT_TAGS.contains(&tag_name) {
                    pos = skip_raw_text(&lower, pos, tag_name);
                } else {
                    skip_elements.push(tag_name.to_string());
                }
            }
            continue;
        }

        // Tags separate words
        if skip_elements.is_empty() {
            output.push(' ');
        }
    }

    collapse_whitespace(&output)
}

/// Whether the text after a `<` opens a tag, comment or declaration
fn starts_markup(after: &str) -> bool {
    after
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Offset just past the `</name ...>` that closes a raw text element
/// starting at `from`, or the end of the document when it is never closed
fn skip_raw_text(lower: &str, from: usize, name: &str) -> usize {
    let closing = format!("</{name}");
    let Some(start) = lower[from..].find(&closing) else {
        return lower.len();
    };
    let tag_start = from + start + closing.len();
    match lower[tag_start..].find('>') {
        Some(gt) => tag_start + gt + 1,
        None => lower.len(),
    }
}

/// Append a run of text, decoding entities
fn push_text(output: &mut String, text: &str) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        output.push(decode_entity(c, &mut chars));
    }
}

/// Collapse every whitespace run to a single space and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode HTML entity starting from ampersand
fn decode_entity(c: char, chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    if c != '&' {
        return c;
    }

    // Look ahead without consuming so a bare '&' leaves the text intact
    let lookahead: String = chars.clone().take(12).collect();
    let Some(end) = lookahead.find(';') else {
        return '&';
    };
    let entity = &lookahead[..end];
    if entity.is_empty() || entity.chars().any(char::is_whitespace) {
        return '&';
    }

    let decoded = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "hellip" => Some('…'),
        "laquo" => Some('«'),
        "raquo" => Some('»'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        _ => entity.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };

    match decoded {
        Some(ch) => {
            // Consume the entity body and the ';'
            for _ in 0..=entity.chars().count() {
                chars.next();
            }
            ch
        }
        None => '&',
    }
}
