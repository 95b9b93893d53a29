//! Text → [`Entry`] parsing.
//!
//! Parsing never fails: anything that does not look like a keyword/argument
//! pair, a comment or a blank line is kept as [`Entry::Opaque`]. Every byte of
//! the input ends up in exactly one piece of the model, so rendering the result
//! reproduces the input.

use crate::entry::{Comment, Directive, Entry, Trivia};

/// Parses configuration text into top-level entries.
///
/// Lines following a `Host` or `Match` directive become its children until the
/// next such directive.
pub fn parse_entries(text: &str) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut section: Option<Directive> = None;

    for raw in text.split_inclusive('\n') {
        let entry = parse_line(raw);

        if let Entry::Directive(d) = &entry {
            if d.opens_section() {
                if let Some(open) = section.take() {
                    entries.push(Entry::Directive(open));
                }
                if let Entry::Directive(d) = entry {
                    section = Some(d);
                }
                continue;
            }
        }

        match section.as_mut() {
            Some(open) => open.children.push(entry),
            None => entries.push(entry),
        }
    }

    if let Some(open) = section {
        entries.push(Entry::Directive(open));
    }
    entries
}

/// Parses a single line, including its line ending if present.
pub fn parse_line(raw: &str) -> Entry {
    let (body, eol) = split_eol(raw);

    let content = body.trim_start_matches([' ', '\t']);
    let indent = &body[..body.len() - content.len()];

    if content.trim().is_empty() {
        // Leading and trailing whitespace are indistinguishable on a blank line.
        return Entry::Blank(Trivia {
            indent: body.to_string(),
            trailing: String::new(),
            eol: eol.to_string(),
        });
    }

    let core = content.trim_end_matches([' ', '\t']);
    let trailing = &content[core.len()..];
    let trivia = Trivia {
        indent: indent.to_string(),
        trailing: trailing.to_string(),
        eol: eol.to_string(),
    };

    if core.starts_with('#') {
        return Entry::Comment(Comment {
            text: core.to_string(),
            trivia,
        });
    }

    match split_directive(core) {
        Some((name, separator, value, quoted)) => Entry::Directive(Directive {
            name: name.to_string(),
            value: value.to_string(),
            separator: separator.to_string(),
            quoted,
            trivia,
            children: Vec::new(),
        }),
        None => {
            tracing::debug!(line = %body, "keeping unrecognised ssh config line verbatim");
            Entry::Opaque {
                text: body.to_string(),
                eol: eol.to_string(),
            }
        }
    }
}

fn split_eol(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, &raw[body.len()..])
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, &raw[body.len()..])
    } else {
        (raw, "")
    }
}

/// Splits `Keyword<sep>value` where `<sep>` is whitespace and at most one `=`.
///
/// Returns `None` when the keyword is not alphanumeric or is glued to the
/// value, or when a quoted value is left unterminated.
fn split_directive(core: &str) -> Option<(&str, &str, &str, bool)> {
    if !core.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_end = core
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(core.len());
    let (name, rest) = core.split_at(name_end);

    let sep_len = separator_len(rest);
    if sep_len == 0 && !rest.is_empty() {
        return None;
    }
    let (separator, raw_value) = rest.split_at(sep_len);

    if let Some(inner) = raw_value.strip_prefix('"') {
        return match inner.strip_suffix('"') {
            Some(value) if !value.contains('"') => Some((name, separator, value, true)),
            // Several quoted tokens, e.g. `Host "a b" "c d"`: keep as written.
            Some(_) => Some((name, separator, raw_value, false)),
            None => None,
        };
    }
    Some((name, separator, raw_value, false))
}

fn separator_len(rest: &str) -> usize {
    let mut seen_eq = false;
    for (i, c) in rest.char_indices() {
        match c {
            ' ' | '\t' => {}
            '=' if !seen_eq => seen_eq = true,
            _ => return i,
        }
    }
    rest.len()
}
