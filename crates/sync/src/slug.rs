//! SSH-alias-safe slugs derived from favorite display names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Letters that do not decompose into an ASCII base plus marks.
fn transliterate(c: char) -> Option<&'static str> {
    Some(match c {
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ø' | 'Ø' => "o",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'ł' | 'Ł' => "l",
        'þ' | 'Þ' => "th",
        'ı' => "i",
        _ => return None,
    })
}

/// Inserts a space at lower→upper and `ABc` boundaries so camelCase words
/// end up as separate slug parts.
fn decamelize(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

/// Turns one name segment into lowercase ASCII words joined by `-`.
///
/// ```
/// use t2sc_sync::slugify;
///
/// assert_eq!(slugify("Déjà Vu & Co"), "deja-vu-and-co");
/// assert_eq!(slugify("myWebServer"), "my-web-server");
/// ```
pub fn slugify(input: &str) -> String {
    let spaced = decamelize(&input.replace('&', " and "));
    let mut ascii = String::with_capacity(spaced.len());
    for c in spaced.chars() {
        match transliterate(c) {
            Some(s) => ascii.push_str(s),
            None => ascii.extend(c.nfkd().filter(|d| !is_combining_mark(*d))),
        }
    }

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Host alias for a favorite: `folder/name` with each segment slugified.
///
/// Segments that slugify to nothing are dropped; the result is empty when
/// nothing usable remains.
pub fn host_alias(name: &str, folder: Option<&str>) -> String {
    folder
        .into_iter()
        .chain(std::iter::once(name))
        .flat_map(|part| part.split('/'))
        .map(slugify)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
