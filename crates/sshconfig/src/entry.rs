//! Line-level building blocks of an SSH client configuration.

use std::fmt;

/// Formatting that surrounds the meaningful part of a line.
///
/// Kept separately so the model can be rendered back byte-for-byte while
/// structural comparisons ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    /// Leading whitespace.
    pub indent: String,
    /// Whitespace between the content and the line ending.
    pub trailing: String,
    /// `"\n"`, `"\r\n"`, or empty for a final line without newline.
    pub eol: String,
}

impl Trivia {
    /// Trivia for a freshly built line: no indent, Unix newline.
    pub fn line() -> Self {
        Self {
            eol: "\n".to_string(),
            ..Default::default()
        }
    }
}

/// A keyword/argument line such as `HostName example.com`.
///
/// `Host` and `Match` directives own the lines of their block in `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: String,
    /// Text between keyword and value: `" "`, `"="`, `" = "`, ...
    pub separator: String,
    /// The value was written inside double quotes.
    pub quoted: bool,
    pub trivia: Trivia,
    pub children: Vec<Entry>,
}

impl Directive {
    /// Builds `name value` with a single space separator and a trailing newline.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            separator: " ".to_string(),
            quoted: false,
            trivia: Trivia::line(),
            children: Vec::new(),
        }
    }

    /// Replaces the leading whitespace.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.trivia.indent = indent.into();
        self
    }

    /// Appends a child line to this block.
    pub fn with_child(mut self, child: impl Into<Entry>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Case-insensitive keyword comparison, as `ssh_config(5)` does.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn is_host(&self) -> bool {
        self.is("Host")
    }

    /// Whether this keyword opens a block that owns the following lines.
    pub fn opens_section(&self) -> bool {
        self.is("Host") || self.is("Match")
    }

    /// Value of the first direct child directive called `name`.
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .filter_map(Entry::as_directive)
            .find(|d| d.is(name))
            .map(|d| d.value.as_str())
    }

    fn write_line(&self, out: &mut String) {
        out.push_str(&self.trivia.indent);
        out.push_str(&self.name);
        out.push_str(&self.separator);
        if self.quoted {
            out.push('"');
            out.push_str(&self.value);
            out.push('"');
        } else {
            out.push_str(&self.value);
        }
        out.push_str(&self.trivia.trailing);
        out.push_str(&self.trivia.eol);
    }
}

/// A `#` comment line. `text` includes the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub trivia: Trivia,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            trivia: Trivia::line(),
        }
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.trivia.indent = indent.into();
        self
    }

    /// Comment body with the leading `#` removed.
    pub fn body(&self) -> &str {
        self.text.strip_prefix('#').unwrap_or(&self.text)
    }
}

/// One line of an SSH configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directive(Directive),
    Comment(Comment),
    /// Whitespace-only line; the whitespace lives in `indent`.
    Blank(Trivia),
    /// A line that could not be understood, kept verbatim.
    Opaque { text: String, eol: String },
}

impl Entry {
    pub fn blank() -> Self {
        Entry::Blank(Trivia::line())
    }

    pub fn as_directive(&self) -> Option<&Directive> {
        match self {
            Entry::Directive(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_directive_mut(&mut self) -> Option<&mut Directive> {
        match self {
            Entry::Directive(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Entry::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Entry::Blank(_))
    }

    /// Whether the last rendered line of this entry (its own line, or its
    /// last child) is a blank line.
    pub fn ends_with_blank(&self) -> bool {
        match self {
            Entry::Directive(d) => match d.children.last() {
                Some(child) => child.ends_with_blank(),
                None => false,
            },
            Entry::Blank(_) => true,
            _ => false,
        }
    }

    /// Line ending of the last rendered line of this entry.
    pub(crate) fn last_eol_mut(&mut self) -> &mut String {
        match self {
            Entry::Directive(d) => {
                if d.children.is_empty() {
                    &mut d.trivia.eol
                } else {
                    let last = d.children.len() - 1;
                    d.children[last].last_eol_mut()
                }
            }
            Entry::Comment(c) => &mut c.trivia.eol,
            Entry::Blank(t) => &mut t.eol,
            Entry::Opaque { eol, .. } => eol,
        }
    }

    /// First non-empty line ending in rendering order.
    pub fn line_ending(&self) -> Option<&str> {
        let own = match self {
            Entry::Directive(d) => &d.trivia.eol,
            Entry::Comment(c) => &c.trivia.eol,
            Entry::Blank(t) => &t.eol,
            Entry::Opaque { eol, .. } => eol,
        };
        if !own.is_empty() {
            return Some(own);
        }
        match self {
            Entry::Directive(d) => d.children.iter().find_map(Entry::line_ending),
            _ => None,
        }
    }

    /// Rewrites every terminated line of this entry to end with `ending`.
    pub fn set_line_ending(&mut self, ending: &str) {
        let own = match self {
            Entry::Directive(d) => {
                for child in &mut d.children {
                    child.set_line_ending(ending);
                }
                &mut d.trivia.eol
            }
            Entry::Comment(c) => &mut c.trivia.eol,
            Entry::Blank(t) => &mut t.eol,
            Entry::Opaque { eol, .. } => eol,
        };
        if !own.is_empty() {
            *own = ending.to_string();
        }
    }

    /// Appends the rendered text of this entry (and its children) to `out`.
    pub fn write_to(&self, out: &mut String) {
        match self {
            Entry::Directive(d) => {
                d.write_line(out);
                for child in &d.children {
                    child.write_to(out);
                }
            }
            Entry::Comment(c) => {
                out.push_str(&c.trivia.indent);
                out.push_str(&c.text);
                out.push_str(&c.trivia.trailing);
                out.push_str(&c.trivia.eol);
            }
            Entry::Blank(t) => {
                out.push_str(&t.indent);
                out.push_str(&t.eol);
            }
            Entry::Opaque { text, eol } => {
                out.push_str(text);
                out.push_str(eol);
            }
        }
    }

    /// Formatting-free view used for structural equality.
    ///
    /// Blank lines carry no structure and yield `None`.
    pub fn normalized(&self) -> Option<NormalizedEntry> {
        match self {
            Entry::Directive(d) => Some(NormalizedEntry::Directive {
                name: d.name.clone(),
                value: d.value.clone(),
                children: d.children.iter().filter_map(Entry::normalized).collect(),
            }),
            Entry::Comment(c) => Some(NormalizedEntry::Comment(c.text.clone())),
            Entry::Blank(_) => None,
            Entry::Opaque { text, .. } => Some(NormalizedEntry::Opaque(text.clone())),
        }
    }

    /// Compares two entries ignoring whitespace, quoting and blank lines.
    pub fn same_structure(&self, other: &Entry) -> bool {
        self.normalized() == other.normalized()
    }
}

impl From<Directive> for Entry {
    fn from(d: Directive) -> Self {
        Entry::Directive(d)
    }
}

impl From<Comment> for Entry {
    fn from(c: Comment) -> Self {
        Entry::Comment(c)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

/// Structural content of an [`Entry`] without any formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedEntry {
    Directive {
        name: String,
        value: String,
        children: Vec<NormalizedEntry>,
    },
    Comment(String),
    Opaque(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_block() -> Entry {
        Directive::new("Host", "web")
            .with_child(Directive::new("HostName", "web.example.com").with_indent("  "))
            .with_child(Directive::new("User", "deploy").with_indent("  "))
            .into()
    }

    #[test]
    fn renders_block_with_children() {
        assert_eq!(
            host_block().to_string(),
            "Host web\n  HostName web.example.com\n  User deploy\n"
        );
    }

    #[test]
    fn quoted_value_renders_with_quotes() {
        let mut d = Directive::new("IdentityFile", "~/.ssh/my key");
        d.quoted = true;
        assert_eq!(Entry::from(d).to_string(), "IdentityFile \"~/.ssh/my key\"\n");
    }

    #[test]
    fn structure_ignores_indent_and_blank_lines() {
        let a = host_block();
        let b: Entry = Directive::new("Host", "web")
            .with_child(Directive::new("HostName", "web.example.com").with_indent("\t"))
            .with_child(Directive::new("User", "deploy").with_indent("\t"))
            .with_child(Entry::blank())
            .into();
        assert!(a.same_structure(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn structure_detects_value_change() {
        let b: Entry = Directive::new("Host", "web")
            .with_child(Directive::new("HostName", "other.example.com").with_indent("  "))
            .with_child(Directive::new("User", "deploy").with_indent("  "))
            .into();
        assert!(!host_block().same_structure(&b));
    }

    #[test]
    fn child_value_is_case_insensitive() {
        let Entry::Directive(d) = host_block() else {
            unreachable!()
        };
        assert_eq!(d.child_value("hostname"), Some("web.example.com"));
        assert_eq!(d.child_value("Port"), None);
    }

    #[test]
    fn set_line_ending_rewrites_children() {
        let mut block = host_block();
        assert_eq!(block.line_ending(), Some("\n"));
        block.set_line_ending("\r\n");
        assert_eq!(
            block.to_string(),
            "Host web\r\n  HostName web.example.com\r\n  User deploy\r\n"
        );
    }

    #[test]
    fn comment_body_strips_marker() {
        assert_eq!(Comment::new("#abc").body(), "abc");
        assert_eq!(Comment::new("abc").body(), "abc");
    }

    #[test]
    fn ends_with_blank_follows_last_child() {
        assert!(!host_block().ends_with_blank());
        let Entry::Directive(mut d) = host_block() else {
            unreachable!()
        };
        d.children.push(Entry::blank());
        assert!(Entry::Directive(d).ends_with_blank());
    }
}
