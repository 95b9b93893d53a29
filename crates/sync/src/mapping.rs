//! Favorite → `Host` block mapping and the reverse display view.

use crate::favorite::Favorite;
use std::fmt;
use t2sc_sshconfig::{Comment, Directive, Entry};

/// Indentation of lines inside generated `Host` blocks.
pub const ENTRY_INDENT: &str = "  ";

/// Builds the `Host` block for one favorite:
///
/// ```text
/// Host <alias>
///   #<id>
///   HostName <address>
///   User <user>
///   Port <port>
/// ```
///
/// `Port` is left out when the favorite uses the default port.
pub fn favorite_to_entry(favorite: &Favorite) -> Entry {
    let mut host = Directive::new("Host", &favorite.host)
        .with_child(Comment::new(format!("#{}", favorite.id)).with_indent(ENTRY_INDENT))
        .with_child(Directive::new("HostName", &favorite.hostname).with_indent(ENTRY_INDENT))
        .with_child(Directive::new("User", &favorite.user).with_indent(ENTRY_INDENT));
    if let Some(port) = favorite.port {
        host = host.with_child(Directive::new("Port", port.to_string()).with_indent(ENTRY_INDENT));
    }
    host.into()
}

/// Connection summary of a `Host` block, for reports and listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDetails {
    pub alias: String,
    pub user: String,
    pub host: String,
    pub port: Option<String>,
}

impl HostDetails {
    /// Reads the summary from an entry; missing pieces become `"unknown"`.
    pub fn of(entry: &Entry) -> Self {
        let directive = entry.as_directive();
        let child = |name: &str| {
            directive
                .and_then(|d| d.child_value(name))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            alias: directive
                .map(|d| d.value.clone())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            user: child("User").unwrap_or_else(|| "unknown".to_string()),
            host: child("HostName").unwrap_or_else(|| "unknown".to_string()),
            port: child("Port"),
        }
    }
}

impl fmt::Display for HostDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}@{}", self.alias, self.user, self.host)?;
        if let Some(port) = &self.port {
            write!(f, ":{port}")?;
        }
        f.write_str(")")
    }
}
