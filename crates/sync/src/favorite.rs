//! Favorite records: raw shape from the source and the validated form.

use crate::slug::host_alias;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Remote path sentinel used by AppleScript for "no value".
pub const MISSING_VALUE: &str = "missing value";

/// Stable identifier of a favorite: hyphenated UUID text, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FavoriteId(String);

impl FavoriteId {
    /// Accepts only the 36-character hyphenated UUID form.
    pub fn parse(text: &str) -> Option<Self> {
        if text.len() != 36 || Uuid::try_parse(text).is_err() {
            return None;
        }
        Some(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record as delivered by a favorites source:
/// `[name, address, user, port, protocol, remote path, id]`.
///
/// Fields stay untyped until [`Favorite::from_raw`] checks them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFavorite {
    pub name: Value,
    pub address: Value,
    pub user: Value,
    pub port: Value,
    pub protocol: Value,
    pub remote_path: Value,
    pub id: Value,
}

impl RawFavorite {
    /// Display name for messages, whatever its JSON type.
    pub fn label(&self) -> String {
        match &self.name {
            Value::String(s) => s.clone(),
            Value::Null => "<unnamed>".to_string(),
            other => other.to_string(),
        }
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_str()
    }
}

/// A favorites folder and the display names it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub favorites: Vec<String>,
}

/// Everything a source returns in one fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedFavorites {
    /// Raw records, validated one by one later.
    pub records: Vec<Value>,
    /// Folder grouping; `None` when unavailable.
    #[serde(default)]
    pub folders: Option<Vec<Folder>>,
}

impl FetchedFavorites {
    /// First folder listing `name`.
    pub fn folder_of(&self, name: &str) -> Option<&str> {
        self.folders
            .as_deref()?
            .iter()
            .find(|folder| folder.favorites.iter().any(|f| f == name))
            .map(|folder| folder.name.as_str())
    }
}

/// A validated favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub id: FavoriteId,
    /// Slug alias used as the `Host` value.
    pub host: String,
    /// Display name as shown in Transmit.
    pub name: String,
    pub hostname: String,
    pub user: String,
    pub port: Option<u16>,
    pub protocol: String,
    pub remote_path: Option<String>,
}

fn required_text<'a>(value: &'a Value, field: &str) -> Result<&'a str, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("{field} must be a string"))?;
    if text.is_empty() {
        return Err(format!("{field} is empty"));
    }
    if text.chars().any(char::is_whitespace) {
        return Err(format!("{field} contains whitespace"));
    }
    Ok(text)
}

fn port_of(value: &Value) -> Result<Option<u16>, String> {
    let port = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_u64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| format!("port {value} is not a number"))?;
    match port {
        0 => Ok(None),
        p => u16::try_from(p)
            .map(Some)
            .map_err(|_| format!("port {p} is out of range")),
    }
}

impl Favorite {
    /// Validates a raw record. `folder` is the containing folder's name, if any.
    ///
    /// The error string explains the first problem found.
    pub fn from_raw(raw: &RawFavorite, folder: Option<&str>) -> Result<Self, String> {
        let name = raw
            .name
            .as_str()
            .ok_or_else(|| "name must be a string".to_string())?;
        let id = raw
            .id
            .as_str()
            .and_then(FavoriteId::parse)
            .ok_or_else(|| format!("id {} is not a UUID", raw.id))?;
        let hostname = required_text(&raw.address, "address")?;
        let user = required_text(&raw.user, "user")?;
        let port = port_of(&raw.port)?;
        let protocol = raw
            .protocol
            .as_str()
            .ok_or_else(|| "protocol must be a string".to_string())?;
        let remote_path = match &raw.remote_path {
            Value::String(p) if p != MISSING_VALUE && !p.is_empty() => Some(p.clone()),
            _ => None,
        };

        let host = host_alias(name, folder);
        if host.is_empty() {
            return Err(format!("name '{name}' has no usable characters for an alias"));
        }

        Ok(Self {
            id,
            host,
            name: name.to_string(),
            hostname: hostname.to_string(),
            user: user.to_string(),
            port,
            protocol: protocol.to_string(),
            remote_path,
        })
    }
}
