//! Lossless model of OpenSSH client configuration files.
//!
//! The model keeps every line of the input, including comments, blank lines
//! and lines it does not understand, so a file can be read, edited and written
//! back without disturbing anything the caller did not touch.
//!
//! # Example
//!
//! ```
//! use t2sc_sshconfig::{ConfigModel, Directive};
//!
//! let text = "# mine\nHost web\n  HostName web.example.com\n";
//! let mut model = ConfigModel::parse(text);
//! assert_eq!(model.serialize(), text);
//!
//! model.append_block(
//!     Directive::new("Host", "db").with_child(Directive::new("User", "admin").with_indent("  ")),
//! );
//! assert!(model.serialize().ends_with("\n\nHost db\n  User admin\n"));
//! ```

#![deny(unsafe_code)]

pub mod entry;
pub mod model;
pub mod parser;

pub use entry::{Comment, Directive, Entry, NormalizedEntry, Trivia};
pub use model::ConfigModel;
pub use parser::{parse_entries, parse_line};
