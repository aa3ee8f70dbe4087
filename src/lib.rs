//! # Item Key Parser
//!
//! Validation and decomposition of monitoring item keys.
//!
//! ## Overview
//!
//! An item key names a single data-collection check. It is a key-id,
//! optionally followed by a bracketed list of parameters:
//!
//! ```text
//! agent.ping
//! net.if.in[eth0,bytes]
//! vfs.fs.size["/var/lib", pfree]
//! custom.check[[a, b], "quoted, with comma"]
//! ```
//!
//! The parser splits a key into its key-id and its top-level parameters in a
//! single forward pass. Nested lists are kept verbatim inside the parameter
//! that contains them.
//!
//! ## Key Features
//!
//! - **Total**: parsing never panics; rejected keys come back with a
//!   human-readable message, an [`ErrorKind`] and the offending byte offset
//! - **Injectable key-id alphabet**: the characters allowed before `[` are
//!   supplied through [`KeyIdClassifier`]
//! - **Legacy bracket chaining**: `key[a][b]` is read as `key[a,b]`, and can
//!   be switched off through [`ParserConfig`]
//! - **Serde integration**: [`ParseResult`], [`ItemKey`] and [`ParserConfig`]
//!   serialize for transport to a UI or loading from a config file
//!
//! ## Basic Usage
//!
//! ```rust
//! use item_key::parse_key;
//!
//! let result = parse_key("test.key[a, b, c]");
//! assert!(result.valid);
//! assert_eq!(result.key_id, "test.key");
//! assert_eq!(result.parameters.as_slice(), ["a", "b", "c"]);
//!
//! let result = parse_key("test.key[a]x");
//! assert!(!result.valid);
//! println!("{}", result.error);
//! ```
//!
//! ## Custom Key-Id Characters
//!
//! ```rust
//! use item_key::{KeyCharTable, KeyParser};
//!
//! // Also allow '/' in key-ids
//! let parser = KeyParser::with_classifier(KeyCharTable::new().with_extra(b"/"));
//! let key = parser.try_parse("jmx/heap[used]")?;
//! assert_eq!(key.key_id, "jmx/heap");
//! # Ok::<(), item_key::KeyError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use item_key::{parse_key, ErrorKind};
//!
//! let result = parse_key("key[[a]x]");
//! assert_eq!(result.error_kind, Some(ErrorKind::UnexpectedCharacter));
//! assert_eq!(result.error_position, Some(7));
//! ```
//!
//! ## Building Keys
//!
//! ```rust
//! use item_key::ItemKey;
//!
//! let key = ItemKey::new("log", ["/var/log/app.log".to_string(), "error, fatal".to_string()]);
//! assert_eq!(key.to_key_string()?, r#"log[/var/log/app.log,"error, fatal"]"#);
//! # Ok::<(), item_key::KeyError>(())
//! ```

pub mod classifier;
pub mod error;
pub mod key;
pub mod param;
pub mod parser;


// Re-export main types and functions
pub use classifier::{DefaultKeyIdChars, KeyCharTable, KeyIdClassifier};
pub use error::{ErrorKind, INVALID_FORMAT_MESSAGE, KeyError};
pub use key::{ItemKey, Parameters, ParseResult};
pub use param::{needs_quoting, quote_param, same_key_id, unquote_param};
pub use parser::{KeyParser, ParserConfig, ZAPCAT_SEPARATOR, parse_key};
