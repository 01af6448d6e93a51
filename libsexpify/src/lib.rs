//! Convert YAML and JSON documents into S-expressions.
//!
//! # Pipeline
//!
//! 1. **Loader**: reads the source, optionally substitutes `${VAR}` tokens,
//!    and parses every document into a [`Value`] tree. Bare ISO dates become
//!    [`Value::Date`].
//!
//! 2. **Encoder**: renders the tree as `(prefix:key value)` forms, using the
//!    scalar classifier to choose between dates, symbols and strings.
//!
//! 3. **Pretty printer** (optional): re-indents the text by parenthesis
//!    depth.
//!
//! # Example
//!
//! ```
//! use libsexpify::{encode_documents, parse_documents};
//!
//! let value = parse_documents("name: A4786\nactive: true\n").unwrap();
//! assert_eq!(
//!     encode_documents(&value, "yaml"),
//!     "((yaml:name 'A4786)\n(yaml:active #t))"
//! );
//! ```

pub mod classify;
mod encode;
mod error;
mod load;
mod pretty;
mod value;

pub use encode::{encode, encode_documents, Encoder, DEFAULT_PREFIX};
pub use error::{Error, Result};
pub use load::{
    load_file, load_file_with, parse_documents, process_env, substitute_env, InputFormat,
    LoadOptions,
};
pub use pretty::{pretty, DEFAULT_INDENT};
pub use value::Value;

/// Convert loaded data to its final text: wrapped, and pretty-printed when
/// `indent` is given.
pub fn to_sexpr(value: &Value, prefix: &str, indent: Option<usize>) -> String {
    let flat = encode_documents(value, prefix);
    match indent {
        Some(width) => pretty(&flat, width),
        None => flat,
    }
}
