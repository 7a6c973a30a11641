//! Deterministic DOM harness for hex-view field highlighting.
//!
//! vbincarver renders carved binaries as HTML: each decoded structure is a
//! `div.hex-struct` container and each named field inside it is a
//! `span.hex-field` leaf. Clicking a field highlights every occurrence of
//! that field within the enclosing structure instance and clears any
//! previous highlight anywhere in the document.
//!
//! This crate implements that behavior natively against a small arena DOM,
//! so the highlighter can be driven and asserted on from ordinary Rust
//! tests:
//!
//! ```
//! use hex_highlighter::Harness;
//!
//! # fn main() -> hex_highlighter::Result<()> {
//! let html = r#"
//! <div class="hex-struct hex-struct-header hex-struct-header-0">
//!   <span class="hex-field hex-field-magic">4d 5a</span>
//!   <span class="hex-field hex-field-magic">50 45</span>
//!   <span class="hex-field hex-field-size">00 40</span>
//! </div>
//! "#;
//! let mut h = Harness::from_html(html)?;
//! h.click(".hex-field-magic")?;
//! assert_eq!(h.highlighted_count(), 2);
//! # Ok(())
//! # }
//! ```

use std::error::Error as StdError;
use std::fmt;

mod dom;
mod events;
mod harness;
mod highlighter;
mod html;
mod selector;


pub use harness::Harness;
pub use highlighter::{
    FIELD_IDENT_ATTR, FIELD_ROLE_CLASS, FieldIdentity, HIGHLIGHT_CLASS, HighlightState,
    IdentityToken, STRUCT_IDENT_ATTR, STRUCT_ROLE_CLASS,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    TokenPattern(String),
    Harness(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    MissingStructAncestor {
        dom_snippet: String,
    },
    MissingIdentityToken {
        role: String,
        class_attr: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::TokenPattern(msg) => write!(f, "token pattern error: {msg}"),
            Self::Harness(msg) => write!(f, "harness error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::MissingStructAncestor { dom_snippet } => write!(
                f,
                "clicked field has no enclosing hex-struct: {dom_snippet}"
            ),
            Self::MissingIdentityToken { role, class_attr } => write!(
                f,
                "missing identity token in {role} class list: {class_attr:?}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}
