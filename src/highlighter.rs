use fancy_regex::Regex;

use crate::dom::{Dom, NodeId};
use crate::selector::attr_eq_selector;
use crate::{Error, Result};

/// Role class carried by every structure container.
pub const STRUCT_ROLE_CLASS: &str = "hex-struct";
/// Role class carried by every field leaf.
pub const FIELD_ROLE_CLASS: &str = "hex-field";
/// Marker class applied to the currently highlighted field set.
pub const HIGHLIGHT_CLASS: &str = "hex-selected";

/// Named identity attributes. When present they take precedence over the
/// legacy positional class-token contract below.
pub const STRUCT_IDENT_ATTR: &str = "data-hex-struct";
pub const FIELD_IDENT_ATTR: &str = "data-hex-field";

/// Legacy positional contract, inherited from the generated markup: a
/// struct container's class list is `hex-struct <kind> <instance>` and a
/// field's is `hex-field <field>`. The instance and field tokens sit at
/// these fixed positions of the whitespace-split class list.
const STRUCT_IDENT_CLASS_POSITION: usize = 2;
const FIELD_IDENT_CLASS_POSITION: usize = 1;

/// The split pattern the legacy contract was written against.
const CLASS_SPLIT_PATTERN: &str = r"\s+";

const SNIPPET_MAX_LEN: usize = 160;

/// One identity token, either a scoping class or a named data attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityToken {
    Class(String),
    DataAttr { attr: String, value: String },
}

impl IdentityToken {
    fn selector_fragment(&self) -> String {
        match self {
            Self::Class(name) => format!(".{name}"),
            Self::DataAttr { attr, value } => attr_eq_selector(attr, value),
        }
    }
}

/// The (struct identity, field identity) pair a click resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentity {
    pub struct_token: IdentityToken,
    pub field_token: IdentityToken,
}

impl FieldIdentity {
    /// The compound selector meaning "every element carrying this field
    /// identity within this struct identity's subtree".
    pub fn selector(&self) -> String {
        format!(
            "{} {}",
            self.struct_token.selector_fragment(),
            self.field_token.selector_fragment()
        )
    }
}

/// Document-wide highlight state. Any valid click replaces the state
/// unconditionally; there is no toggle-off transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Idle,
    Highlighted(FieldIdentity),
}

#[derive(Debug, Clone)]
pub(crate) struct ClickOutcome {
    pub(crate) selector: String,
    pub(crate) matched: usize,
}

#[derive(Debug)]
pub(crate) struct FieldHighlighter {
    state: HighlightState,
    class_splitter: Regex,
}

impl FieldHighlighter {
    pub(crate) fn new() -> Result<Self> {
        let class_splitter = Regex::new(CLASS_SPLIT_PATTERN)
            .map_err(|err| Error::TokenPattern(err.to_string()))?;
        Ok(Self {
            state: HighlightState::Idle,
            class_splitter,
        })
    }

    pub(crate) fn state(&self) -> &HighlightState {
        &self.state
    }

    /// Handles a click that was delegated to `field`.
    ///
    /// Identity and the matched set are resolved before anything is
    /// mutated, so a fault leaves both the DOM and the highlight state
    /// exactly as they were. The clear step deliberately spans the whole
    /// document, not just the clicked struct: highlighting a field in one
    /// struct removes a highlight shown in another.
    pub(crate) fn handle_click(&mut self, dom: &mut Dom, field: NodeId) -> Result<ClickOutcome> {
        let identity = self.identity_of(dom, field)?;
        let selector = identity.selector();
        let matched = dom.query_selector_all(&selector)?;
        let all_fields = dom.query_selector_all(&format!(".{FIELD_ROLE_CLASS}"))?;

        for node in all_fields {
            dom.class_remove(node, HIGHLIGHT_CLASS);
        }
        for node in &matched {
            dom.class_add(*node, HIGHLIGHT_CLASS);
        }

        self.state = HighlightState::Highlighted(identity);
        Ok(ClickOutcome {
            selector,
            matched: matched.len(),
        })
    }

    fn identity_of(&self, dom: &Dom, field: NodeId) -> Result<FieldIdentity> {
        let struct_node = dom
            .closest(field, &format!(".{STRUCT_ROLE_CLASS}"))?
            .ok_or_else(|| Error::MissingStructAncestor {
                dom_snippet: snippet(dom, field),
            })?;

        let struct_token = self.identity_token(
            dom,
            struct_node,
            STRUCT_IDENT_ATTR,
            STRUCT_IDENT_CLASS_POSITION,
            STRUCT_ROLE_CLASS,
        )?;
        let field_token = self.identity_token(
            dom,
            field,
            FIELD_IDENT_ATTR,
            FIELD_IDENT_CLASS_POSITION,
            FIELD_ROLE_CLASS,
        )?;

        Ok(FieldIdentity {
            struct_token,
            field_token,
        })
    }

    fn identity_token(
        &self,
        dom: &Dom,
        node: NodeId,
        attr_name: &str,
        class_position: usize,
        role: &str,
    ) -> Result<IdentityToken> {
        if let Some(value) = dom.attr(node, attr_name) {
            return Ok(IdentityToken::DataAttr {
                attr: attr_name.to_string(),
                value: value.to_string(),
            });
        }

        let class_attr = dom.attr(node, "class").unwrap_or("");
        let tokens = self.split_class_tokens(class_attr)?;
        tokens
            .get(class_position)
            .cloned()
            .map(IdentityToken::Class)
            .ok_or_else(|| Error::MissingIdentityToken {
                role: role.to_string(),
                class_attr: class_attr.to_string(),
            })
    }

    fn split_class_tokens(&self, class_attr: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut last = 0usize;
        for found in self.class_splitter.find_iter(class_attr) {
            let found = found.map_err(|err| Error::TokenPattern(err.to_string()))?;
            if found.start() > last {
                out.push(class_attr[last..found.start()].to_string());
            }
            last = found.end();
        }
        if last < class_attr.len() {
            out.push(class_attr[last..].to_string());
        }
        Ok(out)
    }
}

fn snippet(dom: &Dom, node: NodeId) -> String {
    let dump = dom.dump_node(node);
    if dump.len() <= SNIPPET_MAX_LEN {
        return dump;
    }
    let mut cut = SNIPPET_MAX_LEN;
    while !dump.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &dump[..cut])
}
