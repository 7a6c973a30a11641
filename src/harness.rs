use crate::dom::{Dom, NodeId, class_tokens};
use crate::events::{ListenerAction, ListenerStore, resolve_delegated};
use crate::highlighter::{FIELD_ROLE_CLASS, FieldHighlighter, HIGHLIGHT_CLASS, HighlightState};
use crate::html::parse_html;
use crate::{Error, Result};

/// Deterministic driver for the field highlighter: parses a document,
/// wires the delegated click listener, and exposes user actions plus
/// assertions for tests.
#[derive(Debug)]
pub struct Harness {
    dom: Dom,
    listeners: ListenerStore,
    highlighter: FieldHighlighter,
    trace: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl Harness {
    /// Parses `html` and performs the document-ready wiring: a single
    /// delegated click listener at the document root covering every
    /// current and future `hex-field` element.
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        let mut listeners = ListenerStore::default();
        listeners.add_delegated(
            "click",
            &format!(".{FIELD_ROLE_CLASS}"),
            ListenerAction::HighlightField,
        );
        Ok(Self {
            dom,
            listeners,
            highlighter: FieldHighlighter::new()?,
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: true,
        })
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Harness(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    /// Clicks the first element matching `selector`. Clicks inside a field
    /// (its label, size, or contents span) activate that field; clicks
    /// outside any field are no-ops.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "click")
    }

    /// Dispatches an arbitrary event. Only delegated `click` listeners are
    /// registered, so everything else is a traced no-op.
    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event)
    }

    fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<()> {
        let fired = resolve_delegated(&self.dom, &self.listeners, event_type, target)?;
        if fired.is_empty() {
            let label = self.node_label(target);
            self.trace_line(format!(
                "[event] {event_type} target={label} no delegate matched"
            ));
            return Ok(());
        }

        for (action, delegate_target) in fired {
            match action {
                ListenerAction::HighlightField => {
                    let outcome = self.highlighter.handle_click(&mut self.dom, delegate_target)?;
                    let label = self.node_label(delegate_target);
                    self.trace_line(format!(
                        "[highlight] {} matched={} target={label}",
                        outcome.selector, outcome.matched
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parses `html` as a fragment and appends it to the element matching
    /// `selector`. Fields added this way are live immediately, with no
    /// re-binding step.
    pub fn append_html(&mut self, selector: &str, html: &str) -> Result<()> {
        let parent = self.select_one(selector)?;
        let fragment = parse_html(html)?;
        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            let _ = self.dom.clone_subtree_from_dom(&fragment, child, Some(parent))?;
        }
        self.dom.rebuild_id_index();
        Ok(())
    }

    pub fn highlight_state(&self) -> &HighlightState {
        self.highlighter.state()
    }

    /// Number of elements currently carrying the highlight marker.
    pub fn highlighted_count(&self) -> usize {
        self.dom
            .all_element_nodes()
            .into_iter()
            .filter(|node| self.dom.class_contains(*node, HIGHLIGHT_CLASS))
            .count()
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        let actual = self.dom.text_content(node);
        if actual.trim() != expected.trim() {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.dump_node(node),
            });
        }
        Ok(())
    }

    /// Asserts that every element matching `selector` carries the
    /// highlight marker. Fails with `SelectorNotFound` when nothing
    /// matches, so a typo cannot pass vacuously.
    pub fn assert_highlighted(&self, selector: &str) -> Result<()> {
        self.assert_marker(selector, true)
    }

    pub fn assert_not_highlighted(&self, selector: &str) -> Result<()> {
        self.assert_marker(selector, false)
    }

    fn assert_marker(&self, selector: &str, expected: bool) -> Result<()> {
        let nodes = self.dom.query_selector_all(selector)?;
        if nodes.is_empty() {
            return Err(Error::SelectorNotFound(selector.to_string()));
        }
        for node in nodes {
            let actual = self.dom.class_contains(node, HIGHLIGHT_CLASS);
            if actual != expected {
                return Err(Error::AssertionFailed {
                    selector: selector.to_string(),
                    expected: format!("highlighted={expected}"),
                    actual: format!("highlighted={actual}"),
                    dom_snippet: self.dom.dump_node(node),
                });
            }
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let node = self.select_one(selector)?;
        Ok(self.dom.dump_node(node))
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_label(&self, node: NodeId) -> String {
        let Some(tag) = self.dom.tag_name(node) else {
            return "#document".to_string();
        };
        let mut label = tag.to_string();
        if let Some(id) = self.dom.attr(node, "id") {
            label.push('#');
            label.push_str(id);
        }
        for class in class_tokens(self.dom.attr(node, "class")) {
            label.push('.');
            label.push_str(&class);
        }
        label
    }

    fn trace_line(&mut self, line: String) {
        if self.trace {
            if self.trace_to_stderr {
                eprintln!("{line}");
            }
            if self.trace_logs.len() >= self.trace_log_limit {
                self.trace_logs.remove(0);
            }
            self.trace_logs.push(line);
        }
    }
}
