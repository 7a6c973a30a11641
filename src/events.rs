use crate::Result;
use crate::dom::{Dom, NodeId};

/// Actions a delegated listener can run. The crate registers exactly one
/// listener today (the field highlighter), but dispatch stays data-driven
/// so the registration story matches how the page wired itself up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerAction {
    HighlightField,
}

#[derive(Debug, Clone)]
pub(crate) struct DelegatedListener {
    pub(crate) event_type: String,
    pub(crate) delegate_selector: String,
    pub(crate) action: ListenerAction,
}

/// Listeners registered at the document root. Delegation replaces
/// per-element binding: elements added after load are covered without any
/// re-binding step.
#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    root: Vec<DelegatedListener>,
}

impl ListenerStore {
    pub(crate) fn add_delegated(
        &mut self,
        event_type: &str,
        delegate_selector: &str,
        action: ListenerAction,
    ) {
        self.root.push(DelegatedListener {
            event_type: event_type.to_string(),
            delegate_selector: delegate_selector.to_string(),
            action,
        });
    }
}

/// Resolves which delegated listeners fire for an event on `target`.
///
/// Every listener lives at the document root, so the bubble walk from the
/// target collapses into a `closest` lookup per listener: the delegate
/// target is the nearest ancestor-or-self of the event target matching the
/// delegate selector. A click on a field's inner label span therefore
/// activates the field itself. Events with no resolvable delegate target
/// fire nothing.
pub(crate) fn resolve_delegated(
    dom: &Dom,
    listeners: &ListenerStore,
    event_type: &str,
    target: NodeId,
) -> Result<Vec<(ListenerAction, NodeId)>> {
    let mut fired = Vec::new();
    for listener in &listeners.root {
        if listener.event_type != event_type {
            continue;
        }
        if let Some(delegate_target) = dom.closest(target, &listener.delegate_selector)? {
            fired.push((listener.action, delegate_target));
        }
    }
    Ok(fired)
}
