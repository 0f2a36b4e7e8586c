//! Directive types parsed from request text.


/// Per-request settings embedded in a request's text.
///
/// Boolean-ish settings are kept as the raw text; they are resolved together
/// with the action inputs by [`crate::config::select_bool`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Names from every `notify:` line, in order of appearance.
    pub notify: Vec<String>,

    /// The value of the first `delete-on-cancel:` line.
    pub delete_on_cancel: Option<String>,

    /// The value of the first `auto-notify:` line.
    pub auto_notify: Option<String>,
}

impl Directives {
    pub fn is_empty(&self) -> bool {
        self.notify.is_empty() && self.delete_on_cancel.is_none() && self.auto_notify.is_none()
    }
}
