//! Input and output surfaces the dispatcher reads from and renders into.

use std::sync::{Arc, Mutex, MutexGuard};

/// Where the outbound message comes from (a text field, a CLI argument, a stdin line).
pub trait MessageSource {
    /// Current contents, read once per dispatch. May be empty.
    fn current_text(&self) -> String;
}

/// Where the rendered reply goes. Takes `&self` so concurrent dispatches can share one view.
pub trait ResponseView: Send + Sync {
    fn render(&self, text: &str);
}

impl MessageSource for str {
    fn current_text(&self) -> String {
        self.to_string()
    }
}

impl MessageSource for String {
    fn current_text(&self) -> String {
        self.clone()
    }
}

/// Shared text cell; clones refer to the same contents.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    inner: Arc<Mutex<String>>,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(text.into())),
        }
    }

    pub fn text(&self) -> String {
        self.lock().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MessageSource for TextField {
    fn current_text(&self) -> String {
        self.text()
    }
}

impl ResponseView for TextField {
    fn render(&self, text: &str) {
        self.set_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let field = TextField::new("before");
        let other = field.clone();
        other.render("after");
        assert_eq!(field.text(), "after");
        assert_eq!(field.current_text(), "after");
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(TextField::default().current_text(), "");
    }
}
