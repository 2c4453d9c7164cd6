use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Applied when a toast is created without an explicit duration.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Severity of a toast. Only affects presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastId(String);

impl ToastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A clickable action attached to a toast. Invoking it also dismisses the toast.
#[derive(Clone)]
pub struct ToastAction {
    pub label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
        }
    }

    pub fn invoke(&self) {
        (self.callback)()
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction").field("label", &self.label).finish_non_exhaustive()
    }
}

/// A toast as held in the visible sequence. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    /// Zero means the toast stays until dismissed.
    pub duration: Duration,
    pub action: Option<ToastAction>,
}

/// Payload for creating a toast.
#[derive(Debug, Clone)]
pub struct NewToast {
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Option<Duration>,
    pub action: Option<ToastAction>,
}

impl NewToast {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            duration: None,
            action: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_action_debug_hides_callback() {
        let action = ToastAction::new("View Cart", || {});
        let rendered = format!("{:?}", action);
        assert!(rendered.contains("View Cart"));
        assert!(rendered.starts_with("ToastAction"));
    }

    #[test]
    fn test_cloned_action_shares_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let action = ToastAction::new("Undo", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        action.clone().invoke();
        action.invoke();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_builder_leaves_duration_unset() {
        let toast = NewToast::warning("Low stock").with_message("Only 2 left");
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.message.as_deref(), Some("Only 2 left"));
        assert_eq!(toast.duration, None);
        assert!(toast.action.is_none());
    }
}
