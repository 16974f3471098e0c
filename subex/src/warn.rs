/// A sink for compile and runtime diagnostics.
///
/// A warning never aborts anything; the operation that produced it just
/// returns an absent or empty result.
///
/// Any `Fn(&str) + Send + Sync` closure is a sink:
/// ```
/// use std::sync::{Arc, Mutex};
/// use subex::{CompileFlags, PatternCache};
///
/// let warnings = Arc::new(Mutex::new(Vec::new()));
/// let cache = PatternCache::builder()
///     .warn(Arc::new({
///         let warnings = warnings.clone();
///         move |message: &str| warnings.lock().unwrap().push(message.to_owned())
///     }))
///     .build();
/// assert!(!cache.pattern("(unclosed", CompileFlags::default()).is_compiled());
/// assert_eq!(warnings.lock().unwrap().len(), 1);
/// ```
pub trait Warn: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards to [`log::warn!`]. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWarn;

impl Warn for LogWarn {
    fn warn(&self, message: &str) {
        log::warn!(target: "subex", "{message}");
    }
}

impl<F> Warn for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}
