/*!
Compiled pattern cache.

A [`PatternCache`] maps `(flags, pattern text)` to a compiled [`Program`] and
compiles each distinct key at most once for its lifetime. There is no eviction:
programs live as long as the cache, trading memory for a guaranteed one-time
compilation cost. [`PatternCache::global()`] lives for the whole process and is
used by [`Pattern::new`] and [`Replace::new`](crate::Replace::new).

```
use subex::{CompileFlags, PatternCache};

let cache = PatternCache::default();
let a = cache.pattern(r"(\w+)=(\d+)", CompileFlags::default());
let b = cache.pattern(r"(\w+)=(\d+)", CompileFlags::default());
assert_eq!(cache.len(), 1);
assert_eq!(a.parse_all(b"x=1 y=2"), b.parse_all(b"x=1 y=2"));
```
*/
use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, OnceLock, PoisonError, RwLock},
};

use bon::bon;

use crate::{
    engine::{Backtrack, Engine, Program},
    syntax::{group, shorthand},
    CompileError, CompileFlags, LogWarn, Pattern, Warn,
};

/// A compiled pattern, shared by every [`Pattern`] that resolves the same key.
pub struct Compiled {
    program: Arc<dyn Program>,
    /// Computed once at compile time rather than on every `match_outer()`.
    outer_groups: Box<[usize]>,
    /// The pattern text after shorthand rewriting.
    rewritten: Box<str>,
    warn: Arc<dyn Warn>,
}

impl Compiled {
    pub fn program(&self) -> &dyn Program {
        self.program.as_ref()
    }

    /// Top-level capture group indices, left to right.
    pub fn outer_groups(&self) -> &[usize] {
        &self.outer_groups
    }

    pub fn rewritten(&self) -> &str {
        &self.rewritten
    }

    pub(crate) fn warn(&self, message: &str) {
        self.warn.warn(message)
    }
}

impl fmt::Debug for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
            .field("rewritten", &self.rewritten)
            .field("group_len", &self.program.group_len())
            .field("outer_groups", &self.outer_groups)
            .finish_non_exhaustive()
    }
}

pub type CompileResult = Result<Arc<Compiled>, Arc<CompileError>>;

/// Initialized exactly once, by whoever gets to it first. Concurrent lookups of
/// the same key block on it instead of compiling again.
type Slot = Arc<OnceLock<CompileResult>>;

static GLOBAL: LazyLock<PatternCache> = LazyLock::new(PatternCache::default);

fn default_engine() -> Arc<dyn Engine> {
    Arc::new(Backtrack::default())
}

fn default_warn() -> Arc<dyn Warn> {
    Arc::new(LogWarn)
}

pub struct PatternCache {
    engine: Arc<dyn Engine>,
    warn: Arc<dyn Warn>,
    capacity: Option<usize>,
    cache_failures: bool,
    slots: RwLock<HashMap<CompileFlags, HashMap<Box<str>, Slot>>>,
}

#[bon]
impl PatternCache {
    #[builder]
    pub fn new(
        /// The engine to compile patterns with. Defaults to [`Backtrack`].
        #[builder(default = default_engine())]
        engine: Arc<dyn Engine>,
        /// Where compile and runtime errors are reported. Defaults to [`LogWarn`].
        #[builder(default = default_warn())]
        warn: Arc<dyn Warn>,
        /// Maximum number of stored keys.
        ///
        /// Nothing is ever evicted: once full, new keys are still compiled and
        /// returned, but not stored.
        capacity: Option<usize>,
        /// Also remember compile failures, so that a broken pattern is only
        /// compiled (and reported) once. Use [`PatternCache::invalidate`] to
        /// retry one.
        ///
        /// Disabled by default: a failing pattern is recompiled on every lookup.
        #[builder(default)]
        cache_failures: bool,
    ) -> Self {
        Self {
            engine,
            warn,
            capacity,
            cache_failures,
            slots: Default::default(),
        }
    }

    /// The process-wide cache, with the default engine and [`LogWarn`].
    pub fn global() -> &'static PatternCache {
        &GLOBAL
    }

    /// Returns the compiled program of `(flags, text)`, compiling it on the first
    /// lookup.
    ///
    /// On failure, the error has already been reported through the cache's
    /// [`Warn`] sink.
    pub fn lookup_or_compile(&self, flags: CompileFlags, text: &str) -> CompileResult {
        let slot = match self.get_slot(flags, text) {
            Some(slot) => slot,
            None => self.insert_slot(flags, text),
        };

        // Never hold the map lock while compiling: the shorthand rules are
        // themselves compiled through the global cache.
        let result = slot.get_or_init(|| self.compile(flags, text)).clone();
        if result.is_err() && !self.cache_failures {
            self.remove_slot(flags, text, Some(&slot));
        }
        result
    }

    /// Returns a [`Pattern`] handle for `(flags, text)`.
    ///
    /// If the pattern fails to compile, the handle is absent and every
    /// operation on it behaves as no match.
    pub fn pattern(&self, text: &str, flags: CompileFlags) -> Pattern {
        Pattern::from_result(text, flags, self.lookup_or_compile(flags, text))
    }

    /// Like [`PatternCache::pattern`], but returns the compile error instead of
    /// an absent handle.
    pub fn try_pattern(
        &self,
        text: &str,
        flags: CompileFlags,
    ) -> Result<Pattern, Arc<CompileError>> {
        let compiled = self.lookup_or_compile(flags, text)?;
        Ok(Pattern::from_result(text, flags, Ok(compiled)))
    }

    /// Drops a remembered compile failure of `(flags, text)`, so that the next
    /// lookup compiles it again. Successfully compiled keys are never dropped.
    ///
    /// Returns whether a failure was dropped.
    pub fn invalidate(&self, flags: CompileFlags, text: &str) -> bool {
        match self.get_slot(flags, text) {
            Some(slot) if matches!(slot.get(), Some(Err(_))) => {
                self.remove_slot(flags, text, Some(&slot))
            }
            _ => false,
        }
    }

    /// Whether `(flags, text)` is stored, compiled or (with `cache_failures`) failed.
    pub fn contains(&self, flags: CompileFlags, text: &str) -> bool {
        self.get_slot(flags, text)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        Self::count(&self.read())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn count(slots: &HashMap<CompileFlags, HashMap<Box<str>, Slot>>) -> usize {
        slots.values().map(HashMap::len).sum()
    }

    fn read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<CompileFlags, HashMap<Box<str>, Slot>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_slot(&self, flags: CompileFlags, text: &str) -> Option<Slot> {
        self.read().get(&flags)?.get(text).cloned()
    }

    fn insert_slot(&self, flags: CompileFlags, text: &str) -> Slot {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race
        if let Some(slot) = slots
            .get(&flags)
            .and_then(|by_text| by_text.get(text))
        {
            return slot.clone();
        }

        let slot = Slot::default();
        if self.capacity.is_none_or(|capacity| Self::count(&slots) < capacity) {
            slots
                .entry(flags)
                .or_default()
                .insert(text.into(), slot.clone());
        }
        slot
    }

    /// Only removes the stored slot if it is `expected`, i.e. has not been
    /// replaced in the meantime.
    fn remove_slot(&self, flags: CompileFlags, text: &str, expected: Option<&Slot>) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let Some(by_text) = slots.get_mut(&flags) else {
            return false;
        };
        match (by_text.get(text), expected) {
            (Some(slot), Some(expected)) if !Arc::ptr_eq(slot, expected) => false,
            (Some(_), _) => by_text.remove(text).is_some(),
            (None, _) => false,
        }
    }

    fn compile(&self, flags: CompileFlags, text: &str) -> CompileResult {
        self.try_compile(flags, text).map(Arc::new).map_err(|e| {
            self.warn.warn(&format!(
                "Regex compilation error: {e}, in pattern \"{text}\" (flags {flags:?})"
            ));
            Arc::new(e)
        })
    }

    fn try_compile(&self, flags: CompileFlags, text: &str) -> Result<Compiled, CompileError> {
        let rewritten = if flags.contains(CompileFlags::ENHANCED) {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(shorthand::rewrite(text)?)
        };
        let program = self.engine.compile(&rewritten, flags)?;

        let group_len = program.group_len();
        let outer_groups = group::outer_groups(&rewritten, flags)
            .unwrap_or_else(|| group::scan_outer_groups(&rewritten))
            .into_iter()
            .filter(|&group| group < group_len)
            .collect();

        Ok(Compiled {
            program,
            outer_groups,
            rewritten: rewritten.into(),
            warn: self.warn.clone(),
        })
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("cache_failures", &self.cache_failures)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        thread,
    };

    use super::*;

    #[derive(Default)]
    struct Counting {
        inner: Backtrack,
        compiles: AtomicUsize,
    }

    impl Engine for Counting {
        fn compile(
            &self,
            pattern: &str,
            flags: CompileFlags,
        ) -> Result<Arc<dyn Program>, CompileError> {
            self.compiles.fetch_add(1, Ordering::SeqCst);
            self.inner.compile(pattern, flags)
        }
    }

    fn recording() -> (Arc<Mutex<Vec<String>>>, Arc<dyn Warn>) {
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let warn: Arc<dyn Warn> = Arc::new({
            let warnings = warnings.clone();
            move |message: &str| warnings.lock().unwrap().push(message.to_owned())
        });
        (warnings, warn)
    }

    #[test]
    fn compile_once() {
        let engine = Arc::new(Counting::default());
        let cache = PatternCache::builder().engine(engine.clone()).build();
        let flags = CompileFlags::default();

        let a = cache.lookup_or_compile(flags, r"\d+").unwrap();
        let b = cache.lookup_or_compile(flags, r"\d+").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 1);

        // Flags are part of the key
        cache.lookup_or_compile(CompileFlags::from("i"), r"\d+").unwrap();
        cache.lookup_or_compile(flags, r"\d*").unwrap();
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 3);
        assert!(cache.contains(flags, r"\d+"));
        assert!(!cache.contains(CompileFlags::NEWLINE, r"\d+"));
    }

    #[test]
    fn compile_once_concurrently() {
        let engine = Arc::new(Counting::default());
        let cache = PatternCache::builder().engine(engine.clone()).build();

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let re = cache.pattern(r"(\w+)@(\w+)", CompileFlags::default());
                    assert_eq!(re.match_all(b"a@b c@d").len(), 2);
                });
            }
        });
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rewritten() {
        let cache = PatternCache::default();
        let flags = CompileFlags::default();
        let compiled = cache.lookup_or_compile(flags, r"a\d").unwrap();
        assert_eq!(compiled.rewritten(), "a[[:digit:]]");

        let compiled = cache
            .lookup_or_compile(flags | CompileFlags::ENHANCED, r"a\d")
            .unwrap();
        assert_eq!(compiled.rewritten(), r"a\d");
        assert_eq!(compiled.outer_groups(), &[] as &[usize]);
    }

    #[test]
    fn failure_not_cached() {
        let engine = Arc::new(Counting::default());
        let (warnings, warn) = recording();
        let cache = PatternCache::builder()
            .engine(engine.clone())
            .warn(warn)
            .build();
        let flags = CompileFlags::default();

        assert!(cache.lookup_or_compile(flags, "(a").is_err());
        assert!(cache.lookup_or_compile(flags, "(a").is_err());
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());

        let warnings = warnings.lock().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("\"(a\""), "{}", warnings[0]);
    }

    #[test]
    fn failure_cached() {
        let engine = Arc::new(Counting::default());
        let (warnings, warn) = recording();
        let cache = PatternCache::builder()
            .engine(engine.clone())
            .warn(warn)
            .cache_failures(true)
            .build();
        let flags = CompileFlags::default();

        assert!(cache.lookup_or_compile(flags, "(a").is_err());
        assert!(cache.lookup_or_compile(flags, "(a").is_err());
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 1);
        assert_eq!(warnings.lock().unwrap().len(), 1);
        assert!(cache.contains(flags, "(a"));

        assert!(cache.invalidate(flags, "(a"));
        assert!(!cache.invalidate(flags, "(a"));
        assert!(cache.lookup_or_compile(flags, "(a").is_err());
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 2);

        // Compiled keys stay
        cache.lookup_or_compile(flags, "a").unwrap();
        assert!(!cache.invalidate(flags, "a"));
        assert!(cache.contains(flags, "a"));
    }

    #[test]
    fn capacity() {
        let engine = Arc::new(Counting::default());
        let cache = PatternCache::builder()
            .engine(engine.clone())
            .capacity(1)
            .build();

        let a = cache.pattern("a", CompileFlags::default());
        let b = cache.pattern("b", CompileFlags::default());
        cache.pattern("b", CompileFlags::default());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(CompileFlags::default(), "a"));
        // Still usable, just not stored
        assert_eq!(b.match_all(b"abc"), vec![&b"b"[..]]);
        assert_eq!(a.match_all(b"abca"), vec![&b"a"[..], &b"a"[..]]);
        assert_eq!(engine.compiles.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn global() {
        let a = PatternCache::global()
            .lookup_or_compile(CompileFlags::default(), "global-[0-9]")
            .unwrap();
        let b = Pattern::new("global-[0-9]");
        assert!(Arc::ptr_eq(&a, b.compiled().unwrap()));
    }
}
