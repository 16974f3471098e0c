/*!
The regular expression engine seam.

A [`PatternCache`](crate::PatternCache) compiles patterns with an [`Engine`] and shares the
resulting [`Program`]s between every [`Pattern`](crate::Pattern) handle that resolves the
same key. The default engine is [`Backtrack`], a bounded backtracker from
[`regex_automata`].

## Custom engines
```
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use subex::{
    engine::{Backtrack, Engine, Program},
    CompileError, CompileFlags, PatternCache,
};

/// Counts compilations.
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
        self.compiles.fetch_add(1, Ordering::Relaxed);
        self.inner.compile(pattern, flags)
    }
}

let engine = Arc::new(Counting::default());
let cache = PatternCache::builder().engine(engine.clone()).build();
cache.pattern(r"\d+", CompileFlags::default());
cache.pattern(r"\d+", CompileFlags::default());
assert_eq!(engine.compiles.load(Ordering::Relaxed), 1);
```
*/
use std::sync::Arc;

use crate::{pattern::Captures, CompileError, CompileFlags, ExecError};

mod backtrack;

pub use backtrack::Backtrack;

/// Compiles pattern text into a [`Program`].
pub trait Engine: Send + Sync {
    /// `pattern` has already been through the
    /// [shorthand rewriter](crate::syntax::shorthand) unless `flags` contains
    /// [`CompileFlags::ENHANCED`].
    fn compile(
        &self,
        pattern: &str,
        flags: CompileFlags,
    ) -> Result<Arc<dyn Program>, CompileError>;
}

/// A compiled, immutable program. Must be safe to execute from many threads at once.
pub trait Program: Send + Sync {
    /// Number of capture groups, including group 0. Fixed at compile time.
    fn group_len(&self) -> usize;

    /// Searches `haystack` for the leftmost match.
    ///
    /// Only the first `want_groups` groups need to be reported (group 0 is
    /// always wanted); the rest may be left unset. The returned [`Captures`]
    /// always has [`group_len()`](Program::group_len) entries.
    ///
    /// `haystack` is a fresh subject: `^` may match at its start.
    fn execute(
        &self,
        haystack: &[u8],
        want_groups: usize,
    ) -> Result<Option<Captures>, ExecError>;
}
