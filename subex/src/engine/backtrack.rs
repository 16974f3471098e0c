use std::sync::Arc;

use bon::Builder;
use regex_automata::{
    nfa::thompson::{
        self,
        backtrack::{self, BoundedBacktracker},
        pikevm::{self, PikeVM},
    },
    util::{pool::Pool, primitives::NonMaxUsize},
    Input, PatternID,
};

use crate::{
    engine::{Engine, Program},
    pattern::Captures,
    syntax, CompileError, CompileFlags, ExecError,
};

/// The default engine: a bounded backtracker from [`regex_automata`], with a
/// PikeVM for long subjects.
///
/// The backtracker clears a visited set sized to the whole subject before every
/// search. Iterating over matches searches every remainder of the haystack
/// again, so on long haystacks that clearing would be quadratic. Subjects longer
/// than [`backtrack_limit`](BacktrackBuilder::backtrack_limit) are therefore
/// searched with a PikeVM compiled from the same NFA, whose per-search cost only
/// depends on how far it scans.
///
/// ```
/// use subex::{engine::Backtrack, CompileFlags, PatternCache};
///
/// let cache = PatternCache::builder()
///     .engine(std::sync::Arc::new(Backtrack::builder().visited_capacity(1 << 20).build()))
///     .build();
/// let re = cache.pattern(r"\d+", CompileFlags::default());
/// assert_eq!(re.match_all(b"a1b22"), vec![&b"1"[..], &b"22"[..]]);
/// ```
#[derive(Builder, Clone, Debug)]
pub struct Backtrack {
    /// Memory budget of the visited set, in bytes. Backtracked subjects that
    /// need more than this fail with a [`MatchError`](regex_automata::MatchError),
    /// which is reported as a runtime error.
    ///
    /// The set is allocated lazily, so a large budget only costs memory when
    /// long subjects are backtracked.
    #[builder(default = usize::MAX / 8)]
    visited_capacity: usize,
    /// Subjects longer than this many bytes are searched with the PikeVM.
    /// `usize::MAX` always backtracks.
    #[builder(default = 1 << 12)]
    backtrack_limit: usize,
    /// Unicode mode for the syntax: `.` and negated classes match whole UTF-8
    /// encoded codepoints only, and case folding is Unicode-aware.
    ///
    /// Disabled by default, so that they match any byte. Enabling it requires
    /// the `unicode` feature for Unicode classes and case folding.
    #[builder(default)]
    unicode: bool,
}

impl Default for Backtrack {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Engine for Backtrack {
    fn compile(
        &self,
        pattern: &str,
        flags: CompileFlags,
    ) -> Result<Arc<dyn Program>, CompileError> {
        let nfa = thompson::Compiler::new()
            .syntax(syntax::config(flags).unicode(self.unicode))
            // Byte haystacks; empty matches may split a codepoint
            .configure(thompson::Config::new().utf8(false))
            .build(pattern)?;
        let backtracker = BoundedBacktracker::builder()
            .configure(
                backtrack::Config::new().visited_capacity(self.visited_capacity),
            )
            .build_from_nfa(nfa.clone())?;
        let pikevm = PikeVM::new_from_nfa(nfa)?;
        Ok(Arc::new(BacktrackProgram::new(
            backtracker,
            pikevm,
            self.backtrack_limit,
        )))
    }
}

struct Caches {
    backtrack: backtrack::Cache,
    pikevm: pikevm::Cache,
}

type CachePoolFn = Box<dyn Fn() -> Caches + Send + Sync>;

struct BacktrackProgram {
    backtracker: BoundedBacktracker,
    pikevm: PikeVM,
    backtrack_limit: usize,
    group_len: usize,
    /// A thread safe pool of caches, so that a shared program can be executed
    /// without locking.
    pool: Pool<Caches, CachePoolFn>,
}

impl BacktrackProgram {
    fn new(backtracker: BoundedBacktracker, pikevm: PikeVM, backtrack_limit: usize) -> Self {
        let group_len = backtracker
            .get_nfa()
            .group_info()
            .group_len(PatternID::ZERO);
        let pool = {
            let (backtracker, pikevm) = (backtracker.clone(), pikevm.clone());
            let create: CachePoolFn = Box::new(move || Caches {
                backtrack: backtracker.create_cache(),
                pikevm: pikevm.create_cache(),
            });
            Pool::new(create)
        };
        Self {
            backtracker,
            pikevm,
            backtrack_limit,
            group_len,
            pool,
        }
    }
}

impl Program for BacktrackProgram {
    fn group_len(&self) -> usize {
        self.group_len
    }

    fn execute(
        &self,
        haystack: &[u8],
        want_groups: usize,
    ) -> Result<Option<Captures>, ExecError> {
        let want_groups = want_groups.clamp(1, self.group_len);
        let mut slots: Vec<Option<NonMaxUsize>> = vec![None; want_groups * 2];
        let mut caches = self.pool.get();
        let input = Input::new(haystack);
        let found = if haystack.len() > self.backtrack_limit {
            self.pikevm
                .search_slots(&mut caches.pikevm, &input, &mut slots)
        } else {
            self.backtracker
                .try_search_slots(&mut caches.backtrack, &input, &mut slots)?
        };
        if found.is_none() {
            return Ok(None);
        }

        let groups = (0..self.group_len)
            .map(|i| match slots.get(i * 2..i * 2 + 2) {
                Some(&[Some(start), Some(end)]) => Some(start.get()..end.get()),
                _ => None,
            })
            .collect::<Vec<_>>();
        Ok(Some(Captures::new(groups)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str, flags: CompileFlags) -> Arc<dyn Program> {
        Backtrack::default().compile(pattern, flags).unwrap()
    }

    #[test]
    fn groups() {
        let program = compile("([a-z]+)(x)?([0-9]+)", CompileFlags::default());
        assert_eq!(program.group_len(), 4);

        let caps = program.execute(b"--abc123", usize::MAX).unwrap().unwrap();
        assert_eq!(caps.range(), 2..8);
        assert_eq!(caps.group(1), Some(2..5));
        assert_eq!(caps.group(2), None);
        assert_eq!(caps.group(3), Some(5..8));

        assert_eq!(program.execute(b"---", usize::MAX).unwrap(), None);
    }

    #[test]
    fn want_groups() {
        let program = compile("([a-z]+)([0-9]+)", CompileFlags::default());

        let caps = program.execute(b"abc123", 2).unwrap().unwrap();
        assert_eq!(caps.group_len(), 3);
        assert_eq!(caps.group(1), Some(0..3));
        assert_eq!(caps.group(2), None);

        // Group 0 is always reported
        let caps = program.execute(b"abc123", 0).unwrap().unwrap();
        assert_eq!(caps.range(), 0..6);
        assert_eq!(caps.group(1), None);
    }

    #[test]
    fn flags() {
        let program = compile("abc", CompileFlags::ICASE);
        assert!(program.execute(b"xABC", 1).unwrap().is_some());

        let program = compile("a.c", CompileFlags::default());
        assert!(program.execute(b"a\nc", 1).unwrap().is_some());
        let program = compile("a.c", CompileFlags::NEWLINE);
        assert!(program.execute(b"a\nc", 1).unwrap().is_none());

        let program = compile("^b", CompileFlags::NEWLINE);
        assert_eq!(
            program
                .execute(b"a\nb", 1)
                .unwrap()
                .map(|caps| caps.range()),
            Some(2..3)
        );
        let program = compile("^b", CompileFlags::default());
        assert_eq!(program.execute(b"a\nb", 1).unwrap(), None);
    }

    #[test]
    fn bytes() {
        let program = compile("a.b", CompileFlags::default());
        let caps = program.execute(b"\xffa\xfeb", 1).unwrap().unwrap();
        assert_eq!(caps.range(), 1..4);

        let program = compile("[^[:space:]]+", CompileFlags::default());
        let caps = program.execute(b" \xff\xfe x", 1).unwrap().unwrap();
        assert_eq!(caps.range(), 1..3);

        // Non-ASCII literals still match their UTF-8 encoding
        let program = compile("é+", CompileFlags::default());
        let caps = program.execute("aéé".as_bytes(), 1).unwrap().unwrap();
        assert_eq!(caps.range(), 1..5);
    }

    #[cfg(feature = "unicode")]
    #[test]
    fn unicode() {
        let engine = Backtrack::builder().unicode(true).build();
        let program = engine.compile("a.b", CompileFlags::default()).unwrap();
        assert_eq!(program.execute(b"\xffa\xfeb", 1).unwrap(), None);
        let caps = program.execute("aéb".as_bytes(), 1).unwrap().unwrap();
        assert_eq!(caps.range(), 0..4);
    }

    #[test]
    fn build_error() {
        let engine = Backtrack::default();
        assert!(matches!(
            engine.compile("(unclosed", CompileFlags::default()),
            Err(CompileError::Build(_))
        ));
    }

    #[test]
    fn haystack_too_long() {
        let engine = Backtrack::builder()
            .visited_capacity(64)
            .backtrack_limit(usize::MAX)
            .build();
        let program = engine.compile("a+b", CompileFlags::default()).unwrap();
        let haystack = vec![b'a'; 4096];
        assert!(matches!(
            program.execute(&haystack, 1),
            Err(ExecError::Match(_))
        ));

        // The PikeVM has no such limit
        let engine = Backtrack::builder()
            .visited_capacity(64)
            .backtrack_limit(16)
            .build();
        let program = engine.compile("a+b", CompileFlags::default()).unwrap();
        assert_eq!(program.execute(&haystack, 1).unwrap(), None);
    }

    #[test]
    fn long_subject() {
        let pattern = "([a-z]+)(x)?([0-9]+)";
        let pikevm = Backtrack::builder()
            .backtrack_limit(0)
            .build()
            .compile(pattern, CompileFlags::default())
            .unwrap();
        let backtracker = Backtrack::builder()
            .backtrack_limit(usize::MAX)
            .build()
            .compile(pattern, CompileFlags::default())
            .unwrap();

        let mut haystack = vec![b'-'; 10_000];
        haystack.extend_from_slice(b"abc123");
        for haystack in [&haystack[..], &b"--abc123"[..], &b"---"[..]] {
            assert_eq!(
                pikevm.execute(haystack, usize::MAX).unwrap(),
                backtracker.execute(haystack, usize::MAX).unwrap()
            );
        }
        let caps = pikevm.execute(&haystack, usize::MAX).unwrap().unwrap();
        assert_eq!(caps.group(1), Some(10_000..10_003));
        assert_eq!(caps.group(2), None);
    }
}
