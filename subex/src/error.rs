use std::string::FromUtf8Error;

use thiserror::Error;

pub use regex_automata::{nfa::thompson::BuildError, MatchError};

/// A pattern could not be compiled.
///
/// Compile errors are also reported through the cache's [`Warn`](crate::Warn)
/// sink, so most callers only need to know the pattern is absent.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// Syntax or size error from the default engine.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Shorthand rewriting produced a pattern that is not valid UTF-8.
    #[error("rewritten pattern is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    /// Error from a custom [`Engine`](crate::engine::Engine).
    #[error("{0}")]
    Engine(String),
}

/// An engine failed while executing a compiled program.
///
/// This is not "no match": the pattern may have matched, but the engine was
/// unable to tell. Such errors are reported through [`Warn`](crate::Warn) and
/// then treated like no match.
#[derive(Debug, Clone, Error)]
pub enum ExecError {
    /// Error from the default engine, e.g. a haystack beyond the backtracker's
    /// visited capacity.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Error from a custom [`Engine`](crate::engine::Engine).
    #[error("{0}")]
    Engine(String),
}

/// A `/pattern/replacement/flags` expression is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty substitution expression")]
    Empty,
    #[error("expected `{delimiter}pattern{delimiter}replacement{delimiter}flags`, found {parts} part(s)")]
    Parts { delimiter: char, parts: usize },
}
