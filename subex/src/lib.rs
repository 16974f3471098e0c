/*!
Cached pattern matching and Perl-style substitution over byte strings.

## Features
- POSIX extended regular expressions, plus the Perl-style [shorthand classes](syntax)
  `\w \W \d \D \s \S`.
- A [pattern cache](cache) that compiles each distinct `(flags, pattern)` at most once,
  shared across threads.
- [Match iteration](Pattern): splitting, extracting all matches, outer groups or every
  group, and callback replacement.
- [Substitution](replace) with `$N`, `${N}` and `\$` in the replacement, from
  `/pattern/replacement/flags` expressions.
- A pluggable [engine](engine). The default is a bounded backtracker from
  [`regex-automata`](https://docs.rs/regex-automata).
*/
//! ## Usage
//! ```
//! use subex::{CompileFlags, Pattern, Replace};
//!
//! let re = Pattern::new(r"(\w+)@(\w+)\.com");
//! assert_eq!(
//!     re.match_all(b"mail alice@example.com or bob@test.com"),
//!     vec![&b"alice@example.com"[..], &b"bob@test.com"[..]]
//! );
//! assert_eq!(
//!     re.parse(b"bob@test.com"),
//!     vec![Some(&b"bob@test.com"[..]), Some(&b"bob"[..]), Some(&b"test"[..])]
//! );
//!
//! let re = Replace::parse(r"/(\d+)-(\d+)/$2..$1/").unwrap();
//! assert_eq!(re.exec(b"pages 10-12"), b"pages 12..10");
//!
//! let re = Pattern::with_flags("^item", CompileFlags::from("im"));
//! assert_eq!(re.match_all(b"Item 1\nitem 2").len(), 2);
//! ```
//!
//! ## Errors
//! Compile and runtime errors never panic. They are reported through the cache's
//! [`Warn`] sink ([`LogWarn`] by default, i.e. [`log::warn!`]), and the operation
//! behaves as if nothing matched. [`Pattern::try_new`] and [`Replace::parse`]
//! return the error instead.
//!
//! ## Performance
//! The following `Cargo.toml` settings are recommended if best performance is desired:
//! ```toml
//! [profile.release]
//! lto = "fat"
//! codegen-units = 1
//! ```
//!
//! ## Crate features
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(feature = "doc", doc = document_features::document_features!())]

pub mod cache;
pub mod engine;
mod error;
mod flags;
pub mod pattern;
pub mod replace;
pub mod syntax;
mod warn;

pub use cache::{Compiled, PatternCache};
pub use error::{BuildError, CompileError, ExecError, MatchError, ParseError};
pub use flags::CompileFlags;
pub use pattern::{Captures, Pattern};
pub use replace::Replace;
pub use warn::{LogWarn, Warn};
