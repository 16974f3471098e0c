//! Outer (non-nested) capture group detection.
use regex_automata::util::syntax;
use regex_syntax::hir::{Hir, HirKind};

use crate::CompileFlags;

/// Indices of the top-level capture groups of `pattern`, left to right.
///
/// Returns `None` if `pattern` cannot be parsed with the syntax of `flags`
/// (only possible with a custom [`Engine`](crate::engine::Engine)).
pub fn outer_groups(pattern: &str, flags: CompileFlags) -> Option<Vec<usize>> {
    let hir = syntax::parse_with(pattern, &super::config(flags)).ok()?;
    Some(outer_groups_hir(&hir))
}

pub fn outer_groups_hir(hir: &Hir) -> Vec<usize> {
    fn walk(hir: &Hir, groups: &mut Vec<usize>) {
        match hir.kind() {
            HirKind::Empty | HirKind::Literal(_) | HirKind::Class(_) | HirKind::Look(_) => {}
            // Nested groups are not visited
            HirKind::Capture(capture) => groups.push(capture.index as usize),
            HirKind::Repetition(repetition) => walk(&repetition.sub, groups),
            HirKind::Concat(subs) | HirKind::Alternation(subs) => {
                for sub in subs {
                    walk(sub, groups)
                }
            }
        }
    }
    let mut groups = Vec::new();
    walk(hir, &mut groups);
    groups
}

/// Textual fallback of [`outer_groups`]: counts every unescaped `(` as a group
/// and tracks the nesting depth.
///
/// This is only an approximation: `(?:...)` and `[(]` are counted too.
pub fn scan_outer_groups(pattern: &str) -> Vec<usize> {
    let mut groups = Vec::new();
    let (mut group, mut level) = (0, 0usize);
    let mut bytes = pattern.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'(' => {
                group += 1;
                level += 1;
                if level == 1 {
                    groups.push(group);
                }
            }
            b')' => level = level.saturating_sub(1),
            b'\\' => {
                bytes.next();
            }
            _ => (),
        }
    }
    groups
}
