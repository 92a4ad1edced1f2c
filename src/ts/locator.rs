//! Selection-to-node matching.
//!
//! Refactorings describe what they are looking for with a predicate over
//! `(node, selection)`. [`closest_match`] walks the tree top-down and returns
//! the innermost node the predicate accepts for the selection: before a
//! candidate is accepted, its subtree is searched with the same predicate and
//! the candidate is skipped if any descendant also matches. The walk stops at
//! the first accepted node, so an invocation never yields more than one match.

use crate::selection::Selection;
use crate::ts::node::SyntaxNode;
use std::marker::PhantomData;
use tracing::debug;

/// The node accepted by [`closest_match`] and whatever the predicate extracted
/// from it.
#[derive(Debug, Clone)]
pub struct Match<'t, T> {
    pub node: SyntaxNode<'t>,
    pub value: T,
}

/// Find the most specific node designated by `selection` that `predicate` accepts.
///
/// Only selectable nodes designated by the selection (see
/// [`Selection::is_inside_path`]) are offered to the predicate. Subtrees the
/// selection does not reach are skipped entirely.
pub fn closest_match<'t, T, F>(
    root: SyntaxNode<'t>,
    selection: &Selection,
    predicate: F,
) -> Option<Match<'t, T>>
where
    F: Fn(SyntaxNode<'t>, &Selection) -> Option<T>,
{
    let locator = Locator {
        selection,
        predicate: &predicate,
        _match: PhantomData,
    };
    let found = locator.visit(root);
    match &found {
        Some(m) => debug!(node = ?m.node, %selection, "closest match"),
        None => debug!(%selection, "no node matches selection"),
    }
    found
}

struct Locator<'s, 't, T, F> {
    selection: &'s Selection,
    predicate: &'s F,
    _match: PhantomData<fn(SyntaxNode<'t>) -> T>,
}

impl<'s, 't, T, F> Locator<'s, 't, T, F>
where
    F: Fn(SyntaxNode<'t>, &Selection) -> Option<T>,
{
    fn visit(&self, node: SyntaxNode<'t>) -> Option<Match<'t, T>> {
        if !self.reaches(&node) {
            return None;
        }

        if let Some(value) = self.candidate(node) {
            if !self.has_matching_descendant(node) {
                return Some(Match { node, value });
            }
            debug!(node = ?node, "deferring to a matching descendant");
        }

        node.named_children()
            .into_iter()
            .find_map(|child| self.visit(child))
    }

    fn candidate(&self, node: SyntaxNode<'t>) -> Option<T> {
        if !node.is_selectable() || !self.selection.is_inside_path(&node) {
            return None;
        }
        (self.predicate)(node, self.selection)
    }

    fn has_matching_descendant(&self, node: SyntaxNode<'t>) -> bool {
        node.named_children().into_iter().any(|child| {
            self.reaches(&child)
                && (self.candidate(child).is_some() || self.has_matching_descendant(child))
        })
    }

    /// A child's range never exceeds its parent's, so a node the selection does
    /// not designate has no designated descendants. The root is always entered
    /// since its range excludes leading trivia.
    fn reaches(&self, node: &SyntaxNode<'t>) -> bool {
        node.parent().is_none() || self.selection.is_inside_path(node)
    }
}
