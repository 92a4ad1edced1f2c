use super::{commit, reindent, RefactorContext, RefactorError};
use crate::edit::Modification;
use crate::editor::Editor;
use crate::selection::Selection;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// The `else` clause of an `if` whose consequence always leaves the block.
fn redundant_else<'t>(node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if !node.is(NodeKind::IfStatement) {
        return None;
    }
    // hoisted statements need a statement list to land in
    if !node.parent()?.kind().is_block() {
        return None;
    }
    let consequence = node.field("consequence")?;
    let last = if consequence.is(NodeKind::StatementBlock) {
        consequence.statements().pop()?
    } else {
        consequence
    };
    if !last.kind().is_jump() {
        return None;
    }
    node.field("alternative")
}

/// Statements of the else branch, laid out at `indent`.
fn hoisted_body(else_clause: SyntaxNode<'_>, indent: &str) -> Option<String> {
    let branch = else_clause.statements().into_iter().next()?;
    let statements = if branch.is(NodeKind::StatementBlock) {
        branch.named_children()
    } else {
        vec![branch]
    };
    let (first, last) = (statements.first()?, statements.last()?);
    let text = &branch.source()[first.byte_range().start..last.byte_range().end];
    Some(reindent(text, first.line_indentation(), indent))
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| redundant_else(node))
        .ok_or_else(|| RefactorError::no_match("I didn't find a redundant else"))?;

    let if_statement = found.node;
    let consequence = if_statement
        .field("consequence")
        .ok_or_else(|| RefactorError::pattern_invalid("I can't read this if statement"))?;
    let indent = if_statement.line_indentation();
    let replacement = match hoisted_body(found.value, indent) {
        Some(body) => format!("\n{indent}{body}"),
        None => String::new(),
    };

    let modification = Modification::new(
        Selection::from_positions(consequence.end(), if_statement.end()),
        replacement,
    );
    commit(editor, vec![modification], None)
}
