use super::{commit, negate, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::ts::transform::replace_node;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// Parts of an `if` with a plain `else` branch.
struct Branches<'t> {
    condition: SyntaxNode<'t>,
    consequence: SyntaxNode<'t>,
    alternative: SyntaxNode<'t>,
}

fn branches(node: SyntaxNode<'_>) -> Option<Branches<'_>> {
    if !node.is(NodeKind::IfStatement) {
        return None;
    }
    let else_clause = node.field("alternative")?;
    let alternative = else_clause.statements().into_iter().next()?;
    // `else if` chains would need every condition negated
    if alternative.is(NodeKind::IfStatement) {
        return None;
    }
    Some(Branches {
        condition: node.field("condition")?,
        consequence: node.field("consequence")?,
        alternative,
    })
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| branches(node))
        .ok_or_else(|| RefactorError::no_match("I didn't find an if statement to flip"))?;

    let Branches {
        condition,
        consequence,
        alternative,
    } = found.value;
    let inner = condition.unwrap_parentheses();
    let modifications = vec![
        replace_node(&condition, format!("({})", negate(inner))),
        replace_node(&consequence, alternative.text()),
        replace_node(&alternative, consequence.text()),
    ];
    commit(editor, modifications, None)
}
