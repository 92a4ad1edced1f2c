use super::{commit, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::ts::precedence::{binary_operator, operand};
use crate::ts::transform::replace_node;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// Operator to use once operands are swapped, for operators where swapping
/// keeps the meaning.
fn flipped(operator: &str) -> Option<&'static str> {
    Some(match operator {
        "==" => "==",
        "!=" => "!=",
        "===" => "===",
        "!==" => "!==",
        "&&" => "&&",
        "||" => "||",
        "&" => "&",
        "|" => "|",
        "^" => "^",
        "*" => "*",
        "<" => ">",
        ">" => "<",
        "<=" => ">=",
        ">=" => "<=",
        _ => return None,
    })
}

/// Swapped text of a flippable binary expression, spacing kept.
///
/// Operators associate to the left, so the old left operand needs
/// parentheses on the right when it binds no tighter than the operator.
fn flip(node: SyntaxNode<'_>) -> Option<String> {
    if !node.is(NodeKind::BinaryExpression) {
        return None;
    }
    let left = node.field("left")?;
    let operator = node.field("operator")?;
    let right = node.field("right")?;
    let flipped = flipped(operator.text())?;
    let level = binary_operator(operator.text())?;

    let source = node.source();
    let before = &source[left.byte_range().end..operator.byte_range().start];
    let after = &source[operator.byte_range().end..right.byte_range().start];
    Some(format!(
        "{}{before}{flipped}{after}{}",
        operand(right, level),
        operand(left, level + 1)
    ))
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| flip(node))
        .ok_or_else(|| RefactorError::no_match("I didn't find an operator to flip"))?;

    commit(editor, vec![replace_node(&found.node, found.value)], None)
}
