use super::{commit, single_statement, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::ts::precedence::{operand, ASSIGNMENT, COALESCE};
use crate::ts::transform::replace_node;
use std::borrow::Cow;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// An `if` with a plain `else`, each branch reduced to a single statement.
///
/// The condition is ready to stand before `?`.
struct IfParts<'t> {
    condition: Cow<'t, str>,
    consequence: SyntaxNode<'t>,
    alternative: SyntaxNode<'t>,
}

type Strategy = for<'t> fn(&IfParts<'t>) -> Option<String>;

/// Tried in order, the first one producing code wins.
const STRATEGIES: &[Strategy] = &[returned_ternary, assigned_ternary];

fn if_parts(node: SyntaxNode<'_>) -> Option<IfParts<'_>> {
    if !node.is(NodeKind::IfStatement) {
        return None;
    }
    let else_clause = node.field("alternative")?;
    let alternative = single_statement(else_clause.statements().into_iter().next()?)?;
    if alternative.is(NodeKind::IfStatement) {
        return None;
    }
    Some(IfParts {
        condition: operand(node.field("condition")?.unwrap_parentheses(), COALESCE),
        consequence: single_statement(node.field("consequence")?)?,
        alternative,
    })
}

fn returned_value<'t>(statement: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if !statement.is(NodeKind::ReturnStatement) {
        return None;
    }
    statement.statements().into_iter().next()
}

/// `return c ? a : b;`
fn returned_ternary(parts: &IfParts<'_>) -> Option<String> {
    let consequence = returned_value(parts.consequence)?;
    let alternative = returned_value(parts.alternative)?;
    Some(format!(
        "return {} ? {} : {};",
        parts.condition,
        operand(consequence, ASSIGNMENT),
        operand(alternative, ASSIGNMENT)
    ))
}

/// Target, operator and value of an assignment statement.
fn assignment<'t>(statement: SyntaxNode<'t>) -> Option<(SyntaxNode<'t>, &'t str, SyntaxNode<'t>)> {
    if !statement.is(NodeKind::ExpressionStatement) {
        return None;
    }
    let expression = statement.statements().into_iter().next()?;
    if !matches!(
        expression.kind(),
        NodeKind::AssignmentExpression | NodeKind::AugmentedAssignmentExpression
    ) {
        return None;
    }
    let left = expression.field("left")?;
    let right = expression.field("right")?;
    let operator = expression.source()[left.byte_range().end..right.byte_range().start].trim();
    Some((left, operator, right))
}

/// `x = c ? a : b;`
fn assigned_ternary(parts: &IfParts<'_>) -> Option<String> {
    let (left, operator, consequence) = assignment(parts.consequence)?;
    let (other_left, other_operator, alternative) = assignment(parts.alternative)?;
    if !left.is_equivalent_to(&other_left) || operator != other_operator {
        return None;
    }
    Some(format!(
        "{} {operator} {} ? {} : {};",
        left.text(),
        parts.condition,
        operand(consequence, ASSIGNMENT),
        operand(alternative, ASSIGNMENT)
    ))
}

fn ternary(node: SyntaxNode<'_>) -> Option<String> {
    let parts = if_parts(node)?;
    STRATEGIES.iter().find_map(|strategy| strategy(&parts))
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| ternary(node))
        .ok_or_else(|| {
            RefactorError::no_match("I didn't find an if/else that can become a ternary")
        })?;

    commit(editor, vec![replace_node(&found.node, found.value)], None)
}
