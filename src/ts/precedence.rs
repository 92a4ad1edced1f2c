//! Operator precedence of expression nodes.
//!
//! Refactorings assemble their output as text, so an expression moved into an
//! operator slot keeps its meaning only when it binds at least as tightly as
//! the slot requires. Levels follow the ECMAScript grammar; a higher level
//! binds tighter.

use super::node::{NodeKind, SyntaxNode};
use std::borrow::Cow;

pub const SEQUENCE: u8 = 1;
pub const ASSIGNMENT: u8 = 2;
pub const CONDITIONAL: u8 = 3;
pub const COALESCE: u8 = 4;
pub const LOGICAL_OR: u8 = 5;
pub const LOGICAL_AND: u8 = 6;
pub const BITWISE_OR: u8 = 7;
pub const BITWISE_XOR: u8 = 8;
pub const BITWISE_AND: u8 = 9;
pub const EQUALITY: u8 = 10;
pub const RELATIONAL: u8 = 11;
pub const SHIFT: u8 = 12;
pub const ADDITIVE: u8 = 13;
pub const MULTIPLICATIVE: u8 = 14;
pub const EXPONENT: u8 = 15;
pub const UNARY: u8 = 16;
pub const CALL: u8 = 17;
pub const PRIMARY: u8 = 18;

/// Level of a binary operator token.
pub fn binary_operator(operator: &str) -> Option<u8> {
    Some(match operator {
        "??" => COALESCE,
        "||" => LOGICAL_OR,
        "&&" => LOGICAL_AND,
        "|" => BITWISE_OR,
        "^" => BITWISE_XOR,
        "&" => BITWISE_AND,
        "==" | "!=" | "===" | "!==" => EQUALITY,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => RELATIONAL,
        "<<" | ">>" | ">>>" => SHIFT,
        "+" | "-" => ADDITIVE,
        "*" | "/" | "%" => MULTIPLICATIVE,
        "**" => EXPONENT,
        _ => return None,
    })
}

/// Level of `node` as an operand.
///
/// Kinds the engine does not model rank lowest, so they always end up
/// parenthesized.
pub fn precedence(node: &SyntaxNode<'_>) -> u8 {
    match node.kind() {
        NodeKind::SequenceExpression => SEQUENCE,
        NodeKind::AssignmentExpression
        | NodeKind::AugmentedAssignmentExpression
        | NodeKind::ArrowFunction
        | NodeKind::YieldExpression => ASSIGNMENT,
        NodeKind::TernaryExpression => CONDITIONAL,
        NodeKind::BinaryExpression => node
            .field("operator")
            .and_then(|operator| binary_operator(operator.text()))
            .unwrap_or(SEQUENCE),
        NodeKind::AsExpression => RELATIONAL,
        NodeKind::UnaryExpression | NodeKind::AwaitExpression | NodeKind::UpdateExpression => {
            UNARY
        }
        NodeKind::CallExpression
        | NodeKind::NewExpression
        | NodeKind::MemberExpression
        | NodeKind::SubscriptExpression => CALL,
        NodeKind::FunctionExpression => PRIMARY,
        kind if kind.is_primary() => PRIMARY,
        _ => SEQUENCE,
    }
}

/// Text of `node` for a slot that needs at least `level`, parenthesized when
/// it binds looser.
pub fn operand<'t>(node: SyntaxNode<'t>, level: u8) -> Cow<'t, str> {
    if precedence(&node) >= level {
        Cow::Borrowed(node.text())
    } else {
        Cow::Owned(format!("({})", node.text()))
    }
}
