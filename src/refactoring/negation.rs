use crate::ts::{NodeKind, SyntaxNode};

fn inverted_comparison(operator: &str) -> Option<&'static str> {
    Some(match operator {
        "==" => "!=",
        "!=" => "==",
        "===" => "!==",
        "!==" => "===",
        "<" => ">=",
        ">=" => "<",
        ">" => "<=",
        "<=" => ">",
        _ => return None,
    })
}

/// Source text of the logical negation of `expression`.
///
/// `!x` loses its `!`, comparisons invert their operator, boolean literals
/// flip, and anything else is prefixed with `!`, parenthesized unless it is a
/// primary expression. The result is safe to use as a full condition.
pub fn negate(expression: SyntaxNode<'_>) -> String {
    let expression = expression.unwrap_parentheses();
    match expression.kind() {
        NodeKind::True => "false".to_string(),
        NodeKind::False => "true".to_string(),
        NodeKind::UnaryExpression => {
            let operator = expression.field("operator").map(|op| op.text());
            match (operator, expression.field("argument")) {
                (Some("!"), Some(argument)) => argument.unwrap_parentheses().text().to_string(),
                _ => format!("!({})", expression.text()),
            }
        }
        NodeKind::BinaryExpression => negate_binary(expression),
        kind if kind.is_primary() => format!("!{}", expression.text()),
        _ => format!("!({})", expression.text()),
    }
}

fn negate_binary(expression: SyntaxNode<'_>) -> String {
    let parts = (
        expression.field("left"),
        expression.field("operator"),
        expression.field("right"),
    );
    let (Some(left), Some(operator), Some(right)) = parts else {
        return format!("!({})", expression.text());
    };
    let Some(inverted) = inverted_comparison(operator.text()) else {
        return format!("!({})", expression.text());
    };

    let source = expression.source();
    let before = &source[left.byte_range().end..operator.byte_range().start];
    let after = &source[operator.byte_range().end..right.byte_range().start];
    format!("{}{before}{inverted}{after}{}", left.text(), right.text())
}
