use super::{commit, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::ts::transform::replace_node;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// Block body of an arrow function.
fn block_body<'t>(node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if !node.is(NodeKind::ArrowFunction) {
        return None;
    }
    node.field("body")
        .filter(|body| body.is(NodeKind::StatementBlock))
}

/// Expression the block boils down to.
fn expression_of(body: SyntaxNode<'_>) -> Result<String, RefactorError> {
    let children = body.named_children();
    if children.iter().any(|c| c.is(NodeKind::Comment)) {
        return Err(RefactorError::pattern_invalid(
            "I can't remove braces without losing the comments of this function",
        ));
    }
    let [statement] = children.as_slice() else {
        return Err(RefactorError::pattern_invalid(
            "I can only remove braces when the function has a single statement",
        ));
    };

    let expression = match statement.kind() {
        NodeKind::ReturnStatement | NodeKind::ExpressionStatement => {
            statement.named_children().into_iter().next()
        }
        _ => None,
    }
    .ok_or_else(|| {
        RefactorError::pattern_invalid(
            "I can only remove braces around a return or an expression statement",
        )
    })?;

    // an object literal would read as a block, a sequence as extra arguments
    let needs_parentheses =
        expression.is(NodeKind::Object) || expression.is(NodeKind::SequenceExpression);
    Ok(if needs_parentheses {
        format!("({})", expression.text())
    } else {
        expression.text().to_string()
    })
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| block_body(node))
        .ok_or_else(|| RefactorError::no_match("I didn't find an arrow function with braces"))?;

    let expression = expression_of(found.value)?;
    commit(editor, vec![replace_node(&found.value, expression)], None)
}

#[cfg(test)]
mod tests {
    use crate::refactoring::test_support::{assert_refactors, assert_reported};

    const ID: &str = "remove-braces-from-arrow-function";

    #[test]
    fn single_return_becomes_expression() {
        assert_refactors(
            ID,
            "() => { return [cursor]\"Hello!\"; }",
            "() => \"Hello!\"",
        );
    }

    #[test]
    fn two_statements_are_rejected() {
        assert_reported(ID, "() => {\n  [cursor]log();\n  return \"Hello!\";\n}");
    }

    #[test]
    fn object_literals_get_parentheses() {
        assert_refactors(
            ID,
            "const f = (a) => {[cursor] return { a }; };",
            "const f = (a) => ({ a });",
        );
    }

    #[test]
    fn expression_statement_body() {
        assert_refactors(
            ID,
            "items.forEach((item) => {\n  [cursor]save(item);\n});",
            "items.forEach((item) => save(item));",
        );
    }

    #[test]
    fn innermost_arrow_wins() {
        assert_refactors(
            ID,
            "const f = () => {\n  return () => { return [cursor]1; };\n};",
            "const f = () => {\n  return () => 1;\n};",
        );
    }

    #[test]
    fn empty_return_is_rejected() {
        assert_reported(ID, "() => { [cursor]return; }");
    }
}
