use super::{commit, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::ts::transform::replace_node;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

const INDENT_UNIT: &str = "  ";

/// Expression body of an arrow function.
fn expression_body<'t>(node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if !node.is(NodeKind::ArrowFunction) {
        return None;
    }
    node.field("body")
        .filter(|body| !body.is(NodeKind::StatementBlock))
}

fn block_for(arrow: SyntaxNode<'_>, body: SyntaxNode<'_>) -> String {
    let unwrapped = body.unwrap_parentheses();
    let returned = if unwrapped.is(NodeKind::Object) {
        unwrapped.text()
    } else {
        body.text()
    };
    let indent = arrow.line_indentation();
    format!("{{\n{indent}{INDENT_UNIT}return {returned};\n{indent}}}")
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| expression_body(node))
        .ok_or_else(|| {
            RefactorError::no_match("I didn't find an arrow function to add braces to")
        })?;

    let block = block_for(found.node, found.value);
    commit(editor, vec![replace_node(&found.value, block)], None)
}
