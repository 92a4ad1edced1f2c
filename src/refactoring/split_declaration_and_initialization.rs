use super::{commit, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::occurrence::indentation_of;
use crate::ts::transform::replace_node;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

fn declaration(node: SyntaxNode<'_>) -> Option<()> {
    let is_declaration =
        node.is(NodeKind::LexicalDeclaration) || node.is(NodeKind::VariableDeclaration);
    let in_statement_list = node.parent().is_some_and(|p| p.kind().is_block());
    let initialized = node
        .named_children()
        .iter()
        .any(|d| d.is(NodeKind::VariableDeclarator) && d.field("value").is_some());
    (is_declaration && in_statement_list && initialized).then_some(())
}

/// `let a, b;` followed by one assignment per initialised declarator.
fn split(declaration: SyntaxNode<'_>) -> Result<String, RefactorError> {
    let keyword = declaration
        .children()
        .into_iter()
        .next()
        .map(|k| k.text())
        .unwrap_or("let");
    let keyword = if keyword == "var" { "var" } else { "let" };

    let mut names = Vec::new();
    let mut assignments = Vec::new();
    for declarator in declaration
        .named_children()
        .into_iter()
        .filter(|d| d.is(NodeKind::VariableDeclarator))
    {
        let name = declarator
            .field("name")
            .ok_or_else(|| RefactorError::pattern_invalid("I can't read this declaration"))?;
        if !name.is(NodeKind::Identifier) {
            return Err(RefactorError::pattern_invalid(
                "I can't split a destructuring declaration",
            ));
        }
        let annotation = declarator.field("type").map(|t| t.text()).unwrap_or_default();
        names.push(format!("{}{annotation}", name.text()));
        if let Some(value) = declarator.field("value") {
            assignments.push(format!("{} = {};", name.text(), value.text()));
        }
    }

    let indent = indentation_of(&declaration);
    let mut lines = vec![format!("{keyword} {};", names.join(", "))];
    lines.extend(assignments);
    Ok(lines.join(&format!("\n{indent}")))
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| declaration(node))
        .ok_or_else(|| {
            RefactorError::no_match("I didn't find a declaration with an initial value")
        })?;

    let replacement = split(found.node)?;
    commit(editor, vec![replace_node(&found.node, replacement)], None)
}

#[cfg(test)]
mod tests {
    use crate::refactoring::test_support::{assert_refactors, assert_reported};

    const ID: &str = "split-declaration-and-initialization";

    #[test]
    fn const_becomes_let_and_assignment() {
        assert_refactors(
            ID,
            "const [cursor]name = \"Jane\";",
            "let name;\nname = \"Jane\";",
        );
    }

    #[test]
    fn multiple_declarators() {
        assert_refactors(
            ID,
            "function f() {\n  [cursor]let a = 1, b, c = a + 1;\n}",
            "function f() {\n  let a, b, c;\n  a = 1;\n  c = a + 1;\n}",
        );
    }

    #[test]
    fn var_stays_var() {
        assert_refactors(ID, "[cursor]var count = 0;", "var count;\ncount = 0;");
    }

    #[test]
    fn type_annotations_stay_on_the_declaration() {
        assert_refactors(
            ID,
            "[cursor]const total: number = 0;",
            "let total: number;\ntotal = 0;",
        );
    }

    #[test]
    fn destructuring_is_rejected() {
        assert_reported(ID, "[cursor]const { a, b } = props;");
    }

    #[test]
    fn for_loop_initialisers_are_ignored() {
        assert_reported(ID, "for ([cursor]let i = 0; i < n; i++) {}");
    }
}
