use super::{commit, indent_unit, single_statement, RefactorContext, RefactorError};
use crate::edit::Modification;
use crate::editor::Editor;
use crate::selection::Selection;
use crate::ts::transform::{insert_after, replace_node};
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// The enclosing `if` when `node` is an `if` nested alone in it.
fn parent_if<'t>(node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if !node.is(NodeKind::IfStatement) {
        return None;
    }
    let mut consequence = node;
    let mut parent = node.parent()?;
    if parent.is(NodeKind::StatementBlock) {
        consequence = parent;
        parent = parent.parent()?;
    }
    let nested_alone = single_statement(consequence).is_some_and(|only| only.is_same(&node));
    let is_consequence = consequence.is_field_of_parent("consequence");
    (parent.is(NodeKind::IfStatement)
        && is_consequence
        && nested_alone
        && parent.field("alternative").is_none())
    .then_some(parent)
}

fn modifications(inner: SyntaxNode<'_>, outer: SyntaxNode<'_>) -> Option<Vec<Modification>> {
    let inner_condition = inner.field("condition")?;
    let outer_condition = outer.field("condition")?;

    let mut modifications = vec![
        replace_node(&outer_condition, inner_condition.text()),
        replace_node(&inner_condition, outer_condition.text()),
    ];

    // the else branch still depends on the outer condition once moved out
    if let Some(alternative) = inner.field("alternative") {
        let consequence = inner.field("consequence")?;
        let body = alternative
            .named_children()
            .into_iter()
            .find(|child| !child.is(NodeKind::Comment))?;
        let indent = outer.line_indentation();
        let unit = indent_unit(indent, inner.line_indentation());

        let outer_consequence = outer.field("consequence")?;
        if outer_consequence.is(NodeKind::StatementBlock) {
            modifications.push(Modification::deletion(Selection::from_positions(
                consequence.end(),
                alternative.end(),
            )));
        } else {
            // braces keep the moved else from binding to the nested if
            modifications.push(Modification::new(
                Selection::from_positions(outer_condition.end(), inner.start()),
                format!(" {{\n{indent}{unit}"),
            ));
            modifications.push(Modification::new(
                Selection::from_positions(consequence.end(), alternative.end()),
                format!("\n{indent}}}"),
            ));
        }
        let moved = format!(
            "else {{\n{indent}{unit}if {} {}\n{indent}}}",
            outer_condition.text(),
            body.text()
        );
        modifications.push(insert_after(&outer, &moved, " "));
    }
    Some(modifications)
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| parent_if(node))
        .ok_or_else(|| RefactorError::no_match("I didn't find an if statement to bubble up"))?;

    let modifications = modifications(found.node, found.value).ok_or_else(|| {
        RefactorError::pattern_invalid("I can't bubble up this if statement")
    })?;
    commit(editor, modifications, None)
}
