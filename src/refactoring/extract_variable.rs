use super::{commit, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::occurrence::{Extraction, Occurrence};
use crate::selection::Selection;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};
use tracing::debug;

/// Parents whose identifier children are bindings or labels, not values.
const BINDING_PARENTS: &[&str] = &[
    "formal_parameters",
    "required_parameter",
    "optional_parameter",
    "rest_pattern",
    "import_clause",
    "namespace_import",
    "namespace_export",
    "labeled_statement",
    "catch_clause",
    "class_heritage",
    "nested_identifier",
];

fn is_expression(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Identifier
            | NodeKind::String
            | NodeKind::TemplateString
            | NodeKind::Number
            | NodeKind::True
            | NodeKind::False
            | NodeKind::Null
            | NodeKind::Undefined
            | NodeKind::This
            | NodeKind::Object
            | NodeKind::Array
            | NodeKind::BinaryExpression
            | NodeKind::UnaryExpression
            | NodeKind::TernaryExpression
            | NodeKind::ParenthesizedExpression
            | NodeKind::CallExpression
            | NodeKind::NewExpression
            | NodeKind::AwaitExpression
            | NodeKind::MemberExpression
            | NodeKind::SubscriptExpression
            | NodeKind::ArrowFunction
            | NodeKind::FunctionExpression
            | NodeKind::ShorthandPropertyIdentifier
    )
}

/// Whether `node` is a value that can be moved into a variable.
fn is_extractable(node: &SyntaxNode<'_>) -> bool {
    if !is_expression(node.kind()) {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };

    // nothing gained by extracting a whole statement
    if parent.is(NodeKind::ExpressionStatement) {
        return false;
    }
    // assignment targets and callee members must stay in place
    if node.is_field_of_parent("left") && parent.kind_name().contains("assignment") {
        return false;
    }
    if node.is(NodeKind::MemberExpression) && node.is_field_of_parent("function") {
        return false;
    }
    if node.is(NodeKind::Identifier) {
        let parent_kind = parent.kind_name();
        if node.is_field_of_parent("name")
            || node.is_field_of_parent("alias")
            || node.is_field_of_parent("label")
            || (parent.is(NodeKind::ArrowFunction) && node.is_field_of_parent("parameter"))
            || BINDING_PARENTS.contains(&parent_kind)
            || parent_kind.starts_with("jsx_")
            || parent_kind.ends_with("_pattern")
            || (parent.is(NodeKind::UnaryExpression)
                && parent.field("operator").map(|op| op.text()) == Some("delete"))
        {
            return false;
        }
    }
    // declarator patterns, for-in/of targets
    !node.ancestors().take_while(|a| !a.kind().is_block()).any(|a| {
        a.kind_name().ends_with("_pattern") && !a.kind_name().starts_with("assignment")
    })
}

/// Expression designated by `selection`.
///
/// A cursor designates the innermost expression around it. A range designates
/// the innermost expression covering all of it.
fn extractable(node: SyntaxNode<'_>, selection: &Selection) -> Option<()> {
    let covers = selection.is_cursor() || selection.is_inside_node(&node);
    (covers && is_extractable(&node)).then_some(())
}

/// Arrow functions with an expression body between `node` and its statement
/// have nowhere to put a declaration.
fn inside_concise_arrow(node: &SyntaxNode<'_>) -> bool {
    let mut child = *node;
    for ancestor in node.ancestors() {
        if ancestor.kind().is_block() {
            return false;
        }
        if ancestor.is(NodeKind::ArrowFunction)
            && child.is_field_of_parent("body")
            && !child.is(NodeKind::StatementBlock)
        {
            return true;
        }
        child = ancestor;
    }
    false
}

fn scope_of<'t>(node: &SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    node.closest_ancestor(NodeKind::is_function)
}

/// Every extractable node equivalent to `selected` in the same function scope.
fn equivalents<'t>(root: SyntaxNode<'t>, selected: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
    let scope = scope_of(&selected);
    let search_root = scope.unwrap_or(root);
    search_root
        .descendants()
        .filter(|candidate| {
            candidate.is_equivalent_to(&selected)
                && is_extractable(candidate)
                && !inside_concise_arrow(candidate)
                && match (scope_of(candidate), scope) {
                    (Some(a), Some(b)) => a.is_same(&b),
                    (None, None) => true,
                    _ => false,
                }
        })
        .collect()
}

pub(super) fn run(editor: &mut dyn Editor, context: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let selected = closest_match(tree.root(), &editor.selection(), extractable)
        .ok_or_else(|| RefactorError::no_match("I didn't find a valid code to extract"))?
        .node;

    if inside_concise_arrow(&selected) {
        return Err(RefactorError::pattern_invalid(
            "I can't extract from an arrow function without braces, add braces first",
        ));
    }

    let mut nodes = equivalents(tree.root(), selected);
    if nodes.len() > 1 {
        let options = vec![
            format!("Replace all {} occurrences", nodes.len()),
            "Replace this occurrence only".to_string(),
        ];
        match editor.ask_user_choice(&options) {
            Some(0) => {}
            Some(_) => nodes = vec![selected],
            None => return Err(RefactorError::Cancelled),
        }
    } else {
        nodes = vec![selected];
    }
    debug!(occurrences = nodes.len(), "extracting");

    let extraction = Extraction::new(nodes.into_iter().map(Occurrence::new).collect())
        .ok_or_else(|| RefactorError::no_match("I didn't find a valid code to extract"))?;
    let name = extraction.suggested_name(&context.default_name);
    let (modifications, cursor) = extraction.modifications(&name).ok_or_else(|| {
        RefactorError::pattern_invalid("I can't find where to declare the extracted variable")
    })?;
    commit(editor, modifications, Some(cursor))
}
