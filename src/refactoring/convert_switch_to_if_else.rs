use super::{commit, indent_unit, reindent, RefactorContext, RefactorError};
use crate::editor::Editor;
use crate::ts::precedence::{operand, EQUALITY, RELATIONAL};
use crate::ts::transform::replace_node;
use crate::ts::{closest_match, parse, NodeKind, SyntaxNode};

/// Statements that `break` can target.
const BREAKABLE: &[&str] = &[
    "switch_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
];

/// Consecutive cases sharing one body.
struct Branch<'t> {
    /// Tested values; empty for `default`.
    values: Vec<SyntaxNode<'t>>,
    /// Statements to keep, trailing `break` removed.
    body: Vec<SyntaxNode<'t>>,
}

fn invalid(reason: &str) -> RefactorError {
    RefactorError::pattern_invalid(reason)
}

fn breaks_out_of(statement: &SyntaxNode<'_>, switch: &SyntaxNode<'_>) -> bool {
    statement
        .descendants()
        .filter(|n| n.is(NodeKind::BreakStatement) && n.field("label").is_none())
        .any(|brk| {
            brk.ancestors()
                .find(|a| BREAKABLE.contains(&a.kind_name()))
                .is_some_and(|target| target.is_same(switch))
        })
}

fn branches<'t>(switch: SyntaxNode<'t>) -> Result<Vec<Branch<'t>>, RefactorError> {
    let body = switch
        .field("body")
        .ok_or_else(|| invalid("I can't read the cases of this switch"))?;
    let clauses = body.statements();
    if clauses.is_empty() {
        return Err(invalid("I can't convert a switch without cases"));
    }

    let mut branches = Vec::new();
    let mut pending: Vec<SyntaxNode<'t>> = Vec::new();
    let mut seen_default = false;

    for (i, clause) in clauses.iter().enumerate() {
        let is_last = i + 1 == clauses.len();
        let is_default = clause.is(NodeKind::SwitchDefault);
        if seen_default {
            return Err(invalid("I can only convert a switch whose default case comes last"));
        }
        seen_default |= is_default;
        if !is_default {
            if let Some(value) = clause.field("value") {
                pending.push(value);
            }
        }

        let mut statements: Vec<SyntaxNode<'t>> = clause
            .named_children()
            .into_iter()
            .filter(|child| !child.is_field_of_parent("value"))
            .skip_while(|child| child.is(NodeKind::Comment))
            .collect();
        if statements.iter().all(|s| s.is(NodeKind::Comment)) && !is_default && !is_last {
            // empty case falls through to the next one on purpose
            continue;
        }

        let ends_with_break = statements
            .iter()
            .rev()
            .find(|s| !s.is(NodeKind::Comment))
            .is_some_and(|s| s.is(NodeKind::BreakStatement) && s.field("label").is_none());
        if ends_with_break {
            while let Some(last) = statements.pop() {
                if last.is(NodeKind::BreakStatement) {
                    break;
                }
            }
        } else if !is_last
            && !statements
                .iter()
                .rev()
                .find(|s| !s.is(NodeKind::Comment))
                .is_some_and(|s| s.kind().is_jump())
        {
            return Err(invalid("I can't convert a switch where a case falls through"));
        }

        if statements.iter().any(|s| breaks_out_of(s, &switch)) {
            return Err(invalid("I can't convert a switch with a break inside a case body"));
        }

        let values = if is_default {
            Vec::new()
        } else {
            std::mem::take(&mut pending)
        };
        branches.push(Branch {
            values,
            body: statements,
        });
        pending.clear();
    }

    Ok(branches)
}

/// Source of `body` laid out at `indent`, first line unindented.
fn body_text(body: &[SyntaxNode<'_>], indent: &str) -> String {
    match (body.first(), body.last()) {
        (Some(first), Some(last)) => {
            let source = first.source();
            let text = &source[first.byte_range().start..last.byte_range().end];
            reindent(text, first.line_indentation(), indent)
        }
        _ => String::new(),
    }
}

fn convert(switch: SyntaxNode<'_>) -> Result<String, RefactorError> {
    let discriminant = switch
        .field("value")
        .map(|value| operand(value.unwrap_parentheses(), EQUALITY))
        .ok_or_else(|| invalid("I can't read the value of this switch"))?;
    let branches = branches(switch)?;
    let indent = switch.line_indentation();

    if let [only] = branches.as_slice() {
        if only.values.is_empty() {
            return Ok(body_text(&only.body, indent));
        }
    }

    let case_indent = switch
        .field("body")
        .and_then(|body| body.statements().first().map(|c| c.line_indentation()))
        .unwrap_or(indent);
    let inner = format!("{indent}{}", indent_unit(indent, case_indent));

    let mut output = String::new();
    for (i, branch) in branches.iter().enumerate() {
        if i > 0 {
            output.push_str(" else ");
        }
        if !branch.values.is_empty() {
            let condition = branch
                .values
                .iter()
                .map(|value| format!("{discriminant} === {}", operand(*value, RELATIONAL)))
                .collect::<Vec<_>>()
                .join(" || ");
            output.push_str(&format!("if ({condition}) "));
        }
        if branch.body.is_empty() {
            output.push_str("{}");
        } else {
            output.push_str(&format!(
                "{{\n{inner}{}\n{indent}}}",
                body_text(&branch.body, &inner)
            ));
        }
    }
    Ok(output)
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let tree = parse(&code)?;
    let found = closest_match(tree.root(), &editor.selection(), |node, _| {
        node.is(NodeKind::SwitchStatement).then_some(())
    })
    .ok_or_else(|| RefactorError::no_match("I didn't find a switch statement to convert"))?;

    let replacement = convert(found.node)?;
    commit(editor, vec![replace_node(&found.node, replacement)], None)
}
