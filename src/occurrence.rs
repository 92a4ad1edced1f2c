//! Occurrences of an expression being extracted into a variable.
//!
//! An [`Occurrence`] knows how to render the matched node as a reference to
//! the new variable and how to declare that variable. Both forms depend on
//! what was matched: member expressions are destructured, shorthand properties
//! keep their key, string literals suggest a name from their content.
//! [`Extraction`] groups the occurrences being replaced and decides where the
//! declaration goes.

use crate::edit::Modification;
use crate::naming::name_from_literal;
use crate::position::Position;
use crate::ts::node::{NodeKind, SyntaxNode};
use crate::ts::transform::{insert_after, insert_before, replace_node};
use std::collections::HashSet;

const DECLARATION_PREFIX: &str = "const ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Category {
    Plain,
    StringLiteral,
    Member { object: String, property: String },
    Shorthand,
}

/// A matched expression that will be replaced by a reference.
#[derive(Debug, Clone)]
pub struct Occurrence<'t> {
    pub node: SyntaxNode<'t>,
    category: Category,
}

impl<'t> Occurrence<'t> {
    pub fn new(node: SyntaxNode<'t>) -> Self {
        let category = match node.kind() {
            NodeKind::String => Category::StringLiteral,
            NodeKind::ShorthandPropertyIdentifier => Category::Shorthand,
            NodeKind::MemberExpression => member_parts(&node)
                .map(|(object, property)| Category::Member { object, property })
                .unwrap_or(Category::Plain),
            _ => Category::Plain,
        };
        Self { node, category }
    }

    /// Name proposed for the variable, `default` when nothing fits better.
    pub fn suggested_name(&self, default: &str) -> String {
        match &self.category {
            Category::StringLiteral => {
                let text = self.node.text();
                let content = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
                name_from_literal(content).unwrap_or_else(|| default.to_string())
            }
            Category::Member { property, .. } => property.clone(),
            Category::Plain | Category::Shorthand => default.to_string(),
        }
    }

    /// Replace the occurrence with a reference to `name`.
    pub fn reference(&self, name: &str) -> Modification {
        match &self.category {
            Category::Shorthand if self.node.text() != name => {
                replace_node(&self.node, format!("{}: {name}", self.node.text()))
            }
            _ => replace_node(&self.node, name),
        }
    }

    /// Declaration binding `name` to the occurrence's value.
    pub fn declaration(&self, name: &str) -> String {
        match &self.category {
            Category::Member { object, property } if property == name => {
                format!("{DECLARATION_PREFIX}{{ {property} }} = {object};")
            }
            Category::Member { object, property } => {
                format!("{DECLARATION_PREFIX}{{ {property}: {name} }} = {object};")
            }
            _ => format!("{DECLARATION_PREFIX}{name} = {};", self.node.text()),
        }
    }
}

/// Object and property of a plain `object.property` access.
///
/// Optional chains and private fields cannot be destructured.
fn member_parts(node: &SyntaxNode<'_>) -> Option<(String, String)> {
    let object = node.field("object")?;
    let property = node.field("property")?;
    let optional = node.children().iter().any(|child| child.text() == "?.");
    (property.is(NodeKind::PropertyIdentifier) && !optional)
        .then(|| (object.text().to_string(), property.text().to_string()))
}

/// Indentation for a line inserted before or after `statement`.
///
/// The first character of the statement's line, repeated to its indentation
/// level. A single space when the line starts with something else.
pub fn indentation_of(statement: &SyntaxNode<'_>) -> String {
    let level = statement.range().get_indentation_level(statement.source());
    if level == 0 {
        return String::new();
    }
    match statement.start_line_text().chars().next() {
        Some(c) if c == ' ' || c == '\t' => c.to_string().repeat(level),
        _ => " ".to_string(),
    }
}

/// Where the declaration is inserted.
#[derive(Debug, Clone, Copy)]
enum Anchor<'t> {
    Before(SyntaxNode<'t>),
    After(SyntaxNode<'t>),
}

/// The occurrences to replace, the first one being the topmost.
#[derive(Debug, Clone)]
pub struct Extraction<'t> {
    occurrences: Vec<Occurrence<'t>>,
}

impl<'t> Extraction<'t> {
    /// `None` when there is nothing to replace.
    pub fn new(mut occurrences: Vec<Occurrence<'t>>) -> Option<Self> {
        occurrences.sort_by_key(|o| o.node.start());
        (!occurrences.is_empty()).then_some(Self { occurrences })
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    fn topmost(&self) -> &Occurrence<'t> {
        &self.occurrences[0]
    }

    pub fn suggested_name(&self, default: &str) -> String {
        self.topmost().suggested_name(default)
    }

    /// The statement before which the declaration would go, and its block.
    fn insertion_statement(&self) -> Option<(SyntaxNode<'t>, SyntaxNode<'t>)> {
        let topmost = self.topmost().node;
        topmost
            .ancestors()
            .filter(|node| node.kind().is_block())
            .filter(|block| {
                self.occurrences[1..]
                    .iter()
                    .all(|o| block.is_ancestor_of(&o.node))
            })
            .find_map(|block| {
                let statement = std::iter::once(topmost)
                    .chain(topmost.ancestors())
                    .find(|node| node.parent().is_some_and(|p| p.is_same(&block)))?;
                // a case label is not one of its case's statements
                (!statement.is_field_of_parent("value")).then_some((statement, block))
            })
    }

    fn anchor(&self) -> Option<Anchor<'t>> {
        let (statement, block) = self.insertion_statement()?;
        if self.occurrences.len() == 1 {
            return Some(Anchor::Before(statement));
        }

        let declarations: Vec<SyntaxNode<'t>> = block
            .statements()
            .into_iter()
            .take_while(|s| !s.is_same(&statement))
            .filter(|s| s.is(NodeKind::LexicalDeclaration) || s.is(NodeKind::VariableDeclaration))
            .collect();

        let mut referenced = identifiers_in(&self.topmost().node);
        let mut last: Option<SyntaxNode<'t>> = None;
        // fixpoint: initialisers pull in the declarations they depend on
        loop {
            let mut grew = false;
            for declaration in &declarations {
                let declared = declared_names(declaration);
                if !declared.iter().any(|name| referenced.contains(name)) {
                    continue;
                }
                if last.map_or(true, |l| l.start() < declaration.start()) {
                    last = Some(*declaration);
                }
                for name in identifiers_in(declaration) {
                    grew |= referenced.insert(name);
                }
            }
            if !grew {
                break;
            }
        }

        Some(match last {
            Some(declaration) => Anchor::After(declaration),
            None => Anchor::Before(statement),
        })
    }

    /// Declaration, references and the position of the declared name once
    /// patched. `None` when no statement can host the declaration.
    pub fn modifications(&self, name: &str) -> Option<(Vec<Modification>, Position)> {
        let declaration = self.topmost().declaration(name);
        let mut modifications = Vec::with_capacity(self.occurrences.len() + 1);

        let cursor = match self.anchor()? {
            Anchor::Before(statement) => {
                let indent = indentation_of(&statement);
                modifications.push(insert_before(&statement, &declaration, &format!("\n{indent}")));
                statement.start().add_characters(DECLARATION_PREFIX.len())
            }
            Anchor::After(previous) => {
                let indent = indentation_of(&previous);
                modifications.push(insert_after(&previous, &declaration, &format!("\n{indent}")));
                Position::new(previous.end().line + 1, indent.len() + DECLARATION_PREFIX.len())
            }
        };

        modifications.extend(self.occurrences.iter().map(|o| o.reference(name)));
        Some((modifications, cursor))
    }
}

fn identifiers_in(node: &SyntaxNode<'_>) -> HashSet<String> {
    node.descendants()
        .filter(|n| n.is(NodeKind::Identifier) || n.is(NodeKind::ShorthandPropertyIdentifier))
        .map(|n| n.text().to_string())
        .collect()
}

fn declared_names(declaration: &SyntaxNode<'_>) -> Vec<String> {
    declaration
        .named_children()
        .into_iter()
        .filter(|child| child.is(NodeKind::VariableDeclarator))
        .filter_map(|declarator| declarator.field("name"))
        .flat_map(|pattern| {
            pattern
                .descendants()
                .filter(|n| {
                    n.is(NodeKind::Identifier) || n.is(NodeKind::ShorthandPropertyIdentifierPattern)
                })
                .map(|n| n.text().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
