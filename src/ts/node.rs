use crate::position::{utf16_len, Position};
use crate::selection::Selection;
use std::fmt;
use std::ops::Range;
use tree_sitter::{Node, Point};

/// A position as recorded by the syntax layer: 1-based line, 0-based column.
///
/// Columns count UTF-16 code units. Use [`Selection::from_ast`] to move into
/// the engine's 0-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstPosition {
    pub line: usize,
    pub column: usize,
}

/// The recorded location of a node in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub start: AstPosition,
    pub end: AstPosition,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Closed set of node kinds refactorings reason about.
///
/// Every grammar kind not listed maps to [`NodeKind::Other`]; refactorings
/// never match on raw kind strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    StatementBlock,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    SwitchBody,
    SwitchCase,
    SwitchDefault,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    LexicalDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    ExportStatement,
    ExportSpecifier,
    ImportStatement,
    ImportSpecifier,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    MethodDefinition,
    ClassDeclaration,
    ClassStaticBlock,
    BinaryExpression,
    UnaryExpression,
    AssignmentExpression,
    AugmentedAssignmentExpression,
    TernaryExpression,
    SequenceExpression,
    YieldExpression,
    UpdateExpression,
    AsExpression,
    ParenthesizedExpression,
    CallExpression,
    NewExpression,
    AwaitExpression,
    MemberExpression,
    SubscriptExpression,
    Identifier,
    PropertyIdentifier,
    ShorthandPropertyIdentifier,
    ShorthandPropertyIdentifierPattern,
    String,
    TemplateString,
    Number,
    True,
    False,
    Null,
    Undefined,
    This,
    Object,
    Array,
    Pair,
    ObjectPattern,
    ArrayPattern,
    Comment,
    Error,
    Other,
}

impl NodeKind {
    pub fn from_grammar(kind: &str) -> Self {
        match kind {
            "program" => NodeKind::Program,
            "statement_block" => NodeKind::StatementBlock,
            "expression_statement" => NodeKind::ExpressionStatement,
            "if_statement" => NodeKind::IfStatement,
            "else_clause" => NodeKind::ElseClause,
            "switch_statement" => NodeKind::SwitchStatement,
            "switch_body" => NodeKind::SwitchBody,
            "switch_case" => NodeKind::SwitchCase,
            "switch_default" => NodeKind::SwitchDefault,
            "break_statement" => NodeKind::BreakStatement,
            "continue_statement" => NodeKind::ContinueStatement,
            "return_statement" => NodeKind::ReturnStatement,
            "throw_statement" => NodeKind::ThrowStatement,
            "lexical_declaration" => NodeKind::LexicalDeclaration,
            "variable_declaration" => NodeKind::VariableDeclaration,
            "variable_declarator" => NodeKind::VariableDeclarator,
            "export_statement" => NodeKind::ExportStatement,
            "export_specifier" => NodeKind::ExportSpecifier,
            "import_statement" => NodeKind::ImportStatement,
            "import_specifier" => NodeKind::ImportSpecifier,
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration
            }
            "function_expression" | "function" | "generator_function" => {
                NodeKind::FunctionExpression
            }
            "arrow_function" => NodeKind::ArrowFunction,
            "method_definition" => NodeKind::MethodDefinition,
            "class_declaration" => NodeKind::ClassDeclaration,
            "class_static_block" => NodeKind::ClassStaticBlock,
            "binary_expression" => NodeKind::BinaryExpression,
            "unary_expression" => NodeKind::UnaryExpression,
            "assignment_expression" => NodeKind::AssignmentExpression,
            "augmented_assignment_expression" => NodeKind::AugmentedAssignmentExpression,
            "ternary_expression" => NodeKind::TernaryExpression,
            "sequence_expression" => NodeKind::SequenceExpression,
            "yield_expression" => NodeKind::YieldExpression,
            "update_expression" => NodeKind::UpdateExpression,
            "as_expression" | "satisfies_expression" => NodeKind::AsExpression,
            "parenthesized_expression" => NodeKind::ParenthesizedExpression,
            "call_expression" => NodeKind::CallExpression,
            "new_expression" => NodeKind::NewExpression,
            "await_expression" => NodeKind::AwaitExpression,
            "member_expression" => NodeKind::MemberExpression,
            "subscript_expression" => NodeKind::SubscriptExpression,
            "identifier" => NodeKind::Identifier,
            "property_identifier" => NodeKind::PropertyIdentifier,
            "shorthand_property_identifier" => NodeKind::ShorthandPropertyIdentifier,
            "shorthand_property_identifier_pattern" => {
                NodeKind::ShorthandPropertyIdentifierPattern
            }
            "string" => NodeKind::String,
            "template_string" => NodeKind::TemplateString,
            "number" => NodeKind::Number,
            "true" => NodeKind::True,
            "false" => NodeKind::False,
            "null" => NodeKind::Null,
            "undefined" => NodeKind::Undefined,
            "this" => NodeKind::This,
            "object" => NodeKind::Object,
            "array" => NodeKind::Array,
            "pair" => NodeKind::Pair,
            "object_pattern" => NodeKind::ObjectPattern,
            "array_pattern" => NodeKind::ArrayPattern,
            "comment" => NodeKind::Comment,
            "ERROR" => NodeKind::Error,
            _ => NodeKind::Other,
        }
    }

    /// Nodes that hold a list of statements new declarations can be inserted into.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Program
                | NodeKind::StatementBlock
                | NodeKind::SwitchCase
                | NodeKind::SwitchDefault
                | NodeKind::ClassStaticBlock
        )
    }

    /// Nodes that open a new function scope.
    pub fn is_function(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunction
                | NodeKind::MethodDefinition
        )
    }

    /// Statements that unconditionally leave the current block.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            NodeKind::ReturnStatement
                | NodeKind::ThrowStatement
                | NodeKind::BreakStatement
                | NodeKind::ContinueStatement
        )
    }

    /// Expressions that never need parentheses when combined with an operator.
    pub fn is_primary(self) -> bool {
        matches!(
            self,
            NodeKind::Identifier
                | NodeKind::This
                | NodeKind::String
                | NodeKind::TemplateString
                | NodeKind::Number
                | NodeKind::True
                | NodeKind::False
                | NodeKind::Null
                | NodeKind::Undefined
                | NodeKind::Array
                | NodeKind::Object
                | NodeKind::ParenthesizedExpression
                | NodeKind::CallExpression
                | NodeKind::MemberExpression
                | NodeKind::SubscriptExpression
        )
    }
}

/// A tree-sitter node paired with the source it was parsed from.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> SyntaxNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    pub fn raw(&self) -> Node<'t> {
        self.node
    }

    pub fn source(&self) -> &'t str {
        self.source
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_grammar(self.node.kind())
    }

    pub fn kind_name(&self) -> &'static str {
        self.node.kind()
    }

    pub fn id(&self) -> usize {
        self.node.id()
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    pub fn is_same(&self, other: &SyntaxNode<'_>) -> bool {
        self.node.id() == other.node.id()
    }

    pub fn text(&self) -> &'t str {
        &self.source[self.node.byte_range()]
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    pub fn has_error(&self) -> bool {
        self.node.has_error()
    }

    pub fn is_error_or_missing(&self) -> bool {
        self.node.is_error() || self.node.is_missing()
    }

    /// MISSING nodes are inserted by error recovery and never appear in the
    /// text, so they carry no location.
    pub fn is_selectable(&self) -> bool {
        !self.node.is_missing()
    }

    /// Location with the parser's 1-based line numbers.
    pub fn loc(&self) -> Option<SourceLocation> {
        if !self.is_selectable() {
            return None;
        }
        let start = self.position_of(self.node.start_byte(), self.node.start_position());
        let end = self.position_of(self.node.end_byte(), self.node.end_position());
        Some(SourceLocation {
            start: AstPosition {
                line: start.line + 1,
                column: start.character,
            },
            end: AstPosition {
                line: end.line + 1,
                column: end.character,
            },
        })
    }

    /// Range in engine coordinates, available even for unselectable nodes.
    pub fn range(&self) -> Selection {
        Selection::from_positions(self.start(), self.end())
    }

    pub fn start(&self) -> Position {
        self.position_of(self.node.start_byte(), self.node.start_position())
    }

    pub fn end(&self) -> Position {
        self.position_of(self.node.end_byte(), self.node.end_position())
    }

    /// Tree-sitter columns are byte offsets; engine characters are UTF-16 units.
    fn position_of(&self, byte: usize, point: Point) -> Position {
        let line_start = byte - point.column;
        let prefix = self.source.get(line_start..byte).unwrap_or_default();
        Position::new(point.row, utf16_len(prefix))
    }

    /// Text of the source line the node starts on.
    pub fn start_line_text(&self) -> &'t str {
        let start = self.node.start_byte() - self.node.start_position().column;
        let rest = &self.source[start..];
        rest.split('\n').next().unwrap_or_default()
    }

    /// Leading whitespace of the line the node starts on.
    pub fn line_indentation(&self) -> &'t str {
        let line = self.start_line_text();
        &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
    }

    pub fn parent(&self) -> Option<Self> {
        self.node.parent().map(|node| Self::new(node, self.source))
    }

    pub fn field(&self, name: &str) -> Option<Self> {
        self.node
            .child_by_field_name(name)
            .map(|node| Self::new(node, self.source))
    }

    /// Whether this node is the `name` field of its parent.
    pub fn is_field_of_parent(&self, name: &str) -> bool {
        self.parent()
            .and_then(|parent| parent.field(name))
            .map(|field| field.is_same(self))
            .unwrap_or(false)
    }

    pub fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| Self::new(node, self.source))
            .collect()
    }

    pub fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|node| Self::new(node, self.source))
            .collect()
    }

    /// Named children that are not comments.
    pub fn statements(&self) -> Vec<Self> {
        self.named_children()
            .into_iter()
            .filter(|child| !child.is(NodeKind::Comment))
            .collect()
    }

    /// First anonymous child whose text is `token`.
    pub fn token(&self, token: &str) -> Option<Self> {
        self.children()
            .into_iter()
            .find(|child| !child.is_named() && child.text() == token)
    }

    /// Pre-order walk over named nodes, starting with `self`.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            stack: vec![*self],
            named_only: true,
        }
    }

    /// Pre-order walk over every node, anonymous tokens included.
    pub fn descendants_with_anonymous(&self) -> Descendants<'t> {
        Descendants {
            stack: vec![*self],
            named_only: false,
        }
    }

    /// Parent chain, closest first, excluding `self`.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'t>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn is_ancestor_of(&self, other: &SyntaxNode<'_>) -> bool {
        let mut current = other.node.parent();
        while let Some(node) = current {
            if node.id() == self.node.id() {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Leaf token texts, comments excluded.
    pub fn tokens(&self) -> Vec<&'t str> {
        self.descendants_with_anonymous()
            .filter(|node| node.node.child_count() == 0 && !node.is(NodeKind::Comment))
            .map(|node| node.text())
            .collect()
    }

    /// Whether both nodes have the same kind and the same token sequence.
    pub fn is_equivalent_to(&self, other: &SyntaxNode<'_>) -> bool {
        self.kind_name() == other.kind_name() && self.tokens() == other.tokens()
    }

    /// Strip any number of wrapping parentheses.
    pub fn unwrap_parentheses(self) -> Self {
        let mut current = self;
        while current.is(NodeKind::ParenthesizedExpression) {
            match current.statements().into_iter().next() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// Closest ancestor of one of the given kinds.
    pub fn closest_ancestor(&self, predicate: impl Fn(NodeKind) -> bool) -> Option<Self> {
        self.ancestors().find(|node| predicate(node.kind()))
    }

    /// The statement containing this node that is a direct child of a block,
    /// together with that block.
    pub fn enclosing_statement(&self) -> Option<(Self, Self)> {
        let mut current = *self;
        for parent in self.ancestors() {
            if parent.kind().is_block()
                && !current.is(NodeKind::Comment)
                && !current.is_field_of_parent("value")
            {
                return Some((current, parent));
            }
            current = parent;
        }
        None
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind_name(), self.range())
    }
}

pub struct Descendants<'t> {
    stack: Vec<SyntaxNode<'t>>,
    named_only: bool,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children = if self.named_only {
            node.named_children()
        } else {
            node.children()
        };
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}
