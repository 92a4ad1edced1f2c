use crate::pool::with_parser;
use crate::ts::errors::TreeSitterError;
use crate::ts::node::SyntaxNode;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// The grammar every buffer is parsed with.
///
/// TSX accepts plain JavaScript, TypeScript annotations and JSX, which is the
/// fixed set of syntax extensions refactorings operate on.
pub const GRAMMAR: SupportLang = SupportLang::Tsx;

/// Tree-sitter parser wrapper for JavaScript/TypeScript source code.
pub struct JsParser {
    parser: Parser,
}

impl JsParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = GRAMMAR.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<SyntaxTree<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(SyntaxTree { source, tree })
    }
}

/// Parse `source` with the thread's pooled parser.
pub fn parse(source: &str) -> Result<SyntaxTree<'_>, TreeSitterError> {
    with_parser(|parser| parser.parse_with_source(source))?
}

/// A parsed buffer with its tree-sitter tree.
pub struct SyntaxTree<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> SyntaxTree<'a> {
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self.tree.root_node(), self.source)
    }

    pub fn has_errors(&self) -> bool {
        self.root().has_error()
    }

    /// All ERROR and MISSING nodes, in document order.
    pub fn error_nodes(&self) -> Vec<SyntaxNode<'_>> {
        self.root()
            .descendants_with_anonymous()
            .filter(|node| node.is_error_or_missing())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::node::NodeKind;

    #[test]
    fn parse_valid_javascript() {
        let parsed = parse("const a = 1;\nconsole.log(a);").unwrap();
        assert!(!parsed.has_errors());
        assert_eq!(parsed.root().kind(), NodeKind::Program);
    }

    #[test]
    fn parse_typescript_and_jsx() {
        let source = "const f = (x: number): JSX.Element => <div>{x}</div>;";
        let parsed = parse(source).unwrap();
        assert!(!parsed.has_errors());
    }

    #[test]
    fn parse_invalid_source() {
        let parsed = parse("if (a {").unwrap();
        assert!(parsed.has_errors());
        assert!(!parsed.error_nodes().is_empty());
    }

    #[test]
    fn pooled_parser_is_reusable() {
        for source in ["a;", "b + c;", "function f() {}"] {
            assert!(!parse(source).unwrap().has_errors());
        }
    }
}
