//! Name-based reference lookup.
//!
//! This is deliberately not scope analysis: every identifier spelled like the
//! selected one is a reference in the current file. Other files only take part
//! when the name is exported here and imported there under the same name.

use crate::selection::Selection;
use crate::ts::errors::TreeSitterError;
use crate::ts::locator::closest_match;
use crate::ts::node::{NodeKind, SyntaxNode};
use crate::ts::parser::parse;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// How a reference is spelled in the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceKind {
    /// A plain identifier.
    Identifier,
    /// Shorthand property (`{ a }`) where the token is both key and value.
    Shorthand,
}

/// One place where a symbol is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeReference {
    pub file: PathBuf,
    pub selection: Selection,
    pub kind: ReferenceKind,
}

fn reference_kind(node: &SyntaxNode<'_>) -> Option<ReferenceKind> {
    match node.kind() {
        NodeKind::Identifier => Some(ReferenceKind::Identifier),
        NodeKind::ShorthandPropertyIdentifier | NodeKind::ShorthandPropertyIdentifierPattern => {
            Some(ReferenceKind::Shorthand)
        }
        _ => None,
    }
}

/// The symbol designated by `selection`, if any.
pub fn symbol_at(source: &str, selection: &Selection) -> Result<Option<String>, TreeSitterError> {
    let tree = parse(source)?;
    let found = closest_match(tree.root(), selection, |node, _| {
        reference_kind(&node).map(|_| node.text().to_string())
    });
    Ok(found.map(|m| m.value))
}

/// Every reference to the symbol designated by `selection` in `current_file`.
///
/// `workspace` holds the other files as `(path, code)` pairs; paths are
/// compared after lexical normalization, so they must share a root with
/// `current_file`.
pub fn find_references(
    current_file: &Path,
    source: &str,
    selection: &Selection,
    workspace: &[(PathBuf, String)],
) -> Result<Vec<CodeReference>, TreeSitterError> {
    let Some(name) = symbol_at(source, selection)? else {
        debug!(%selection, "no symbol under selection");
        return Ok(Vec::new());
    };

    let tree = parse(source)?;
    let mut references = references_in(tree.root(), current_file, &name);

    if is_exported(tree.root(), &name) {
        let exporting = normalize(current_file);
        for (file, code) in workspace {
            if normalize(file) == exporting {
                continue;
            }
            let other = parse(code)?;
            references.extend(imported_references(other.root(), file, &exporting, &name));
        }
    }

    info!(symbol = %name, count = references.len(), "found references");
    Ok(references)
}

fn references_in(root: SyntaxNode<'_>, file: &Path, name: &str) -> Vec<CodeReference> {
    root.descendants()
        .filter(|node| node.text() == name && node.is_selectable())
        .filter_map(|node| {
            reference_kind(&node).map(|kind| CodeReference {
                file: file.to_path_buf(),
                selection: node.range(),
                kind,
            })
        })
        .collect()
}

fn is_exported(root: SyntaxNode<'_>, name: &str) -> bool {
    root.descendants()
        .filter(|node| node.is(NodeKind::ExportStatement))
        .any(|export| {
            if let Some(declaration) = export.field("declaration") {
                return declared_names(declaration).iter().any(|n| n == name);
            }
            export
                .descendants()
                .filter(|n| n.is(NodeKind::ExportSpecifier))
                .any(|specifier| {
                    specifier
                        .field("name")
                        .map(|n| n.text() == name)
                        .unwrap_or(false)
                })
        })
}

fn declared_names(declaration: SyntaxNode<'_>) -> Vec<String> {
    if let Some(name) = declaration.field("name") {
        return vec![name.text().to_string()];
    }
    declaration
        .named_children()
        .into_iter()
        .filter(|child| child.is(NodeKind::VariableDeclarator))
        .filter_map(|declarator| declarator.field("name"))
        .map(|name| name.text().to_string())
        .collect()
}

fn imported_references(
    root: SyntaxNode<'_>,
    file: &Path,
    exporting: &Path,
    name: &str,
) -> Vec<CodeReference> {
    let mut references = Vec::new();
    for import in root.descendants().filter(|n| n.is(NodeKind::ImportStatement)) {
        let Some(source) = import.field("source") else {
            continue;
        };
        if !resolves_to(file, string_content(source.text()), exporting) {
            continue;
        }
        for specifier in import
            .descendants()
            .filter(|n| n.is(NodeKind::ImportSpecifier))
        {
            let Some(imported) = specifier.field("name") else {
                continue;
            };
            if imported.text() != name {
                continue;
            }
            if specifier.field("alias").is_some() {
                // local code uses the alias, only the specifier itself refers to us
                references.push(CodeReference {
                    file: file.to_path_buf(),
                    selection: imported.range(),
                    kind: ReferenceKind::Identifier,
                });
            } else {
                return references_in(root, file, name);
            }
        }
    }
    references
}

fn string_content(literal: &str) -> &str {
    literal.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// Whether `specifier`, imported from `importer`, designates `target`.
///
/// Only relative specifiers are resolved; extensions and `/index` are optional.
fn resolves_to(importer: &Path, specifier: &str, target: &Path) -> bool {
    if !specifier.starts_with('.') {
        return false;
    }
    let base = importer.parent().unwrap_or_else(|| Path::new(""));
    let resolved = normalize(&base.join(specifier));
    let target_stem = target.with_extension("");
    resolved == target
        || resolved == target_stem
        || (target_stem.file_name().and_then(|n| n.to_str()) == Some("index")
            && target_stem.parent() == Some(resolved.as_path()))
}

/// Lexical normalization: drops `.` and folds `..` without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
