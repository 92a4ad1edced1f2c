use super::{commit, RefactorContext, RefactorError};
use crate::edit::{apply_modifications, Modification};
use crate::editor::Editor;
use crate::naming::is_valid_identifier;
use crate::ts::references::{symbol_at, ReferenceKind};
use crate::ts::CodeReference;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

fn renamed(reference: &CodeReference, old: &str, new: &str) -> Modification {
    let code = match reference.kind {
        ReferenceKind::Identifier => new.to_string(),
        // the key must survive, only the binding changes
        ReferenceKind::Shorthand => format!("{old}: {new}"),
    };
    Modification::new(reference.selection, code)
}

pub(super) fn run(editor: &mut dyn Editor, _: &RefactorContext) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let selection = editor.selection();
    let old = symbol_at(&code, &selection)?
        .ok_or_else(|| RefactorError::no_match("I didn't find a symbol to rename"))?;

    let new = editor
        .ask_user_input(Some(old.as_str()))
        .ok_or(RefactorError::Cancelled)?;
    let new = new.trim();
    if new == old {
        return Ok(());
    }
    if !is_valid_identifier(new) {
        return Err(RefactorError::pattern_invalid(format!(
            "`{new}` is not a valid identifier"
        )));
    }

    let current = editor.current_file().to_path_buf();
    let mut by_file: BTreeMap<PathBuf, Vec<Modification>> = BTreeMap::new();
    for reference in editor.get_selection_references(selection)? {
        by_file
            .entry(reference.file.clone())
            .or_default()
            .push(renamed(&reference, &old, new));
    }
    let in_current = by_file.remove(&current).unwrap_or_default();

    // every other file is patched in memory first so a failure writes nothing
    let mut others = Vec::with_capacity(by_file.len());
    for (file, modifications) in by_file {
        let source = editor.code_of(&file)?;
        others.push((file, apply_modifications(&source, &modifications)?));
    }

    info!(%old, %new, files = others.len() + 1, "renaming symbol");
    commit(editor, in_current, None)?;
    for (file, patched) in others {
        editor.write_in(&file, &patched)?;
    }
    Ok(())
}
