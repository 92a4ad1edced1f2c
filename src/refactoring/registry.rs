use super::{
    add_braces_to_arrow_function, bubble_up_if_statement, convert_if_else_to_ternary,
    convert_switch_to_if_else, extract_variable, flip_if_else, flip_operator,
    remove_braces_from_arrow_function, remove_redundant_else, rename_symbol,
    split_declaration_and_initialization, Outcome, RefactorContext, RefactorError,
};
use crate::config::Config;
use crate::editor::Editor;
use tracing::{info, warn};

type RunFn = fn(&mut dyn Editor, &RefactorContext) -> Result<(), RefactorError>;

/// A named command.
#[derive(Clone, Copy)]
pub struct Refactoring {
    pub id: &'static str,
    pub title: &'static str,
    run: RunFn,
}

impl std::fmt::Debug for Refactoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refactoring").field("id", &self.id).finish()
    }
}

const CATALOGUE: &[Refactoring] = &[
    Refactoring {
        id: "add-braces-to-arrow-function",
        title: "Add braces to arrow function",
        run: add_braces_to_arrow_function::run,
    },
    Refactoring {
        id: "bubble-up-if-statement",
        title: "Bubble up if statement",
        run: bubble_up_if_statement::run,
    },
    Refactoring {
        id: "convert-if-else-to-ternary",
        title: "Convert if/else to ternary",
        run: convert_if_else_to_ternary::run,
    },
    Refactoring {
        id: "convert-switch-to-if-else",
        title: "Convert switch to if/else",
        run: convert_switch_to_if_else::run,
    },
    Refactoring {
        id: "extract-variable",
        title: "Extract variable",
        run: extract_variable::run,
    },
    Refactoring {
        id: "flip-if-else",
        title: "Flip if/else",
        run: flip_if_else::run,
    },
    Refactoring {
        id: "flip-operator",
        title: "Flip operator",
        run: flip_operator::run,
    },
    Refactoring {
        id: "remove-braces-from-arrow-function",
        title: "Remove braces from arrow function",
        run: remove_braces_from_arrow_function::run,
    },
    Refactoring {
        id: "remove-redundant-else",
        title: "Remove redundant else",
        run: remove_redundant_else::run,
    },
    Refactoring {
        id: "rename-symbol",
        title: "Rename symbol",
        run: rename_symbol::run,
    },
    Refactoring {
        id: "split-declaration-and-initialization",
        title: "Split declaration and initialization",
        run: split_declaration_and_initialization::run,
    },
];

/// Ids of every refactoring this crate knows, enabled or not.
pub fn known_ids() -> impl Iterator<Item = &'static str> {
    CATALOGUE.iter().map(|r| r.id)
}

/// The refactorings available to a dispatcher, with their shared settings.
#[derive(Debug, Clone)]
pub struct Registry {
    refactorings: Vec<Refactoring>,
    context: RefactorContext,
}

impl Registry {
    /// Every refactoring, enabled.
    pub fn new(context: RefactorContext) -> Self {
        Self {
            refactorings: CATALOGUE.to_vec(),
            context,
        }
    }

    /// Refactorings left enabled by `config`.
    pub fn from_config(config: &Config) -> Self {
        let refactorings = CATALOGUE
            .iter()
            .filter(|r| !config.refactorings.disabled.iter().any(|id| id == r.id))
            .copied()
            .collect();
        Self {
            refactorings,
            context: RefactorContext {
                default_name: config.extract.default_name.clone(),
            },
        }
    }

    pub fn get(&self, id: &str) -> Option<&Refactoring> {
        self.refactorings.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Refactoring> {
        self.refactorings.iter()
    }

    pub fn context(&self) -> &RefactorContext {
        &self.context
    }

    /// Closest enabled id to a mistyped one.
    pub fn suggest(&self, id: &str) -> Option<&'static str> {
        self.refactorings
            .iter()
            .map(|r| (strsim::levenshtein(id, r.id), r.id))
            .filter(|(distance, candidate)| *distance <= candidate.len() / 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate)
    }

    /// Run refactoring `id` on `editor`.
    ///
    /// Refactorings that do not apply are reported through
    /// [`Editor::show_error`]; only internal failures are returned as errors.
    pub fn execute(&self, id: &str, editor: &mut dyn Editor) -> Result<Outcome, RefactorError> {
        let refactoring = self
            .get(id)
            .ok_or_else(|| RefactorError::UnknownRefactoring {
                id: id.to_string(),
                suggestion: self.suggest(id).map(str::to_string),
            })?;

        info!(refactoring = id, selection = %editor.selection(), "executing");
        match (refactoring.run)(editor, &self.context) {
            Ok(()) => Ok(Outcome::Applied),
            Err(RefactorError::NoMatch { reason } | RefactorError::PatternInvalid { reason }) => {
                warn!(refactoring = id, %reason, "not applicable");
                editor.show_error(&reason);
                Ok(Outcome::Reported(reason))
            }
            Err(RefactorError::Cancelled) => {
                info!(refactoring = id, "cancelled by user");
                Ok(Outcome::Cancelled)
            }
            Err(error) => Err(error),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RefactorContext::default())
    }
}
