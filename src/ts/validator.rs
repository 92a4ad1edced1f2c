use crate::ts::errors::TreeSitterError;
use crate::ts::parser::parse;

/// Validate that source code has no syntax errors.
pub fn validate_syntax(source: &str) -> Result<(), TreeSitterError> {
    let parsed = parse(source)?;
    let errors = parsed.error_nodes();
    match errors.as_slice() {
        [] => Ok(()),
        [single] => {
            let start = single.start();
            Err(TreeSitterError::SyntaxError {
                line: start.line + 1,
                column: start.character + 1,
            })
        }
        many => Err(TreeSitterError::MultipleSyntaxErrors { count: many.len() }),
    }
}

/// Check that `after` does not contain more syntax errors than `before`.
///
/// Refactoring output is compared with its input rather than validated in
/// isolation: buffers being edited are often mid-typing and already broken
/// somewhere else.
pub fn introduced_errors(before: &str, after: &str) -> Result<(), TreeSitterError> {
    let original = parse(before)?;
    let original_errors = original.error_nodes().len();

    let patched = parse(after)?;
    let new_errors = patched.error_nodes();

    if new_errors.len() <= original_errors {
        return Ok(());
    }
    match new_errors.len() - original_errors {
        1 => {
            let start = new_errors[0].start();
            Err(TreeSitterError::SyntaxError {
                line: start.line + 1,
                column: start.character + 1,
            })
        }
        n => Err(TreeSitterError::MultipleSyntaxErrors { count: n }),
    }
}
