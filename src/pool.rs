//! Thread-local parser pooling.
//!
//! Every refactoring invocation parses the buffer at least once (twice when the
//! output is validated), so the parser is created on first use per thread and
//! reused for subsequent parses.

use crate::ts::{JsParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static JS_PARSER: RefCell<Option<JsParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use jsrefactor::pool::with_parser;
///
/// let tree = with_parser(|parser| parser.parse("const a = 1;"))??;
/// assert_eq!(tree.root_node().kind(), "program");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut JsParser) -> R,
{
    JS_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(JsParser::new()?);
        }
        let parser = slot.as_mut().ok_or(TreeSitterError::ParseFailed)?;
        Ok(f(parser))
    })
}
