//! Introspection helpers available in every template

use minijinja::value::{Rest, Value};
use minijinja::State;

/// `dump(...)`: debug representation of its arguments
///
/// Without arguments the whole render state (including the context) is
/// dumped. Renders nothing unless the environment is in debug mode.
pub(crate) fn dump(state: &State, args: Rest<Value>) -> String {
    if !state.env().debug() {
        return String::new();
    }
    match &args[..] {
        [] => format!("{state:#?}"),
        [value] => format!("{value:#?}"),
        values => format!("{values:#?}"),
    }
}
