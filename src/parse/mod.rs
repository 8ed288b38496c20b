pub mod dialect;
pub mod namespace;
pub mod tokenize;
pub mod types;

pub use dialect::detect;
pub use namespace::{kubectl_scope, kubectl_scopes};
pub use tokenize::{shell_syntax, split_first_word, tokenize};
pub use types::{CommandType, NamespaceScope, ParsedCommand};
