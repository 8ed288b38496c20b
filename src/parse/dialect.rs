//! Dialect detection: decide which CLI family a raw command belongs to.

use super::tokenize::split_first_word;
use super::types::CommandType;
use crate::error::MalformedCommand;

/// Detect the dialect of `raw` and return it with the binary prefix stripped.
///
/// Without a hint the first word must be exactly a registered binary name.
/// With a hint (a handler dedicated to one dialect) the binary prefix is
/// optional, but something must remain once it is stripped.
pub fn detect(
    raw: &str,
    hint: Option<CommandType>,
) -> Result<(CommandType, &str), MalformedCommand> {
    let trimmed = raw.trim();
    let (first, rest) = split_first_word(trimmed);
    if first.is_empty() {
        return Err(MalformedCommand::Empty);
    }

    match hint {
        Some(dialect) => {
            let rest = if first == dialect.binary() { rest } else { trimmed };
            if rest.is_empty() {
                return Err(MalformedCommand::Empty);
            }
            Ok((dialect, rest))
        }
        None => CommandType::from_binary(first)
            .map(|dialect| (dialect, rest))
            .ok_or_else(|| MalformedCommand::UnsupportedBinary {
                binary: first.to_string(),
            }),
    }
}
