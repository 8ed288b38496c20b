use crate::error::MalformedCommand;

/// Split off the first whitespace-delimited word. The remainder is left-trimmed.
pub fn split_first_word(command: &str) -> (&str, &str) {
    let command = command.trim_start();
    match command.find(char::is_whitespace) {
        Some(pos) => (&command[..pos], command[pos..].trim_start()),
        None => (command, ""),
    }
}

/// Tokenize a command (binary prefix already removed) into words using shlex.
///
/// Quoted spans become one token with the quotes removed. Shell operators are
/// not structural here: `|`, `;` and `&&` come through as ordinary words.
pub fn tokenize(command: &str) -> Result<Vec<String>, MalformedCommand> {
    shlex::split(command).ok_or(MalformedCommand::UnbalancedQuotes)
}

/// First character a POSIX shell would read as control, redirection,
/// expansion or globbing syntax. Single-quoted text is literal; inside double
/// quotes only `$` and backquotes still expand.
pub fn shell_syntax(command: &str) -> Option<char> {
    let mut chars = command.chars();
    let (mut single, mut double) = (false, false);
    while let Some(c) = chars.next() {
        if single {
            single = c != '\'';
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '$' | '`' => return Some(c),
            '"' => double = !double,
            _ if double => {}
            '\'' => single = true,
            ';' | '&' | '|' | '<' | '>' | '(' | ')' | '{' | '}' | '*' | '?' | '[' | ']'
            | '#' | '~' | '\n' | '\r' => return Some(c),
            _ => {}
        }
    }
    None
}
