#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// `/file <path>`. Only the first argument is used; `None` when it is missing.
    File { path: Option<String> },
    Exit,
    /// Anything else, including a bare `/`. Handled as a no-op.
    Unrecognized { name: String },
}

pub(crate) fn is_command_line(line: &str) -> bool {
    line.starts_with('/')
}

/// Splits a slash line into a command name and whitespace-separated arguments.
/// Callers check `is_command_line` first; the leading slash is stripped if present.
pub(crate) fn parse_command(line: &str) -> Command {
    let command_text = line.strip_prefix('/').unwrap_or(line);
    let mut parts = command_text.split_whitespace();
    let name = parts.next().unwrap_or("");

    match name {
        "file" => Command::File {
            path: parts.next().map(ToOwned::to_owned),
        },
        "exit" => Command::Exit,
        _ => Command::Unrecognized {
            name: name.to_string(),
        },
    }
}
