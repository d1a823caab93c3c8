//! Common name argument parsing

/// Flatten CN arguments into a single list.
///
/// Each argument may hold a comma separated list. Tokens keep the order they
/// were given in, duplicates and empty tokens included; surrounding
/// whitespace is trimmed.
pub fn parse_cns<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .map(str::to_string)
        .collect()
}
