pub const HELP: &str = r#"List the installed packages.

Usage:
    pydep list [options]

Options:
    --outdated          only list packages with a newer release

Use 'pydep help list' to read more about the command.
"#;
