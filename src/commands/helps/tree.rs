pub const HELP: &str = r#"View the dependency graph of the environment.

Usage:
    pydep tree [options]

Options:
    --package <name>    only show the tree of the given package
    --reverse           show what requires each package instead
    --format <fmt>      output format: 'text' or 'json' (default: text)

Use 'pydep help tree' to read more about the command.
"#;
