pub const HELP: &str = r#"Read documentation about a command.

Usage:
    pydep help [<command>]

Args:
    <command>           any pydep subcommand

Use 'pydep help --list' to see all available commands.
"#;
