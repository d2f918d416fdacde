pub const HELP: &str = r#"Upgrade a package to its latest version.

A package that is not installed yet is installed.

Usage:
    pydep upgrade <package>

Args:
    <package>           import name or package name to upgrade

Use 'pydep help upgrade' to read more about the command.
"#;
