pub const HELP: &str = r#"Install a package.

Usage:
    pydep add [options] <package>

Args:
    <package>           import name or package name to install

Options:
    --version <ver>     exact version to install

Use 'pydep help add' to read more about the command.
"#;
