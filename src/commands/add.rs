use super::helps::add;
use crate::core::context::Context;
use crate::core::inventory::PackageManager;
use crate::core::pip::Pip;
use crate::core::pkgmap::PackageNameMap;
use crate::core::stdlib::{self, StdlibCatalog};
use crate::error::{Error, LastError};
use colored::Colorize;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Add {
    package: String,
    version: Option<String>,
}

impl Subcommand<Context> for Add {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(add::HELP))?;
        Ok(Add {
            version: cli.get(Arg::option("version").value("ver"))?,
            package: cli.require(Arg::positional("package"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let python = c.get_python_context();
        let name = installable(
            c.get_package_map(),
            &stdlib::modules_for(python.get_version()),
            &self.package,
            "install",
        )?;
        let spec = self.to_spec(&name);
        let pip = Pip::new()
            .command(python.get_executable())
            .verbose(c.is_verbose());

        println!("info: installing {} ...", spec);
        match pip.install(&spec) {
            Ok(()) => {
                println!("info: installed {}", spec);
                Ok(())
            }
            Err(e) => {
                if let Some(hint) = e.hint() {
                    eprintln!("{}: {}", "hint".green(), hint);
                }
                Err(Error::PackageInstall(spec, LastError(e.to_string())))?
            }
        }
    }
}

/// Maps `package` to its distribution name, refusing names the standard
/// library provides.
pub fn installable(
    map: &PackageNameMap,
    catalog: &StdlibCatalog,
    package: &str,
    action: &'static str,
) -> Result<String, Error> {
    let name = map.resolve(package);
    match catalog.contains(name) {
        true => Err(Error::StdlibNotInstallable(action, name.to_string())),
        false => Ok(name.to_string()),
    }
}

impl Add {
    /// Formats the requirement to hand to the package manager.
    fn to_spec(&self, name: &str) -> String {
        match &self.version {
            Some(v) => format!("{}=={}", name, v.trim_start_matches("==")),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mapped_name_decides_refusal() {
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin().overlay([("enum", "enum34"), ("myjson", "json")]);
        assert_eq!(
            installable(&map, &catalog, "yaml", "install"),
            Ok(String::from("PyYAML"))
        );
        assert_eq!(
            installable(&map, &catalog, "enum", "install"),
            Ok(String::from("enum34"))
        );
        assert_eq!(
            installable(&map, &catalog, "myjson", "install"),
            Err(Error::StdlibNotInstallable("install", String::from("json")))
        );
        assert_eq!(
            installable(&map, &catalog, "OS", "upgrade"),
            Err(Error::StdlibNotInstallable("upgrade", String::from("OS")))
        );
    }

    #[test]
    fn pinned_spec() {
        let add = Add {
            package: String::from("yaml"),
            version: Some(String::from("6.0.1")),
        };
        assert_eq!(add.to_spec("PyYAML"), "PyYAML==6.0.1");
        let add = Add {
            package: String::from("requests"),
            version: None,
        };
        assert_eq!(add.to_spec("requests"), "requests");
    }
}
