use super::add::installable;
use super::helps::upgrade;
use crate::core::context::Context;
use crate::core::inventory::{self, InstallError, PackageInventory, PackageManager};
use crate::core::pip::Pip;
use crate::core::stdlib;
use crate::error::{Error, Hint, LastError};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Upgrade {
    package: String,
}

impl Subcommand<Context> for Upgrade {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(upgrade::HELP))?;
        Ok(Upgrade {
            package: cli.require(Arg::positional("package"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let python = c.get_python_context();
        let name = installable(
            c.get_package_map(),
            &stdlib::modules_for(python.get_version()),
            &self.package,
            "upgrade",
        )?;
        let pip = Pip::new()
            .command(python.get_executable())
            .verbose(c.is_verbose());

        let before = pip
            .installed_version(&name)
            .map_err(|e| Error::InventoryUnavailable(LastError(e.to_string())))?;

        println!("info: upgrading {} ...", name);
        pip.upgrade(&name).map_err(|e| match e {
            InstallError::NoMatchingDistribution(_) => {
                let installed = pip.list(false).unwrap_or_default();
                let names: Vec<&str> = installed.iter().map(|d| d.get_name()).collect();
                Error::PackageNotFound(
                    name.clone(),
                    Hint::ListInstalled(Self::closest(&name, &names)),
                )
            }
            e => {
                if let Some(hint) = e.hint() {
                    log::info!("{}", hint);
                }
                Error::PackageUpgrade(name.clone(), LastError(e.to_string()))
            }
        })?;
        let after = pip.installed_version(&name).ok().flatten();
        println!(
            "info: {}",
            Self::outcome(&name, before.as_deref(), after.as_deref())
        );
        Ok(())
    }
}

impl Upgrade {
    /// Describes what the upgrade changed.
    fn outcome(name: &str, before: Option<&str>, after: Option<&str>) -> String {
        match (before, after) {
            (None, Some(a)) => format!("installed {} {}", name, a),
            (Some(b), Some(a)) if a != b => format!("upgraded {} from {} to {}", name, b, a),
            (Some(b), _) => format!("{} {} is already the latest version", name, b),
            (None, None) => format!("upgraded {}", name),
        }
    }

    /// Finds an installed name that contains (or is contained by) `name` once
    /// both are normalized.
    fn closest(name: &str, bank: &[&str]) -> Option<String> {
        let key = inventory::normalize_name(name);
        if key.is_empty() == true {
            return None;
        }
        bank.iter()
            .find(|b| {
                let other = inventory::normalize_name(b);
                other.contains(&key) || key.contains(&other)
            })
            .map(|b| b.to_string())
    }
}
