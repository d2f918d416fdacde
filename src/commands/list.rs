use super::helps::list;
use crate::core::context::Context;
use crate::core::inventory::PackageManager;
use crate::core::pip::Pip;
use crate::error::{Error, LastError};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct List {
    outdated: bool,
}

impl Subcommand<Context> for List {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(list::HELP))?;
        Ok(List {
            outdated: cli.check(Arg::flag("outdated"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let pip = Pip::new()
            .command(c.get_python())
            .verbose(c.is_verbose());
        let mut dists = pip
            .list(self.outdated)
            .map_err(|e| Error::InventoryUnavailable(LastError(e.to_string())))?;
        dists.sort_by_key(|d| d.get_name().to_lowercase());

        match (dists.is_empty(), self.outdated) {
            (true, true) => println!("info: all packages are up to date"),
            (true, false) => println!("info: no packages are installed"),
            (false, _) => dists.iter().for_each(|d| println!("{}", d)),
        }
        Ok(())
    }
}
