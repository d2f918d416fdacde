//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use super::helps::scan;
use crate::core::context::Context;
use crate::core::pip::Pip;
use crate::core::reconcile::Reconciler;
use crate::core::report::ScanReport;
use crate::core::stdlib;
use crate::error::{Error, Hint};
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Scan {
    path: Option<PathBuf>,
    recursive: bool,
}

impl Subcommand<Context> for Scan {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(scan::HELP))?;
        Ok(Scan {
            recursive: cli.check(Arg::flag("recursive").switch('r'))?,
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let root = self.path.unwrap_or(PathBuf::from("."));
        let python = c.get_python_context();
        let pip = Pip::new()
            .command(python.get_executable())
            .verbose(c.is_verbose());
        let catalog = stdlib::modules_for(python.get_version());
        let report = Reconciler::new(&catalog, c.get_package_map(), &pip).scan(&root, self.recursive)?;

        report.get_trace().iter().for_each(|t| println!("{}", t));
        Self::summarize(&report, c)?;
        Ok(())
    }
}

impl Scan {
    /// Lists the missing dependencies under their package names.
    ///
    /// Errors when anything is missing.
    pub fn summarize(report: &ScanReport, c: &Context) -> Result<(), Error> {
        if report.is_complete() == true {
            return Ok(());
        }
        println!("\nMissing dependencies:");
        for (identifier, provenance) in report.get_missing() {
            println!(
                "    {} (from {})",
                c.get_package_map().resolve(identifier),
                provenance
            );
        }
        println!();
        Err(Error::MissingDependencies(
            report.get_missing().len(),
            Hint::InstallMissing,
        ))
    }
}
