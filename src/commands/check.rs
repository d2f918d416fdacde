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

use super::helps::check;
use crate::core::context::Context;
use crate::core::inventory::PackageManager;
use crate::core::pip::Pip;
use crate::error::{Error, LastError};

use cliproc::{cli, proc, stage::*};
use cliproc::{Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Check;

impl Subcommand<Context> for Check {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(check::HELP))?;
        Ok(Check)
    }

    fn execute(self, c: &Context) -> proc::Result {
        let pip = Pip::new()
            .command(c.get_python())
            .verbose(c.is_verbose());
        let problems = pip
            .check()
            .map_err(|e| Error::InventoryUnavailable(LastError(e.to_string())))?;
        match problems.is_empty() {
            true => {
                println!("info: no broken requirements found");
                Ok(())
            }
            false => Err(Error::BrokenRequirements(problems.join("\n")))?,
        }
    }
}
