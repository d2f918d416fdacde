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

use super::helps::generate;
use crate::core::context::Context;
use crate::core::pip::Pip;
use crate::core::reconcile::Reconciler;
use crate::core::report;
use crate::core::requirements::REQUIREMENTS_FILE;
use crate::core::stdlib;
use crate::util::filesystem;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Generate {
    path: Option<PathBuf>,
    output: Option<PathBuf>,
    recursive: bool,
    create_venv: bool,
}

impl Subcommand<Context> for Generate {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(generate::HELP))?;
        Ok(Generate {
            recursive: cli.check(Arg::flag("recursive").switch('r'))?,
            create_venv: cli.check(Arg::flag("create-venv"))?,
            output: cli.get(Arg::option("output").value("file"))?,
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let root = self.path.unwrap_or(PathBuf::from("."));
        // the output file is placed relative to the project
        let dest = filesystem::resolve_rel_path(
            &root,
            &self.output.unwrap_or(PathBuf::from(REQUIREMENTS_FILE)),
        );
        let python = c.target_python(match self.create_venv {
            true => Some(&root),
            false => None,
        });
        let pip = Pip::new()
            .command(python.get_executable())
            .verbose(c.is_verbose());
        let catalog = stdlib::modules_for(python.get_version());
        let reconciler = Reconciler::new(&catalog, c.get_package_map(), &pip);

        let manifest = report::generate(&reconciler, &root, self.recursive, &dest)?;
        manifest.get_trace().iter().for_each(|t| println!("{}", t));
        Ok(())
    }
}
