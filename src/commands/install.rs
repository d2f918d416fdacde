use super::helps::install;
use crate::core::context::Context;
use crate::core::inventory::{InstallError, PackageManager};
use crate::core::pip::Pip;
use crate::core::reconcile::Reconciler;
use crate::core::stdlib;
use crate::error::Error;
use crate::util::prompt::{self, Selection};
use colored::Colorize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Install {
    path: Option<PathBuf>,
    recursive: bool,
    interactive: bool,
    create_venv: bool,
}

impl Subcommand<Context> for Install {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(install::HELP))?;
        Ok(Install {
            recursive: cli.check(Arg::flag("recursive").switch('r'))?,
            interactive: cli.check(Arg::flag("interactive").switch('i'))?,
            create_venv: cli.check(Arg::flag("create-venv"))?,
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let root = self.path.clone().unwrap_or(PathBuf::from("."));
        let python = c.target_python(match self.create_venv {
            true => Some(&root),
            false => None,
        });
        let pip = Pip::new()
            .command(python.get_executable())
            .verbose(c.is_verbose());
        let catalog = stdlib::modules_for(python.get_version());
        let report = Reconciler::new(&catalog, c.get_package_map(), &pip).scan(&root, self.recursive)?;
        report.get_trace().iter().for_each(|t| println!("{}", t));

        if report.is_complete() == true {
            println!("info: nothing to install");
            return Ok(());
        }

        let mut queue = Vec::new();
        for (identifier, provenance) in report.get_missing() {
            // a requirements line may still name a module shipped with python
            if catalog.contains(identifier) == true {
                log::warn!("skipping standard library module {:?}", identifier);
                continue;
            }
            let name = c.get_package_map().resolve(identifier).to_string();
            println!("    {} (from {})", name, provenance);
            queue.push(name);
        }

        let selected = match self.interactive {
            true => Self::select(queue)?,
            false => queue,
        };
        if selected.is_empty() == true {
            println!("info: installation cancelled");
            return Ok(());
        }
        self.run(&pip, selected)
    }
}

impl Install {
    /// Asks which of the `queue` to install.
    fn select(queue: Vec<String>) -> Result<Vec<String>, std::io::Error> {
        Ok(match prompt::prompt_selection()? {
            Selection::All => queue,
            Selection::Nothing => Vec::new(),
            Selection::Individual => {
                let mut chosen = Vec::new();
                for name in queue {
                    if prompt::prompt(&format!("install {}", name))? == true {
                        chosen.push(name);
                    }
                }
                chosen
            }
        })
    }

    fn run(&self, pip: &impl PackageManager, names: Vec<String>) -> proc::Result {
        let total = names.len();
        let mut failures: Vec<(String, InstallError)> = Vec::new();
        for name in names {
            println!("info: installing {} ...", name);
            let result = pip.install(&name);
            println!("    {} ... {}", name, prompt::report_eval(result.is_ok()));
            if let Err(e) = result {
                Self::report_failure(&name, &e);
                failures.push((name, e));
            }
        }
        println!(
            "\ninfo: installed {} of {} dependencies",
            total - failures.len(),
            total
        );
        match failures.len() {
            0 => Ok(()),
            n => Err(Error::InstallFailed(n, total))?,
        }
    }

    fn report_failure(name: &str, err: &InstallError) {
        eprintln!("{}: failed to install {:?}: {}", "error".red().bold(), name, err);
        if let Some(details) = err.details() {
            log::debug!("package manager output:\n{}", details);
        }
        if let Some(hint) = err.hint() {
            eprintln!("{}: {}", "hint".green(), hint);
        }
    }
}
