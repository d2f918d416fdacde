use super::helps::tree;
use crate::core::context::Context;
use crate::core::depgraph::DependencyGraph;
use crate::core::pip::Pip;
use crate::error::{Error, Hint, LastError};
use crate::util::anyerror::AnyError;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
enum TreeFormat {
    Text,
    Json,
}

impl std::str::FromStr for TreeFormat {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(AnyError(format!("format must either be 'text' or 'json'"))),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Tree {
    package: Option<String>,
    reverse: bool,
    format: Option<TreeFormat>,
}

impl Subcommand<Context> for Tree {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(tree::HELP))?;
        Ok(Tree {
            reverse: cli.check(Arg::flag("reverse"))?,
            package: cli.get(Arg::option("package").value("name"))?,
            format: cli.get(Arg::option("format").value("fmt"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let pip = Pip::new()
            .command(c.get_python())
            .verbose(c.is_verbose());
        let graph = DependencyGraph::from_manager(&pip)
            .map_err(|e| Error::InventoryUnavailable(LastError(e.to_string())))?;

        let roots = match graph.roots(self.package.as_deref(), self.reverse) {
            Some(r) => r,
            None => {
                return Err(Error::PackageNotFound(
                    self.package.unwrap_or_default(),
                    Hint::ListInstalled(None),
                ))?
            }
        };
        match self.format.unwrap_or(TreeFormat::Text) {
            TreeFormat::Text => graph
                .render_text(&roots, self.reverse)
                .iter()
                .for_each(|l| println!("{}", l)),
            TreeFormat::Json => println!("{}", graph.render_json(&roots, self.reverse)?),
        }
        Ok(())
    }
}
