use super::helps;
use crate::util::anyerror::AnyError;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Help {
    list: bool,
    topic: Option<Topic>,
}

impl Subcommand<()> for Help {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(cliproc::Help::with(helps::help::HELP))?;
        Ok(Help {
            list: cli.check(Arg::flag("list"))?,
            topic: cli.get(Arg::positional("topic"))?,
        })
    }

    fn execute(self, _: &()) -> proc::Result {
        self.run();
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Topic {
    Scan,
    Install,
    Generate,
    List,
    Add,
    Upgrade,
    Check,
    Tree,
    Help,
}

impl Topic {
    fn list_all() -> String {
        let list = [
            "scan", "install", "generate", "list", "add", "upgrade", "check", "tree", "help",
        ];
        list.into_iter().fold(String::new(), |mut acc, x| {
            acc.push_str(&format!("{}\n", x));
            acc
        })
    }

    /// Transforms the variant to its corresponding help text.
    fn as_help(&self) -> &str {
        use Topic::*;
        match &self {
            Scan => helps::scan::HELP,
            Install => helps::install::HELP,
            Generate => helps::generate::HELP,
            List => helps::list::HELP,
            Add => helps::add::HELP,
            Upgrade => helps::upgrade::HELP,
            Check => helps::check::HELP,
            Tree => helps::tree::HELP,
            Help => helps::help::HELP,
        }
    }
}

impl std::str::FromStr for Topic {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "scan" => Self::Scan,
            "install" => Self::Install,
            "generate" => Self::Generate,
            "list" => Self::List,
            "add" => Self::Add,
            "upgrade" => Self::Upgrade,
            "check" => Self::Check,
            "tree" => Self::Tree,
            "help" => Self::Help,
            _ => return Err(AnyError(format!("topic '{}' not found", s))),
        })
    }
}

impl Help {
    fn run(&self) {
        if self.list == true {
            println!("{}", Topic::list_all());
        } else {
            let contents = match &self.topic {
                Some(t) => t.as_help(),
                None => helps::pydep::HELP,
            };
            println!("{}", contents);
        }
    }
}
