use super::helps::pydep;
use crate::core::config::CONFIG_FILE;
use crate::core::context::Context;
use crate::util::anyerror::AnyError;
use crate::util::environment::{self, Environment};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help, Subcommand};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ColorMode {
    Always,
    Never,
    Auto,
}

impl std::str::FromStr for ColorMode {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            _ => Err(AnyError(format!(
                "color mode must be 'auto', 'always', or 'never'"
            ))),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Pydep {
    version: bool,
    verbose: bool,
    color: Option<ColorMode>,
    python: Option<String>,
    package_map: Option<PathBuf>,
    command: Option<PydepSubcommand>,
}

impl Command for Pydep {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(pydep::HELP))?;
        Ok(Pydep {
            version: cli.check(Arg::flag("version"))?,
            verbose: cli.check(Arg::flag("verbose"))?,
            color: cli.get(Arg::option("color").value("when"))?,
            python: cli.get(Arg::option("python").value("exe"))?,
            package_map: cli.get(Arg::option("package-map").value("file"))?,
            command: cli.nest(Arg::subcommand("command"))?,
        })
    }

    fn execute(self) -> proc::Result {
        // need to set this coloring mode ASAP
        match self.color.unwrap_or(ColorMode::Auto) {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {
                if Environment::read(environment::NO_COLOR).is_some() {
                    colored::control::set_override(false);
                }
            }
        }
        Self::init_logger(self.verbose);

        // prioritize version information
        if self.version == true {
            println!("pydep {}", VERSION);
            return Ok(());
        }
        match self.command {
            Some(PydepSubcommand::Help(h)) => h.execute(&()),
            Some(c) => {
                let context = Context::new()
                    .retain_options(self.verbose)
                    .home(environment::PYDEP_HOME)?
                    .settings(CONFIG_FILE)?
                    .python(self.python.as_deref(), environment::PYDEP_PYTHON)
                    .package_map(self.package_map.as_deref())
                    .resolve_python();
                println!("info: using {}", context.get_python_context());
                c.execute(&context)
            }
            // if no command is given then print default help
            None => {
                println!("{}", pydep::HELP);
                Ok(())
            }
        }
    }
}

impl Pydep {
    /// Sends log records to stderr as `<level>: <message>`.
    ///
    /// The level comes from the `PYDEP_LOG` environment variable (default:
    /// warn); `--verbose` shows this crate's debug records.
    fn init_logger(verbose: bool) {
        let mut builder = env_logger::Builder::from_env(
            env_logger::Env::new().filter_or(environment::PYDEP_LOG, "warn"),
        );
        if verbose == true {
            builder.filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug);
        }
        builder
            .format(|buf, record| {
                let label = match record.level() {
                    log::Level::Error => "error".red().bold(),
                    log::Level::Warn => "warning".yellow().bold(),
                    log::Level::Info => "info".normal(),
                    log::Level::Debug | log::Level::Trace => "debug".dimmed(),
                };
                writeln!(buf, "{}: {}", label, record.args())
            })
            .target(env_logger::Target::Stderr);
        // a logger may already be installed when running inside tests
        let _ = builder.try_init();
    }
}

use super::add::Add;
use super::check::Check;
use super::generate::Generate;
use super::help::Help as HelpCommand;
use super::install::Install;
use super::list::List;
use super::scan::Scan;
use super::tree::Tree;
use super::upgrade::Upgrade;

#[derive(Debug, PartialEq)]
enum PydepSubcommand {
    Help(HelpCommand),
    Scan(Scan),
    Install(Install),
    Generate(Generate),
    List(List),
    Add(Add),
    Upgrade(Upgrade),
    Check(Check),
    Tree(Tree),
}

impl Subcommand<Context> for PydepSubcommand {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        match cli
            .select(&[
                "help", "scan", "install", "generate", "list", "add", "upgrade", "check", "tree",
            ])?
            .as_ref()
        {
            "help" => Ok(PydepSubcommand::Help(HelpCommand::interpret(cli)?)),
            "scan" => Ok(PydepSubcommand::Scan(Scan::interpret(cli)?)),
            "install" => Ok(PydepSubcommand::Install(Install::interpret(cli)?)),
            "generate" => Ok(PydepSubcommand::Generate(Generate::interpret(cli)?)),
            "list" => Ok(PydepSubcommand::List(List::interpret(cli)?)),
            "add" => Ok(PydepSubcommand::Add(Add::interpret(cli)?)),
            "upgrade" => Ok(PydepSubcommand::Upgrade(Upgrade::interpret(cli)?)),
            "check" => Ok(PydepSubcommand::Check(Check::interpret(cli)?)),
            "tree" => Ok(PydepSubcommand::Tree(Tree::interpret(cli)?)),
            _ => panic!("an unimplemented command was passed through!"),
        }
    }

    fn execute(self, context: &Context) -> proc::Result {
        match self {
            PydepSubcommand::Help(c) => c.execute(&()),
            PydepSubcommand::Scan(c) => c.execute(context),
            PydepSubcommand::Install(c) => c.execute(context),
            PydepSubcommand::Generate(c) => c.execute(context),
            PydepSubcommand::List(c) => c.execute(context),
            PydepSubcommand::Add(c) => c.execute(context),
            PydepSubcommand::Upgrade(c) => c.execute(context),
            PydepSubcommand::Check(c) => c.execute(context),
            PydepSubcommand::Tree(c) => c.execute(context),
        }
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn color_modes() {
        assert_eq!(ColorMode::from_str("always").unwrap(), ColorMode::Always);
        assert_eq!(ColorMode::from_str("never").unwrap(), ColorMode::Never);
        assert_eq!(ColorMode::from_str("auto").unwrap(), ColorMode::Auto);
        assert_eq!(ColorMode::from_str("sometimes").is_err(), true);
    }
}
