// entry program
pub mod pydep;

// commands
mod add;
mod check;
mod generate;
mod help;
mod install;
mod list;
mod scan;
mod tree;
mod upgrade;

// informational content for help about commands
mod helps;
