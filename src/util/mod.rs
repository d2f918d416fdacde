pub mod anyerror;
pub mod environment;
pub mod filesystem;
pub mod graph;
pub mod prompt;
