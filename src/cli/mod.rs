pub mod cli;
pub mod prompt;
pub mod run;
pub mod ui;

pub use cli::Cli;
pub use prompt::SelectPrompt;
pub use run::execute as run;
