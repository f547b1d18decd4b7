use clap::Parser;
use candado::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => candado::cli::commands::init::execute(&cli),
        Commands::Add {
            ref name,
            ref user,
            ref memo,
            ref password,
        } => candado::cli::commands::add::execute(
            &cli,
            name,
            user.as_deref(),
            memo.as_deref(),
            password.as_deref(),
        ),
        Commands::Get { ref name } => candado::cli::commands::get::execute(&cli, name),
        Commands::List => candado::cli::commands::list::execute(&cli),
        Commands::Edit {
            ref name,
            ref user,
            ref memo,
            password,
        } => candado::cli::commands::edit::execute(
            &cli,
            name,
            user.as_deref(),
            memo.as_deref(),
            password,
        ),
        Commands::Delete { ref name, force } => {
            candado::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::Export { ref output } => {
            candado::cli::commands::export::execute(&cli, output.as_deref())
        }
        Commands::Import { ref file } => candado::cli::commands::import_cmd::execute(&cli, file),
    };

    if let Err(e) = result {
        candado::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
