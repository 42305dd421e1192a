use clap::Parser;
use passvault::cli::commands;
use passvault::cli::{output, Cli, Commands};
use passvault::errors::VaultError;
use passvault::vault::SearchParams;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Status => commands::status::execute(&cli),
        Commands::Add {
            ref title,
            ref fields,
        } => commands::add::execute(&cli, title, fields),
        Commands::List {
            ref search,
            ref category,
            sort,
            desc,
            limit,
            offset,
        } => {
            let params = SearchParams {
                keyword: search.clone(),
                category: category.clone(),
                sort_by: sort,
                descending: desc,
                limit,
                offset,
            };
            commands::list::execute(&cli, &params)
        }
        Commands::Show { id } => commands::show::execute(&cli, id),
        Commands::Edit {
            id,
            ref title,
            ref fields,
        } => commands::edit::execute(&cli, id, title.as_deref(), fields),
        Commands::Delete { id, force } => commands::delete::execute(&cli, id, force),
        Commands::Generate { ref options } => commands::generate::execute(&cli, options),
        Commands::Export { ref file, force } => commands::export::execute(&cli, file, force),
        Commands::Import { ref file, yes } => commands::import_cmd::execute(&cli, file, yes),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        if matches!(e, VaultError::NotInitialized) {
            output::tip("Run `passvault init` to create a vault.");
        }
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `PASSVAULT_LOG` (default `warn`).
/// `--verbose` forces debug output for this crate.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("passvault=debug")
    } else {
        EnvFilter::try_from_env("PASSVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
