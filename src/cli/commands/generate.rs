//! `passvault generate` — print a random password.
//!
//! Starts from the `[generator]` defaults in `config.toml` and applies
//! the command-line overrides.  Needs no master password.

use crate::cli::{vault_dir, Cli, GenerateArgs};
use crate::config::Settings;
use crate::errors::Result;
use crate::generator::{generate_password, GeneratorOptions};

/// Execute the `generate` command.
pub fn execute(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let settings = Settings::load(&vault_dir(cli)?)?;
    let options = apply_overrides(settings.generator, args);

    let password = generate_password(&options)?;
    println!("{}", password.as_str());

    Ok(())
}

fn apply_overrides(mut options: GeneratorOptions, args: &GenerateArgs) -> GeneratorOptions {
    if let Some(length) = args.length {
        options.length = length;
    }
    options.lowercase &= !args.no_lowercase;
    options.uppercase &= !args.no_uppercase;
    options.numbers &= !args.no_numbers;
    options.symbols &= !args.no_symbols;
    if args.allow_similar {
        options.exclude_similar = false;
    }
    if args.exclude_ambiguous {
        options.exclude_ambiguous = true;
    }
    options
}
