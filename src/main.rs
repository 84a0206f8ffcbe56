//! Command-line interface for cloze-gen
//!
//! Usage:
//!   cloze-gen [OPTIONS]
//!   cloze-gen run --config cloze.toml -n 5 --order leastUsedAsClozeFirst,alphabetical
//!   cloze-gen config add spanish
//!   cloze-gen config set-current spanish
//!   cloze-gen config set-flashcards-per-word 5
//!   cloze-gen config current output-order
//!
//! Runs use the active profile unless `--config` names a TOML file; flags
//! override either.

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloze_gen::profiles::DEFAULT_PROFILES_DIR;
use cloze_gen::{
    run, ConfigField, GeneratorConfig, OutputOrder, ProfileStore, SelectionStrategy,
};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    name = "cloze-gen",
    version,
    about = "Generates diverse cloze flashcards from a sentence corpus",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Directory holding the configuration profiles.
    #[clap(long, global = true, default_value = DEFAULT_PROFILES_DIR)]
    profiles_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Option<Command>,

    #[clap(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate flashcards (the default when no command is given).
    Run(RunArgs),

    /// Manage configuration profiles.
    Config {
        #[clap(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// List the saved profiles.
    List,
    /// Show the name of the active profile.
    View,
    /// Make a profile the active one.
    SetCurrent { name: String },
    /// Add a profile with the default settings.
    Add { name: String },
    /// Delete a profile.
    Delete {
        name: String,
        /// Also delete the profile's output file.
        #[clap(long)]
        cascade: bool,
    },
    /// Set the sentence file of the active profile.
    SetInputFile { path: PathBuf },
    /// Set the flashcard file of the active profile.
    SetOutputFile { path: PathBuf },
    /// Set the selection strategy of the active profile.
    SetAlgorithm { algorithm: SelectionStrategy },
    /// Set the number of flashcards per word of the active profile.
    SetFlashcardsPerWord { count: usize },
    /// Enable or disable preferring shorter sentences in the active profile.
    SetBenefitShorter {
        #[clap(action = ArgAction::Set)]
        enabled: bool,
    },
    /// Set the output orders of the active profile, most significant first.
    SetOutputOrder {
        #[clap(required = true)]
        orders: Vec<OutputOrder>,
    },
    /// Add a word to bury in the active profile.
    AddBuryWord { word: String },
    /// Remove a word to bury from the active profile.
    RemoveBuryWord { word: String },
    /// Show one setting of the active profile.
    Current {
        #[clap(value_enum)]
        field: ConfigField,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// TOML configuration file, used instead of the active profile.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// Sentence file, one sentence per line.
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// Flashcard JSON file to write.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Flashcard JSON file to read in-use flashcards from (defaults to the output file).
    #[clap(short = 'e', long)]
    existing: Option<PathBuf>,

    /// Ignore any existing flashcards and start fresh.
    #[clap(long)]
    fresh: bool,

    /// Number of flashcards per word.
    #[clap(short = 'n', long)]
    flashcards_per_word: Option<usize>,

    /// Selection strategy: mostDifferent or highestProportionOfNewWords.
    #[clap(short = 'a', long)]
    algorithm: Option<SelectionStrategy>,

    /// Prefer shorter sentences.
    #[clap(long)]
    benefit_shorter: bool,

    /// Comma separated output orders, most significant first.
    #[clap(long)]
    order: Option<String>,

    /// Word to move to the end of the output (repeatable).
    #[clap(long)]
    bury: Vec<String>,

    /// Seed for the random output order.
    #[clap(long)]
    seed: Option<u64>,
}

impl RunArgs {
    /// Load the configuration file or active profile and apply the flags on top
    fn into_config(self, profiles: &ProfileStore) -> Result<GeneratorConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)?,
            None => profiles.load_current()?,
        };

        if let Some(input) = self.input {
            config.input_file = input;
        }
        if let Some(output) = self.output {
            config.output_file = output;
        }
        if let Some(existing) = self.existing {
            config.existing_output_file = Some(existing);
        }
        if self.fresh {
            config.ignore_existing = true;
        }
        if let Some(n) = self.flashcards_per_word {
            config.flashcards_per_word = n;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if self.benefit_shorter {
            config.benefit_shorter_sentences = true;
        }
        if let Some(order) = &self.order {
            config.output_order = OutputOrder::parse_list(order)?;
        }
        if !self.bury.is_empty() {
            config.words_to_bury = self.bury;
        }
        if self.seed.is_some() {
            config.random_seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run_config_command(command: ConfigCommand, profiles: &ProfileStore) -> Result<(), Box<dyn Error>> {
    match command {
        ConfigCommand::List => {
            let current = profiles.current_name()?;
            println!("Available configs:");
            for name in profiles.list()? {
                if name == current {
                    println!("- {} (current)", name);
                } else {
                    println!("- {}", name);
                }
            }
        }
        ConfigCommand::View => println!("{}", profiles.current_name()?),
        ConfigCommand::SetCurrent { name } => profiles.set_current(&name)?,
        ConfigCommand::Add { name } => profiles.add(&name)?,
        ConfigCommand::Delete { name, cascade } => profiles.delete(&name, cascade)?,
        ConfigCommand::SetInputFile { path } => {
            profiles.update_current(|config| config.input_file = path)?;
        }
        ConfigCommand::SetOutputFile { path } => {
            profiles.update_current(|config| config.output_file = path)?;
        }
        ConfigCommand::SetAlgorithm { algorithm } => {
            profiles.update_current(|config| config.algorithm = algorithm)?;
        }
        ConfigCommand::SetFlashcardsPerWord { count } => {
            profiles.update_current(|config| config.flashcards_per_word = count)?;
        }
        ConfigCommand::SetBenefitShorter { enabled } => {
            profiles.update_current(|config| config.benefit_shorter_sentences = enabled)?;
        }
        ConfigCommand::SetOutputOrder { orders } => {
            profiles.update_current(|config| config.output_order = orders)?;
        }
        ConfigCommand::AddBuryWord { word } => {
            profiles.update_current(|config| {
                if !config.add_bury_word(&word) {
                    warn!("'{}' is already buried", word);
                }
            })?;
        }
        ConfigCommand::RemoveBuryWord { word } => {
            profiles.update_current(|config| {
                if !config.remove_bury_word(&word) {
                    warn!("'{}' is not buried", word);
                }
            })?;
        }
        ConfigCommand::Current { field } => {
            println!("{}", profiles.load_current()?.describe(field));
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let profiles = ProfileStore::new(cli.profiles_dir);
    let run_args = match cli.command {
        Some(Command::Config { command }) => return run_config_command(command, &profiles),
        Some(Command::Run(run_args)) => run_args,
        None => cli.run,
    };

    let config = run_args.into_config(&profiles)?;
    let summary = run(&config)?;
    println!("{}", summary);
    Ok(())
}
