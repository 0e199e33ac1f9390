use clap::{Parser as ClapParser, Subcommand};
use fiql_predicate::{
    Schema, VisitorConfig,
    cli::{self, CheckOptions, CheckResult, CliError},
};
use std::{
    io::{self, Read},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "fiql")]
#[command(about = "fiql - Compile FIQL filters into typed predicates and run them against JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a filter and select the matching JSON records
    Check {
        /// The filter expression
        query: String,

        /// JSON file describing the entity model
        #[arg(short, long)]
        schema: PathBuf,

        /// Root entity the filter applies to
        #[arg(short, long)]
        entity: String,

        /// JSON configuration file (allowed_selectors, selector_aliases, always_wildcard)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Allow a selector (repeatable)
        #[arg(short, long = "allow")]
        allow: Vec<String>,

        /// Map an external selector to an attribute path, as external=internal (repeatable)
        #[arg(long = "alias")]
        alias: Vec<String>,

        /// Treat every string equality as a "contains" match
        #[arg(long)]
        always_wildcard: bool,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Only compile and print the predicate
        #[arg(long)]
        compile_only: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'fiql docs' to list categories)
        category: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            schema,
            entity,
            config,
            allow,
            alias,
            always_wildcard,
            input,
            compile_only,
            pretty,
        } => build_options(query, schema, entity, config, allow, alias, always_wildcard, input, compile_only)
            .and_then(|options| run_check(&options, pretty)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn build_options(
    query: String,
    schema: PathBuf,
    entity: String,
    config: Option<PathBuf>,
    allow: Vec<String>,
    alias: Vec<String>,
    always_wildcard: bool,
    input: Option<String>,
    compile_only: bool,
) -> Result<CheckOptions, CliError> {
    let schema = Schema::from_path(schema)?;

    let mut config = match config {
        Some(path) => VisitorConfig::from_path(path)?,
        None => VisitorConfig::default(),
    };
    for selector in allow {
        config = config.allow(selector);
    }
    for arg in alias {
        let (external, internal) = cli::parse_alias(&arg)?;
        config = config.alias(external, internal);
    }
    if always_wildcard {
        config = config.with_always_wildcard(true);
    }

    let input = match input {
        Some(s) => Some(s),
        None if !compile_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    Ok(CheckOptions {
        query,
        schema,
        entity,
        config,
        input,
        compile_only,
    })
}

fn run_check(options: &CheckOptions, pretty: bool) -> Result<(), CliError> {
    match cli::execute_check(options)? {
        CheckResult::Compiled(predicate) => println!("{}", predicate),
        CheckResult::Matched { predicate, records } => {
            eprintln!("{}", predicate);
            let output = serde_json::Value::Array(records);
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
