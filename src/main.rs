use clap::{Parser as ClapParser, Subcommand};
use pql_lang::cli::{self, CliError, CompileOptions, CompileOutcome};
use std::{
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "pql")]
#[command(about = "PQL - compile filter expressions into aggregation pipeline conditions")]
#[command(version)]
struct Cli {
    /// Log compiler decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression in projection mode
    Compile {
        /// The expression to compile (reads from stdin if not provided)
        expression: Option<String>,

        /// Field path holding an array (repeatable)
        #[arg(short, long = "array-field")]
        array_field: Vec<String>,

        /// Field path holding sub-documents (repeatable)
        #[arg(short, long = "complex-field")]
        complex_field: Vec<String>,

        /// JSON field schema; enables schema-aware compilation
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't compile
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'pql docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(io::stderr)
            .init();
    }

    let mut source = None;
    let result = match cli.command {
        Commands::Compile {
            expression,
            array_field,
            complex_field,
            schema,
            pretty,
            syntax_only,
        } => read_expression(expression).and_then(|expression| {
            source = Some(expression.clone());
            let options = CompileOptions {
                expression,
                array_fields: array_field,
                complex_fields: complex_field,
                schema,
                syntax_only,
            };
            run_compile(&options, pretty)
        }),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e.report(source.as_deref()));
        std::process::exit(1);
    }
}

fn read_expression(expression: Option<String>) -> Result<String, CliError> {
    match expression {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            let trimmed = buffer.trim();
            if trimmed.is_empty() {
                Err(CliError::NoInput)
            } else {
                Ok(trimmed.to_string())
            }
        }
        None => Err(CliError::NoInput),
    }
}

fn run_compile(options: &CompileOptions, pretty: bool) -> Result<(), CliError> {
    match cli::execute_compile(options)? {
        CompileOutcome::SyntaxValid => println!("Syntax is valid"),
        CompileOutcome::Fragment(fragment) => {
            let json = if pretty {
                serde_json::to_string_pretty(&fragment)
            } else {
                serde_json::to_string(&fragment)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
