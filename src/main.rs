use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use monkey_interpreter as monkey;

use monkey::evaluator::Interpreter;
use monkey::lexer::Lexer;
use monkey::object::Object;

#[derive(ClapParser, Debug)]
#[command(version, about = "Monkey language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses input from a file and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the AST as JSON instead of its canonical string form
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file and prints the resulting value
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Monkey program
    Run { filename: PathBuf },

    /// Starts an interactive session reading from stdin
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    monkey::read_source(&filename).context(format!("Failed to read file {:?}", filename))
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'monkey_interpreter::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("monkey_interpreter::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Prints parse errors the way every subcommand reports them.
fn report_parse_errors(errors: &[String]) {
    for error in errors {
        debug!("Parse debug: {}", error);
        eprintln!("Error: {}", error);
    }
}

fn tokenize(source: &str) {
    let mut tokenized = true;

    for token in Lexer::new(source) {
        match token {
            Ok(token) => {
                println!("{}", token);
            }

            Err(e) => {
                tokenized = false;
                eprintln!("Error: {}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        std::process::exit(65);
    }
}

/// Parse and evaluate `source`, exiting on failure.  Returns the final value.
fn execute(source: &str) -> Object {
    let (program, errors) = monkey::parse(source);

    if !errors.is_empty() {
        report_parse_errors(&errors);
        std::process::exit(65);
    }

    info!("Parsed {} statements", program.statements.len());

    let mut interpreter = Interpreter::new();
    let result = interpreter.interpret(&program);

    if result.is_error() {
        debug!("Runtime debug: {}", result);
        eprintln!("{}", result);
        std::process::exit(70);
    }

    result
}

fn repl() -> Result<()> {
    println!("Welcome to the Monkey programming language!");

    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, ">> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            info!("End of input, leaving REPL");
            return Ok(());
        }

        let (program, errors) = monkey::parse(&line);

        if !errors.is_empty() {
            report_parse_errors(&errors);
            continue;
        }

        let evaluated = interpreter.interpret(&program);
        println!("{}", evaluated.inspect());
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => {
            info!("Running Tokenize subcommand");
            let source = read_file(filename)?;
            tokenize(&source);
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");
            let source = read_file(filename)?;
            let (program, errors) = monkey::parse(&source);

            if !errors.is_empty() {
                report_parse_errors(&errors);
                std::process::exit(65);
            }

            if json {
                let rendered = serde_json::to_string_pretty(&program)
                    .context("Failed to serialize AST")?;
                println!("{}", rendered);
            } else {
                println!("{}", program);
            }
        }

        Commands::Evaluate { filename } => {
            info!("Running Evaluate subcommand");
            let source = read_file(filename)?;
            let result = execute(&source);
            println!("{}", result.inspect());
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");
            let source = read_file(filename)?;
            execute(&source);
            info!("Program executed successfully");
        }

        Commands::Repl => {
            info!("Running Repl subcommand");
            repl()?;
        }
    }

    Ok(())
}
