// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load the optional config file
// 3. Load the document (file, stdin or URL)
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 1 = no links / empty input, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;          // src/cli.rs - command-line parsing
mod config;       // src/config.rs - optional TOML settings
mod interactive;  // src/interactive.rs - line-oriented editing session
mod links;        // src/links/ - extraction, decomposition and recomposition
mod report;       // src/report.rs - table rendering
mod session;      // src/session.rs - one document and its links
mod source;       // src/source/ - reading the document

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::time::Duration;

use cli::{Cli, Commands, InputArgs, RewriteArgs};
use config::Settings;
use links::LinkError;
use session::Session;
use source::DocumentSource;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // No links / empty input are user-facing outcomes, not crashes
            match e.downcast_ref::<LinkError>() {
                Some(link_error @ (LinkError::EmptyInput | LinkError::NoLinksFound)) => {
                    eprintln!("❌ {}", link_error);
                    1
                }
                _ => {
                    eprintln!("Error: {:#}", e);
                    2
                }
            }
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { source, json } => handle_extract(settings, &source, json).await,
        Commands::Rewrite {
            source,
            edits,
            output,
        } => handle_rewrite(settings, &source, &edits, output.as_deref()).await,
        Commands::Edit { source } => handle_edit(settings, &source).await,
    }
}

// RUST_LOG wins over -v; otherwise warnings only, or debug with -v
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

async fn load_session(settings: Settings, args: &InputArgs) -> Result<Session> {
    let source = DocumentSource::from_args(args.input.as_deref(), args.url.as_deref());
    let timeout = Duration::from_secs(settings.fetch_timeout_secs);
    info!("loading document from {:?}", source);

    let content = source::load_document(&source, timeout).await?;

    let mut session = Session::new(settings);
    session.load(content);
    session.extract()?;
    Ok(session)
}

// Handles the 'extract' subcommand
async fn handle_extract(settings: Settings, args: &InputArgs, json: bool) -> Result<i32> {
    let session = load_session(settings, args).await?;

    if json {
        let json_output = serde_json::to_string_pretty(session.links())?;
        println!("{}", json_output);
    } else {
        print!("{}", report::format_links(session.links()));
        if let Some(params) = session.params() {
            println!("\n🔧 Deep-link parameters (from the first deep link):");
            print!("{}", report::format_params(params));
        }
    }

    Ok(0)
}

// Handles the 'rewrite' subcommand
async fn handle_rewrite(
    mut settings: Settings,
    args: &InputArgs,
    edits: &RewriteArgs,
    output: Option<&std::path::Path>,
) -> Result<i32> {
    settings.replace_strategy = edits.strategy(settings.replace_strategy);

    let mut session = load_session(settings, args).await?;
    edits.apply_to(&mut session)?;

    let updated = session.updated_content();
    match output {
        Some(path) => {
            std::fs::write(path, &updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Updated document written to {}", path.display());
        }
        None => print!("{}", updated),
    }

    Ok(0)
}

// Handles the 'edit' subcommand
async fn handle_edit(settings: Settings, args: &InputArgs) -> Result<i32> {
    // stdin is the command channel, so the document has to come from elsewhere
    if DocumentSource::from_args(args.input.as_deref(), args.url.as_deref())
        == DocumentSource::Stdin
    {
        anyhow::bail!("edit needs a document file or --url; stdin is used for commands");
    }

    let mut session = load_session(settings, args).await?;
    println!("🔗 Successfully extracted {} links.", session.links().len());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    interactive::run(&mut session, stdin.lock(), stdout.lock())?;

    Ok(0)
}
