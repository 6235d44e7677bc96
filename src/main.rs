use ans_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(ans_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("ANS Processor - Brazilian Health-Insurance Expense Reports");
    println!("==========================================================");
    println!();
    println!("Process the quarterly accounting statements published by the Brazilian");
    println!("health-insurance regulator (ANS) into a validated enriched export and a");
    println!("deterministic per-operator aggregated expense report.");
    println!();
    println!("USAGE:");
    println!("    ans-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run         Process statement files into reports (main command)");
    println!("    fetch       Download the latest statement archives and registry");
    println!("    registry    Inspect the operator registry");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process everything under ./data/raw into ./data/output:");
    println!("    ans-processor run");
    println!();
    println!("    # Process with explicit paths and a rejects export:");
    println!("    ans-processor run --input data/1T2025 --output reports --write-rejects");
    println!();
    println!("    # Download the three newest quarterly archives:");
    println!("    ans-processor fetch --dest data");
    println!();
    println!("    # Search the operator registry:");
    println!("    ans-processor registry -r data/Relatorio_cadop.csv --search \"acme\"");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ans-processor <COMMAND> --help");
}
