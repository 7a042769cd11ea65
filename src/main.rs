use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use platform_load_tester::utils::config::{
    Config, DEFAULT_EMAIL_SUFFIX, DEFAULT_LOADER_SCRIPT, DEFAULT_REPORT_PREFIX,
};
use platform_load_tester::{report, runner};

#[derive(Parser)]
#[command(name = "load-tester")]
#[command(version)]
#[command(about = "Load Test CLI: simulate users signing up, uploading and reading data", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the load test
    #[command(arg_required_else_help = true)]
    Run {
        /// Operator username used to log in to the platform
        #[arg(short, long)]
        username: String,

        /// Operator password
        #[arg(short, long)]
        password: String,

        /// Simultaneous users to simulate load for
        #[arg(short, long, default_value = "5")]
        number: usize,

        /// Number of sequential cycles
        #[arg(short, long, default_value = "1")]
        cycles: u32,

        /// Platform API base URL
        #[arg(long, env = "API_URL")]
        host: String,

        /// Dataset file each simulated user uploads
        #[arg(short, long)]
        file: PathBuf,

        /// Loader script passed to the loader program
        #[arg(long, default_value = DEFAULT_LOADER_SCRIPT)]
        loader: String,

        /// Program that runs the loader script
        #[arg(long, default_value = "node")]
        loader_program: String,

        /// Suffix appended to generated usernames to form their email
        #[arg(long, default_value = DEFAULT_EMAIL_SUFFIX)]
        email_suffix: String,

        /// Output directory for the report
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Report file name prefix
        #[arg(long, default_value = DEFAULT_REPORT_PREFIX)]
        report_prefix: String,

        /// Timeout for each platform request, in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Print the summary of a previously written report
    Summarize {
        /// Path to the report JSON
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            username,
            password,
            number,
            cycles,
            host,
            file,
            loader,
            loader_program,
            email_suffix,
            output,
            report_prefix,
            timeout_secs,
        } => {
            println!("{} Load Test CLI: starting load test ...", "▶".green().bold());
            println!("  Host: {}", host.cyan());
            println!("  Users per cycle: {}", number.to_string().yellow());
            println!("  Cycles: {}", cycles.to_string().yellow());
            println!("  Dataset: {}", file.display().to_string().cyan());

            let config = Config {
                host,
                username,
                password,
                concurrency: number,
                cycles,
                loader_program,
                loader_args: vec![loader],
                source_file: file,
                email_suffix,
                output_dir: output,
                report_prefix,
                request_timeout: Duration::from_secs(timeout_secs),
            };

            let path = runner::run_load_test(&config).await?;
            println!(
                "\n{} Report saved to: {}",
                "📄".to_string().blue(),
                path.display().to_string().cyan()
            );
        }

        Commands::Summarize { path } => {
            println!(
                "{} Summarizing report: {}",
                "📊".to_string().blue(),
                path.display()
            );
            report::summarize(&path)?;
        }
    }

    Ok(())
}
