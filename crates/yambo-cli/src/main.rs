//! yambo-submit — configure and submit a YamboCalculation.
//!
//! The tool is a single linear pass: parse the command line, resolve the
//! code and parent-result identifiers through the workflow engine, assemble
//! the submission request, submit it once, print the returned pk. All
//! diagnostics go to standard error; standard output carries exactly the
//! one confirmation line.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use yambo_engine::{DEFAULT_URL, RestEngine};

mod submit;

/// Submit a YamboCalculation to the workflow engine.
#[derive(Debug, Parser)]
#[command(name = "yambo-submit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The yambo (main code) label to use
    #[arg(long)]
    pub yambocode: String,

    /// The p2y (pre-processing code) label to use
    #[arg(long)]
    pub yamboprecode: String,

    /// Pk of the parent calculation whose outputs seed this run
    #[arg(long)]
    pub parent: u64,

    /// Max wall-clock time in seconds
    #[arg(long, default_value_t = 86400)]
    pub time: u64,

    /// Number of machines
    #[arg(long, default_value_t = 1)]
    pub nodes: u32,

    /// MPI processes per machine
    #[arg(long, default_value_t = 1)]
    pub mpi: u32,

    /// Threads per MPI process
    #[arg(long, default_value_t = 1)]
    pub threads: u32,

    /// Queue (PBS) or partition (SLURM) name
    #[arg(long = "queue_name")]
    pub queue_name: Option<String>,

    /// Quality-of-service class
    #[arg(long)]
    pub qos: Option<String>,

    /// Billing account name
    #[arg(long)]
    pub account: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging on stderr; stdout is reserved for the confirmation line.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::var("YAMBO_ENGINE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let token = std::env::var("YAMBO_ENGINE_TOKEN").ok();

    let result = async {
        let engine = RestEngine::new(url, token)
            .map_err(|e| anyhow::anyhow!("Failed to create engine client: {e}"))?;
        submit::execute(&cli, &engine).await
    }
    .await;

    match result {
        Ok(pk) => {
            println!("{}", submit::report_line(pk));
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from([
            "yambo-submit",
            "--yambocode",
            "yambo-5.2@lumi",
            "--yamboprecode",
            "p2y-5.2@lumi",
            "--parent",
            "512",
        ])
        .unwrap();
        assert_eq!(cli.yambocode, "yambo-5.2@lumi");
        assert_eq!(cli.yamboprecode, "p2y-5.2@lumi");
        assert_eq!(cli.parent, 512);
        assert_eq!(cli.time, 86400);
        assert_eq!(cli.nodes, 1);
        assert_eq!(cli.mpi, 1);
        assert_eq!(cli.threads, 1);
        assert!(cli.queue_name.is_none());
        assert!(cli.qos.is_none());
        assert!(cli.account.is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "yambo-submit",
            "--yambocode",
            "yambo@hpc",
            "--yamboprecode",
            "p2y@hpc",
            "--parent",
            "99",
            "--time",
            "3600",
            "--nodes",
            "2",
            "--mpi",
            "4",
            "--threads",
            "2",
            "--queue_name",
            "batch",
            "--qos",
            "normal",
            "--account",
            "project123",
        ])
        .unwrap();
        assert_eq!(cli.time, 3600);
        assert_eq!(cli.nodes, 2);
        assert_eq!(cli.mpi, 4);
        assert_eq!(cli.threads, 2);
        assert_eq!(cli.queue_name.as_deref(), Some("batch"));
        assert_eq!(cli.qos.as_deref(), Some("normal"));
        assert_eq!(cli.account.as_deref(), Some("project123"));
    }

    #[test]
    fn test_parse_missing_parent() {
        let result = Cli::try_parse_from([
            "yambo-submit",
            "--yambocode",
            "yambo@hpc",
            "--yamboprecode",
            "p2y@hpc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_yambocode() {
        let result = Cli::try_parse_from([
            "yambo-submit",
            "--yamboprecode",
            "p2y@hpc",
            "--parent",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_non_integer_parent() {
        let result = Cli::try_parse_from([
            "yambo-submit",
            "--yambocode",
            "yambo@hpc",
            "--yamboprecode",
            "p2y@hpc",
            "--parent",
            "not-a-pk",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_queue_name_uses_underscore() {
        // The flag surface keeps the underscore spelling, not kebab-case.
        let result = Cli::try_parse_from([
            "yambo-submit",
            "--yambocode",
            "a@h",
            "--yamboprecode",
            "b@h",
            "--parent",
            "1",
            "--queue-name",
            "batch",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_verbose_counts() {
        let cli = Cli::try_parse_from([
            "yambo-submit",
            "-vv",
            "--yambocode",
            "a@h",
            "--yamboprecode",
            "b@h",
            "--parent",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
