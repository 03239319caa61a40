//! Command-line entry point for Kafka ACL migration.
//!
//! `iam` translates the IAM policies of one principal, or of every
//! IAM-authenticated client found by discovery, into Confluent Cloud ACLs.
//! `kafka` converts an ACL listing taken from the source cluster.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kcp_acl_migration::{
    load_discovered_clients, load_observed_acls, migrate_kafka_acls, AclMigrationService,
    MigrationConfig, MigrationOutcome, PrincipalSource, StaticPolicySource,
};
use log::debug;

#[derive(Debug, Parser)]
#[command(
    name = "kcp-acls",
    version,
    about = "Migrate source Kafka access control to Confluent Cloud ACLs"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate IAM policies into Kafka ACLs
    Iam(IamArgs),
    /// Convert ACLs listed from the source Kafka cluster
    Kafka(KafkaArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct PrincipalArgs {
    /// IAM role ARN whose policies are translated
    #[arg(long, env = "KCP_ROLE_ARN")]
    role_arn: Option<String>,

    /// IAM user ARN whose policies are translated
    #[arg(long, env = "KCP_USER_ARN")]
    user_arn: Option<String>,

    /// Discovered clients (JSON); every IAM-authenticated principal is translated
    #[arg(long, env = "KCP_STATE_FILE")]
    state_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct IamArgs {
    #[command(flatten)]
    principals: PrincipalArgs,

    /// Read principal policies from a JSON snapshot instead of calling IAM
    #[arg(long)]
    policies_file: Option<PathBuf>,

    /// Directory receiving the Terraform files and the audit report
    #[arg(long, env = "KCP_OUTPUT_DIR", default_value = "acls")]
    output_dir: PathBuf,
}

#[derive(Debug, Args)]
struct KafkaArgs {
    /// ACL listing from the source cluster (JSON)
    #[arg(long)]
    acls_file: PathBuf,

    /// Directory receiving the Terraform files and the audit report
    #[arg(long, env = "KCP_OUTPUT_DIR", default_value = "acls")]
    output_dir: PathBuf,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn principal_source(args: &PrincipalArgs) -> Result<PrincipalSource> {
    if let Some(path) = &args.state_file {
        let clients = load_discovered_clients(path).context("Failed to load discovered clients")?;
        return Ok(PrincipalSource::Discovered(clients));
    }
    args.role_arn
        .clone()
        .or_else(|| args.user_arn.clone())
        .map(PrincipalSource::Explicit)
        .context("One of --role-arn, --user-arn or --state-file is required")
}

async fn run_iam(args: IamArgs) -> Result<MigrationOutcome> {
    let source = principal_source(&args.principals)?;
    let config = MigrationConfig::new(args.output_dir);

    let service = match &args.policies_file {
        Some(path) => {
            debug!("Reading policies from {}", path.display());
            let policies =
                StaticPolicySource::from_file(path).context("Failed to load policy snapshot")?;
            AclMigrationService::new(Box::new(policies), config)
        }
        None => AclMigrationService::with_aws(config).await,
    };

    service
        .migrate_iam_acls(&source)
        .await
        .context("Failed to migrate IAM ACLs")
}

fn run_kafka(args: KafkaArgs) -> Result<MigrationOutcome> {
    let observed = load_observed_acls(&args.acls_file).context("Failed to load Kafka ACLs")?;
    migrate_kafka_acls(&observed, &MigrationConfig::new(args.output_dir))
        .context("Failed to migrate Kafka ACLs")
}

fn print_outcome(outcome: &MigrationOutcome) {
    match outcome {
        MigrationOutcome::Emitted(summary) => {
            println!(
                "Wrote {} ACL entries for {} principals",
                summary.acl_count, summary.principal_count
            );
            for file in &summary.terraform_files {
                println!("  {}", file.display());
            }
            println!("Audit report: {}", summary.report_path.display());
        }
        MigrationOutcome::NoPrincipals => {
            println!("No IAM-authenticated principals found; nothing to migrate");
        }
        MigrationOutcome::NoPermissions => {
            println!("No kafka-cluster permissions found; no files written");
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Iam(args) => run_iam(args).await,
        Command::Kafka(args) => run_kafka(args),
    };

    match result {
        Ok(outcome) => {
            print_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
