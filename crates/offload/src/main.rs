mod commands;
mod report;

use clap::Parser;
use colored::Colorize;
use commands::create::RunOptions;
use offload_cloud::WaitConfig;
use offload_cloud_dataproc::{DataprocClient, Gcloud, TokenSource};
use offload_core::BuildDefaults;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "offload", version)]
#[command(
    about = "Provision Kerberized Dataproc clusters that federate with on-prem HDFS",
    long_about = None
)]
struct Cli {
    /// Directory of environment descriptor files (*.yaml, *.yml)
    descriptor_dir: PathBuf,

    /// Print the cluster specifications without contacting Dataproc
    #[arg(long)]
    dry_run: bool,

    /// Seconds to wait for each cluster creation to finish
    #[arg(long, env = "OFFLOAD_TIMEOUT_SECS", default_value_t = 1800)]
    timeout: u64,

    /// Number of descriptors provisioned at the same time
    #[arg(
        long,
        env = "OFFLOAD_CONCURRENCY",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..=32)
    )]
    concurrency: u16,

    /// Stop at the first descriptor that fails
    #[arg(long)]
    fail_fast: bool,

    /// Dataproc image version (default: 2.0.45-debian10)
    #[arg(long, env = "OFFLOAD_IMAGE_VERSION")]
    image_version: Option<String>,

    /// Boot disk size of master and worker nodes in GiB (default: 1024)
    #[arg(long, env = "OFFLOAD_BOOT_DISK_SIZE_GB")]
    boot_disk_size_gb: Option<u32>,

    /// Override the regional Dataproc endpoint
    #[arg(long, env = "OFFLOAD_DATAPROC_ENDPOINT")]
    endpoint: Option<String>,

    /// gcloud account used to mint access tokens
    #[arg(long, env = "OFFLOAD_GCLOUD_ACCOUNT")]
    account: Option<String>,

    /// Attempts at drawing a cluster name that is not taken
    #[arg(long, default_value_t = 5)]
    name_attempts: u32,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn build_defaults(&self) -> BuildDefaults {
        let mut defaults = BuildDefaults::default();
        if let Some(version) = &self.image_version {
            defaults.image_version = version.clone();
        }
        if let Some(size) = self.boot_disk_size_gb {
            defaults.boot_disk_size_gb = size;
        }
        defaults
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            defaults: self.build_defaults(),
            wait: WaitConfig::with_timeout(Duration::from_secs(self.timeout)),
            concurrency: usize::from(self.concurrency),
            fail_fast: self.fail_fast,
            name_attempts: self.name_attempts,
        }
    }

    fn client(&self) -> offload_cloud_dataproc::Result<DataprocClient> {
        let tokens = match &self.account {
            Some(account) => TokenSource::Gcloud(Gcloud::with_account(account)),
            None => TokenSource::from_env(),
        };
        let client = DataprocClient::new(tokens)?;
        Ok(match &self.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint),
            None => client,
        })
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let files = offload_config::discover_descriptors(&cli.descriptor_dir)?;
    if files.is_empty() {
        println!(
            "{}",
            format!(
                "No descriptor files found in {}",
                cli.descriptor_dir.display()
            )
            .yellow()
        );
        return Ok(());
    }

    let reports = if cli.dry_run {
        commands::render::handle(&files, &cli.build_defaults())
    } else {
        let client = cli.client()?;
        commands::create::handle(&files, &client, &cli.run_options()).await
    };

    report::print_summary(&reports, files.len());
    if reports.iter().any(report::DescriptorReport::is_failure) {
        std::process::exit(1);
    }
    Ok(())
}
