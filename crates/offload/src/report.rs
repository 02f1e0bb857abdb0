use colored::Colorize;
use offload_cloud::ClusterResult;
use offload_config::DescriptorFile;

pub enum Outcome {
    Created(ClusterResult),
    Rendered { cluster_name: String, json: String },
    Failed(anyhow::Error),
}

pub struct DescriptorReport {
    pub file: DescriptorFile,
    pub outcome: Outcome,
}

impl DescriptorReport {
    pub fn new(file: DescriptorFile, result: anyhow::Result<Outcome>) -> Self {
        let outcome = result.unwrap_or_else(Outcome::Failed);
        Self { file, outcome }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

pub fn print_outcome(report: &DescriptorReport) {
    let name = report.file.name();
    match &report.outcome {
        Outcome::Created(result) => {
            println!(
                "{} {}",
                "✓".green(),
                format!("Cluster created successfully: {}", result.cluster_name).green()
            );
            if let Some(uuid) = &result.cluster_uuid {
                println!("  uuid: {}", uuid.dimmed());
            }
        }
        Outcome::Rendered { cluster_name, json } => {
            eprintln!("{} {} → {}", "▶".blue(), name.cyan(), cluster_name.bold());
            println!("{}", json);
        }
        Outcome::Failed(err) => {
            eprintln!("{} {}: {:#}", "✗".red(), name.cyan(), err);
        }
    }
}

pub fn print_summary(reports: &[DescriptorReport], total: usize) {
    let failed = reports.iter().filter(|r| r.is_failure()).count();
    let succeeded = reports.len() - failed;
    let skipped = total.saturating_sub(reports.len());

    let mut line = format!("{} succeeded, {} failed", succeeded, failed);
    if skipped > 0 {
        line.push_str(&format!(", {} skipped", skipped));
    }

    eprintln!();
    if failed == 0 {
        eprintln!("{}", line.green());
    } else {
        eprintln!("{}", line.red());
    }
}
