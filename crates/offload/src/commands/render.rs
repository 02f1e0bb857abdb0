//! `--dry-run`: build every specification and print it instead of submitting

use crate::report::{self, DescriptorReport, Outcome};
use offload_config::DescriptorFile;
use offload_core::{BuildDefaults, ClusterSpecBuilder, EnvironmentDescriptor};

pub fn handle(files: &[DescriptorFile], defaults: &BuildDefaults) -> Vec<DescriptorReport> {
    files
        .iter()
        .map(|file| {
            let report = DescriptorReport::new(file.clone(), render(file, defaults));
            report::print_outcome(&report);
            report
        })
        .collect()
}

fn render(file: &DescriptorFile, defaults: &BuildDefaults) -> anyhow::Result<Outcome> {
    let raw = file.load()?;
    let descriptor = EnvironmentDescriptor::from_mapping(&raw)?;
    let spec = ClusterSpecBuilder::new(&descriptor)
        .defaults(defaults.clone())
        .build()?;

    Ok(Outcome::Rendered {
        cluster_name: spec.cluster_name.to_string(),
        json: spec.to_json()?,
    })
}
