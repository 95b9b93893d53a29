use crate::cli::SyncOptions;
use anyhow::Result;
use t2sc_state::{RunConfig, SyncPaths};
use t2sc_sync::{
    JsonFileSource, SkipReason, SshConfigTarget, SyncOrchestrator, SyncParams, SyncReport,
    TransmitSource, ValidationPolicy,
};

/// Handle the default `sync` command.
pub(crate) fn handle_sync_command(options: &SyncOptions) -> Result<()> {
    let config = RunConfig::resolve(&options.overrides())?;
    tracing::debug!(?config, "resolved configuration");

    let params = SyncParams {
        dry_run: options.dry_run,
        policy: ValidationPolicy::from_strict(config.strict),
        protocol: config.protocol.clone(),
    };
    let target = SshConfigTarget::new(config.paths.clone());
    let report = match &options.file {
        Some(path) => SyncOrchestrator::new(JsonFileSource::new(path), target).sync(&params)?,
        None => SyncOrchestrator::new(TransmitSource::new(), target).sync(&params)?,
    };

    print_report(&report, &config.paths);
    Ok(())
}

fn print_report(report: &SyncReport, paths: &SyncPaths) {
    for reason in &report.skipped {
        if let SkipReason::InvalidRecord { .. } = reason {
            eprintln!("! {}", reason.description());
        }
    }

    for line in report.change_lines() {
        println!("{line}");
    }
    if report.include_added {
        println!(
            "✓ {} Include {} to {}",
            if report.dry_run { "Would add" } else { "Added" },
            paths.include_pattern,
            paths.main_config.display()
        );
    }

    if let Some(preview) = &report.preview {
        println!();
        print!("{preview}");
    }
    println!();
    println!("{}", report.summary);
}
