use crate::cli::SyncOptions;
use anyhow::Result;
use t2sc_state::RunConfig;
use t2sc_sync::{identity_of, ConfigTarget, HostDetails, SshConfigTarget};

/// Handle the `list` command: one line per managed Host block.
pub(crate) fn handle_list_command(options: &SyncOptions) -> Result<()> {
    let config = RunConfig::resolve(&options.overrides())?;
    let target = SshConfigTarget::new(config.paths);
    let model = target.read()?;

    let managed: Vec<_> = model.iter().filter(|e| identity_of(e).is_some()).collect();
    if managed.is_empty() {
        println!("No managed hosts in {}", target.location().display());
        return Ok(());
    }
    for entry in managed {
        println!("{}", HostDetails::of(entry));
    }
    Ok(())
}
