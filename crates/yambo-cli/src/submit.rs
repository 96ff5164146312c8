//! Options-to-request mapping and the single submission call.

use anyhow::Result;
use console::style;
use tracing::debug;

use yambo_engine::{
    Code, Engine, Pk, RemoteFolder, Resources, SchedulerOptions, YamboCalculation,
};

use crate::Cli;

/// Resolve the collected identifiers, assemble the request, submit it once.
pub async fn execute(cli: &Cli, engine: &dyn Engine) -> Result<Pk> {
    eprintln!(
        "{} Submitting YamboCalculation (yambo: {}, p2y: {}, parent pk: {})",
        style("→").cyan().bold(),
        style(&cli.yambocode).green(),
        style(&cli.yamboprecode).green(),
        style(cli.parent).yellow()
    );

    let code = engine
        .load_code(&cli.yambocode)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve main code: {e}"))?;

    let precode = engine
        .load_code(&cli.yamboprecode)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve pre-processing code: {e}"))?;

    let parent = engine
        .load_node(Pk(cli.parent))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve parent calculation: {e}"))?;
    let parent_folder = parent.remote_folder()?.clone();

    debug!(
        "Resolved entities: yambo pk={}, p2y pk={}, parent folder pk={}",
        code.pk, precode.pk, parent_folder.pk
    );

    let calc = build_calculation(cli, code, precode, parent_folder);

    let pk = engine
        .submit(&calc)
        .await
        .map_err(|e| anyhow::anyhow!("Submit failed: {e}"))?;

    debug!("Engine created process pk={}", pk);

    Ok(pk)
}

/// Pure transcription of the parsed options into a submission request.
pub fn build_calculation(
    cli: &Cli,
    code: Code,
    preprocessing_code: Code,
    parent_folder: RemoteFolder,
) -> YamboCalculation {
    let resources = Resources::new(cli.nodes, cli.mpi, cli.threads);

    let mut options =
        SchedulerOptions::new(cli.time, resources).with_prepend_text(resources.omp_export());

    // Empty scheduler hints count as unset.
    if let Some(queue_name) = cli.queue_name.as_deref().filter(|s| !s.is_empty()) {
        options = options.with_queue_name(queue_name);
    }
    if let Some(qos) = cli.qos.as_deref().filter(|s| !s.is_empty()) {
        options = options.with_qos(qos);
    }
    if let Some(account) = cli.account.as_deref().filter(|s| !s.is_empty()) {
        options = options.with_account(account);
    }

    YamboCalculation::new(code, preprocessing_code, parent_folder, options)
}

/// The one confirmation line written to standard output.
pub fn report_line(pk: Pk) -> String {
    format!("Submitted YamboCalculation; with pk=< {pk} >")
}
