use std::path::PathBuf;

use crate::cli::commands::ValidateArgs;
use crate::config;
use crate::errors::DefensisError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), DefensisError> {
    let path = PathBuf::from(&args.path);
    let config = config::parse_config(&path).await?;
    let plan = config.scan_plan(None)?;
    println!(
        "Configuration is valid: {} ({} phases, {} findings, {:.1}s simulated)",
        args.path,
        plan.phases().len(),
        plan.findings().len(),
        plan.total_duration().as_secs_f64()
    );
    Ok(())
}
