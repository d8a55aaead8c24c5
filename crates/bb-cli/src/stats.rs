use crate::cmd::{StatsArgs, ValidateArgs};
use anyhow::{bail, Context};
use tokio::fs;

pub async fn run_stats_command(args: StatsArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .await
        .context("when reading bbcode file")?;
    let stats = bb_simple::stats(&content)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats:#?}");
    }
    Ok(())
}

pub async fn run_validate_command(args: ValidateArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .await
        .context("when reading bbcode file")?;
    let issues = bb_simple::validate(&content)?;
    if issues.is_empty() {
        println!("OK");
        return Ok(());
    }
    for issue in &issues {
        println!("{}: {} at offset {}", issue.kind, issue.name, issue.offset);
    }
    bail!("found {} issue(s)", issues.len())
}
