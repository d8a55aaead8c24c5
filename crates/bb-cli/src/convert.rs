use crate::cmd::{HtmlArgs, TextArgs};
use anyhow::Context;
use tokio::fs;

pub async fn run_text_command(args: TextArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .await
        .context("when reading bbcode file")?;
    println!("{}", bb_simple::extract_text(&content)?);
    Ok(())
}

pub async fn run_html_command(args: HtmlArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .await
        .context("when reading bbcode file")?;
    println!("{}", bb_simple::to_html(&content)?);
    Ok(())
}
