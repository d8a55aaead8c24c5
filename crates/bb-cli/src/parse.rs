use crate::cmd::{ParseArgs, RenderArgs};
use anyhow::Context;
use bb_tree::{Document, ParseOptions};
use tokio::fs;

pub async fn run_parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .await
        .context("when reading bbcode file")?;
    let options = ParseOptions {
        case_insensitive_tags: args.ignore_case,
    };
    let doc = Document::load_with(&content, options)?;
    print!("{}", doc.print_tree());
    Ok(())
}

pub async fn run_render_command(args: RenderArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .await
        .context("when reading bbcode file")?;
    let doc = Document::load(&content)?;
    println!("{}", doc.reconstruct(doc.root()));
    Ok(())
}
