use crate::convert::{run_html_command, run_text_command};
use crate::parse::{run_parse_command, run_render_command};
use crate::stats::{run_stats_command, run_validate_command};
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

///////// Args /////////

#[derive(Clone, Debug, Args)]
pub struct ParseArgs {
    #[arg(help = "File path of the bbcode content to parse")]
    pub file: String,

    #[arg(
        long = "ignore-case",
        help = "Match closing tags against open tags ignoring ascii case",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub ignore_case: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    #[arg(help = "File path of the bbcode content to regenerate")]
    pub file: String,
}

#[derive(Clone, Debug, Args)]
pub struct TextArgs {
    #[arg(help = "File path of the bbcode content to strip")]
    pub file: String,
}

#[derive(Clone, Debug, Args)]
pub struct HtmlArgs {
    #[arg(help = "File path of the bbcode content to convert")]
    pub file: String,
}

#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    #[arg(help = "File path of the bbcode content to measure")]
    pub file: String,

    #[arg(
        long = "json",
        help = "Print statistics in json format",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub json: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    #[arg(help = "File path of the bbcode content to check")]
    pub file: String,
}

///////// Subcommand /////////

#[derive(Clone, Debug, Parser)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    #[command(about = "parse bbcode and dump the node tree")]
    Parse(ParseArgs),

    #[command(about = "parse bbcode and regenerate its source")]
    Render(RenderArgs),

    #[command(about = "extract raw text, all markup stripped")]
    Text(TextArgs),

    #[command(about = "convert bbcode to html")]
    Html(HtmlArgs),

    #[command(about = "produce statistics about bbcode content")]
    Stats(StatsArgs),

    #[command(about = "check matching of opening and closing tags")]
    Validate(ValidateArgs),
}

/// Main entry of all subcommands.
pub async fn run_command_with_args(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse(parse_args) => run_parse_command(parse_args).await,
        Command::Render(render_args) => run_render_command(render_args).await,
        Command::Text(text_args) => run_text_command(text_args).await,
        Command::Html(html_args) => run_html_command(html_args).await,
        Command::Stats(stats_args) => run_stats_command(stats_args).await,
        Command::Validate(validate_args) => run_validate_command(validate_args).await,
    }
}
