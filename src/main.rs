//! blankmill CLI - turn a blanking job into a machine program

use anyhow::{Context, Result};
use ariadne::{Label, Report, ReportKind, Source};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use blankmill::black_book::BlackBook;
use blankmill::config::{self, JobConfig};
use blankmill::parser::{parse_source, ParseError};
use blankmill::tool_library::{default_tool_library, ToolLibrary};
use blankmill::PostProcessorType;

#[derive(Parser)]
#[command(name = "blankmill")]
#[command(about = "Generate face-mill blanking programs for rectangular stock", long_about = None)]
struct Cli {
    /// Job file: a `.blank` job description or a `.json` configuration record
    input: PathBuf,

    /// Output file (default: input with a `.nc` extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Controller dialect
    #[arg(long, value_enum, default_value_t = PostProcessorType::Generic)]
    post: PostProcessorType,

    /// JSON tool library used to resolve `tool N "ID"` statements
    #[arg(long)]
    tools: Option<PathBuf>,

    /// Log the per-edge pass summary
    #[arg(long)]
    debug: bool,

    /// Print the program instead of writing a file
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    blankmill::init_logging()?;

    let mut config = load_config(&cli)?;
    config.debug |= cli.debug;

    let post = cli.post.get_processor();
    let program = blankmill::assemble(&config)?;
    let output = post.render(&program.commands);
    let text = format!("{}\n", output);

    if cli.stdout {
        print!("{}", text);
    } else {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| cli.input.with_extension("nc"));
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        info!(
            path = %path.display(),
            lines = output.lines.len(),
            commands = program.commands.len(),
            post = post.name(),
            "wrote program"
        );
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<JobConfig> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let is_json = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        return JobConfig::from_json(&source)
            .with_context(|| format!("decoding {}", cli.input.display()));
    }

    let job = match parse_source(&source) {
        Ok(job) => job,
        Err(err) => {
            report_parse_error(&cli.input, &source, &err)?;
            anyhow::bail!("failed to parse {}", cli.input.display());
        }
    };

    let tools = match &cli.tools {
        Some(path) => ToolLibrary::from_file(path)?,
        None => default_tool_library(),
    };

    Ok(config::build(&job, &BlackBook::new(), &tools)?)
}

fn report_parse_error(path: &Path, source: &str, err: &ParseError) -> Result<()> {
    let name = path.display().to_string();
    let span = err.span();
    Report::build(ReportKind::Error, name.as_str(), span.start)
        .with_message("invalid job description")
        .with_label(Label::new((name.as_str(), span)).with_message(err.to_string()))
        .finish()
        .eprint((name.as_str(), Source::from(source)))?;
    Ok(())
}
