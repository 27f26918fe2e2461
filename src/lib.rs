//! blankmill - face-mill blanking program generator
//!
//! Squares the reference edges of rectangular raw stock: a clean-up skim,
//! then zigzag adjustment passes split across two clamp orientations per
//! edge, rendered for a chosen controller dialect.

pub mod ast;
pub mod black_book;
pub mod codegen;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod planner;
pub mod post;
pub mod tool_library;
pub mod validator;

pub use codegen::{assemble, Command, GenerateError, Program};
pub use config::JobConfig;
pub use post::{GCodeOutput, PostProcessor, PostProcessorType};

/// Initialize logging with the default configuration
///
/// Logs go to stderr so a program printed on stdout stays clean.
/// Default level is `info`; `RUST_LOG` target directives are honoured.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Assemble and render a job in one step
pub fn generate(config: &JobConfig, post: PostProcessorType) -> Result<(Program, GCodeOutput), GenerateError> {
    let program = assemble(config)?;
    let output = post.get_processor().render(&program.commands);
    Ok((program, output))
}
