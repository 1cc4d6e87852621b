use clap::Parser;
use tracing_subscriber::EnvFilter;

/// A small interactive shell.
#[derive(Parser, Debug)]
#[command(name = "lsh", version, about)]
struct Cli {
    /// Text printed before each command is read
    #[arg(long, default_value = lsh::DEFAULT_PROMPT)]
    prompt: String,

    /// Read stdin as a plain byte stream even when it is a terminal
    #[arg(long)]
    plain: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with command output (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = lsh::Config {
        prompt: cli.prompt,
        editor: !cli.plain,
    };

    lsh::repl(&config)
}
