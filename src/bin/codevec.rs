//! codevec - index source trees into a Qdrant collection
//!
//! # Examples
//!
//! ```bash
//! # Create the collection once
//! codevec provision --collection code
//!
//! # Index the current directory
//! OPENAI_API_KEY=... codevec index --qdrant-url http://localhost:6333
//!
//! # Show the effective configuration
//! codevec show-config
//! ```

use clap::Parser;
use codevec::cli::{run, Cli, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "codevec=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Human => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(cli).await {
        codevec::cli::output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
