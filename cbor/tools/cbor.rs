/*!
CBOR Tools - compose CBOR data with the valcbor encoder

# Commands

- `compose`: Convert JSON to CBOR binary (or hex)

# Examples

```bash
# Convert JSON to CBOR
echo '{"name": "Alice", "age": 30}' | cbor compose -o data.cbor -

# Emit hex, with a tagged date/time string
echo '{"@tag": 0, "@value": "2013-03-21T20:04:00Z"}' | cbor compose --format hex -

# Long strings are chunked at 250 bytes by default
cbor compose --chunk-size 64 --format hex big.json
```
*/

use clap::{Parser, Subcommand};

mod compose;

/// A CLI tool for composing CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for composing CBOR data",
    long_about = "CBOR Tools converts JSON documents into CBOR (RFC 8949).\n\n\
                  Features:\n\
                  - Insertion-ordered maps, dense integer-keyed maps become arrays\n\
                  - Tagged values via {\"@tag\": N, \"@value\": V}\n\
                  - Indefinite-length chunking of long strings"
)]
struct Cli {
    /// Logging level: trace, debug, info, warn or error
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert JSON to CBOR binary
    Compose(compose::Command),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(level > tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {e}"))?;

    match cli.command {
        Commands::Compose(args) => args.exec(),
    }
}
