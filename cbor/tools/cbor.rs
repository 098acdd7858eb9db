/*!
cbor - inspect and build CBOR from the command line

# Commands

- `inspect`: print CBOR as diagnostic notation, JSON or hex
- `compose`: build CBOR from diagnostic notation, JSON or hex

# Examples

```bash
# Diagnostic notation, lossless
cbor inspect data.cbor

# Look inside byte strings that hold CBOR
cbor inspect -e data.cbor

# Show wide integers as 2(h'..') and 3(h'..')
cbor inspect --raw-bignums data.cbor

# JSON, lossy
cbor inspect --format json data.cbor

echo '[1, 2, h'"'"'deadbeef'"'"']' | cbor compose -o data.cbor
echo '{"name": "Alice", "age": 30}' | cbor compose --format json -o data.cbor

# Round trip
cbor inspect data.cbor | cbor compose | cbor inspect
```
*/

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod cdn;
mod compose;
mod inspect;
mod io;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and building CBOR data",
    long_about = "Works with CBOR (RFC 7049) data.\n\n\
                  CBOR can be printed as diagnostic notation, JSON or hex, and built\n\
                  from any of those. Diagnostic notation round-trips losslessly,\n\
                  including tags and indefinite-length containers."
)]
struct Cli {
    /// Log level written to stderr: off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode CBOR and print it
    Inspect(inspect::Command),

    /// Encode text as CBOR
    Compose(compose::Command),
}

fn init_logger(log_level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .with_target(log_level > LevelFilter::from_level(tracing::Level::INFO))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
