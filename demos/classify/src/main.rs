//! Classify Example
//!
//! Reads one JSON update per line from stdin and prints, for each update, the
//! names of the configured rules it matches.
//!
//! # Configuration
//!
//! Rules come from `sift.toml` (or the file given with `--config`):
//!
//! ```toml
//! bot_username = "mybot"
//!
//! [[rules]]
//! name = "start"
//! kind = "command"
//! names = ["start"]
//!
//! [[rules]]
//! name = "admins"
//! kind = "whitelist"
//! ids = [42]
//!
//! [[rules]]
//! name = "admin_start"
//! kind = "all"
//! rules = ["start", "admins"]
//! ```
//!
//! # Usage
//!
//! ```bash
//! echo '{"update_id":1,"message":{"message_id":1,"text":"/start","from":{"id":42}}}' \
//!     | cargo run --package classify -- --config sift.toml
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use sift::core::Update;
use sift::filters::Filter;
use sift::runtime::config::{ConfigLoader, LogOutput};
use sift::runtime::{LoggingBuilder, RuleSet};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file; searched for in the usual places when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only report whether updates match this rule.
    #[arg(short, long)]
    rule: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    // The configured subscriber does not exist yet, so loading logs to stderr
    let config = LoggingBuilder::new()
        .output(LogOutput::Stderr)
        .scoped(|| loader.load())
        .context("failed to load configuration")?;

    // stdout carries the results
    let mut logging = LoggingBuilder::from_config(&config.logging);
    if config.logging.output == LogOutput::Stdout {
        logging = logging.output(LogOutput::Stderr);
    }
    logging.init();

    let rules = RuleSet::build(&config).context("failed to build rules")?;
    info!(rules = rules.len(), "Rules compiled");

    if let Some(name) = &args.rule
        && rules.get(name).is_none()
    {
        bail!("no rule named {name:?} in the configuration");
    }

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    for (index, line) in stdin.lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let update = match Update::from_json(&line) {
            Ok(update) => update,
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping undecodable update");
                continue;
            }
        };
        debug!(update_id = update.update_id, kind = update.kind.name(), "Decoded update");

        let matched: Vec<&str> = match &args.rule {
            Some(name) => rules
                .get(name)
                .filter(|filter| filter.check(&update))
                .map(|_| name.as_str())
                .into_iter()
                .collect(),
            None => rules.matching(&update).collect(),
        };

        writeln!(stdout, "{}\t{}", update.update_id, matched.join(","))?;
    }

    Ok(())
}
