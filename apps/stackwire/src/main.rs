//! stackwire - declares the FileProcessor stack.
//!
//! The binary runs one declaration pass and writes the resulting document as
//! JSON. In `declare` mode deferred values stay as references for the
//! orchestration engine to resolve; in `preview` mode they are substituted
//! with synthesized provider values.
//!
//! # Usage
//!
//! ```text
//! STACKWIRE_CONFIG='{"table":"orders","bucket":"uploads","function":"processor"}' stackwire
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STACKWIRE_PROJECT` | `file-processor` | Project name |
//! | `STACKWIRE_STACK` | `dev` | Stack name |
//! | `STACKWIRE_CONFIG_FILE` | *(unset)* | JSON file with stack configuration |
//! | `STACKWIRE_CONFIG` | *(unset)* | Inline JSON configuration, overrides the file |
//! | `STACKWIRE_MODE` | `declare` | `declare` or `preview` |
//! | `STACKWIRE_OUTPUT` | *(stdout)* | Path of the emitted document |
//! | `STACKWIRE_ACCOUNT_ID` | `000000000000` | Account used by `preview` |
//! | `STACKWIRE_REGION` | `us-east-1` | Region used by `preview` |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde_json::Value;
use stackwire_aws::PreviewResolver;
use stackwire_core::{AccountId, AwsRegion, ResourceGraph, StackConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
stackwire - declare the FileProcessor stack

USAGE:
    stackwire [--help]

Required configuration keys (namespaced `<project>:<key>` or bare):
    table, bucket, function

ENVIRONMENT:
    STACKWIRE_PROJECT      project name (default: file-processor)
    STACKWIRE_STACK        stack name (default: dev)
    STACKWIRE_CONFIG_FILE  JSON file with stack configuration
    STACKWIRE_CONFIG       inline JSON configuration, overrides the file
    STACKWIRE_MODE         declare | preview (default: declare)
    STACKWIRE_OUTPUT       output path (default: stdout)
    STACKWIRE_ACCOUNT_ID   preview account id (default: 000000000000)
    STACKWIRE_REGION       preview region (default: us-east-1)
    LOG_LEVEL              log filter (default: info)
    RUST_LOG               fine-grained filter, overrides LOG_LEVEL
";

/// What the emitted document contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    /// Declarations with deferred references.
    #[default]
    Declare,
    /// Declarations with every deferred value substituted.
    Preview,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Declare => "declare",
            Self::Preview => "preview",
        }
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "declare" => Ok(Self::Declare),
            "preview" => Ok(Self::Preview),
            other => anyhow::bail!("invalid STACKWIRE_MODE {other:?}, expected declare or preview"),
        }
    }
}

/// Settings of the binary itself, as opposed to the stack configuration.
#[derive(Debug, Clone)]
struct AppConfig {
    mode: Mode,
    output: Option<PathBuf>,
    account: AccountId,
    region: AwsRegion,
    log_level: String,
}

impl AppConfig {
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = match lookup("STACKWIRE_MODE") {
            Some(raw) => raw.parse()?,
            None => Mode::default(),
        };
        let account = match lookup("STACKWIRE_ACCOUNT_ID") {
            Some(raw) => AccountId::new(raw).context("invalid STACKWIRE_ACCOUNT_ID")?,
            None => AccountId::default(),
        };

        Ok(Self {
            mode,
            output: lookup("STACKWIRE_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            account,
            region: lookup("STACKWIRE_REGION").map_or_else(AwsRegion::default, AwsRegion::new),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
        })
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `LOG_LEVEL`. Logs go to
/// stderr so stdout carries only the document.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Build the document for `mode`.
fn render(graph: &ResourceGraph, app: &AppConfig) -> Result<Value> {
    match app.mode {
        Mode::Declare => serde_json::to_value(graph).context("cannot serialize declarations"),
        Mode::Preview => PreviewResolver::new(graph, app.account.clone(), app.region.clone())
            .render()
            .context("cannot resolve preview"),
    }
}

/// Write `document` to `output`, or stdout when unset.
fn emit(document: &Value, output: Option<&Path>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');

    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    if std::env::args().skip(1).any(|a| a == "--help" || a == "-h") {
        print!("{USAGE}");
        return Ok(());
    }

    let app = AppConfig::from_env()?;
    init_tracing(&app.log_level)?;

    let config = StackConfig::from_env().context("cannot load stack configuration")?;
    let graph = stackwire_fileprocessor::declare(&config)
        .with_context(|| format!("cannot declare stack {}/{}", config.project, config.stack))?;

    let document = render(&graph, &app)?;
    emit(&document, app.output.as_deref())?;

    info!(
        mode = app.mode.as_str(),
        resources = graph.len(),
        output = %app.output.as_deref().map_or_else(|| "stdout".into(), Path::to_string_lossy),
        "stack emitted",
    );
    Ok(())
}
