use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jsonschema_payload_core::{
    compile, generate_example, get_field_schema, validate_with_options, EndpointRef,
    ExampleOptions, FieldLookup, OpenApiDocument, SchemaLookup, SchemaProvider, ValidateOptions,
};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

const NO_FIELD_RULES: &str = "no additional rules available for this field";

#[derive(Parser)]
#[command(name = "jsonschema-payload")]
#[command(about = "Validate API payloads and generate examples from resolved JSON Schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output file (defaults to stdout if not specified)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload and report every violation (exit code 1 when invalid)
    Validate {
        /// Payload file (JSON or YAML)
        payload: PathBuf,

        #[command(flatten)]
        source: SchemaSource,

        /// Max nesting depth the validator descends into
        #[arg(long, default_value_t = ValidateOptions::default().max_depth)]
        max_depth: usize,
    },

    /// Generate an example payload that satisfies the schema
    Example {
        #[command(flatten)]
        source: SchemaSource,

        /// Only emit required properties
        #[arg(long)]
        required_only: bool,

        /// Nesting depth at which objects and arrays collapse to empty placeholders
        #[arg(long, default_value_t = ExampleOptions::default().max_depth)]
        max_depth: usize,
    },

    /// Print the rules for one field, addressed by dot path (e.g. items.0.id)
    Field {
        /// Dot path of the field; empty for the root
        dot_path: String,

        #[command(flatten)]
        source: SchemaSource,
    },
}

/// Where the resolved schema comes from.
#[derive(Args)]
struct SchemaSource {
    /// Resolved JSON Schema file (JSON or YAML)
    #[arg(long, conflicts_with = "openapi", required_unless_present = "openapi")]
    schema: Option<PathBuf>,

    /// Dereferenced OpenAPI 3.x document (JSON or YAML)
    #[arg(long, requires_all = ["path", "method"])]
    openapi: Option<PathBuf>,

    /// Operation path in the OpenAPI document (e.g. /pets/{petId})
    #[arg(long, requires = "openapi")]
    path: Option<String>,

    /// HTTP method of the operation
    #[arg(long, requires = "openapi")]
    method: Option<String>,

    /// Use a response body instead of the request body; optionally the status code
    #[arg(long, requires = "openapi", value_name = "STATUS")]
    response: Option<Option<String>>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let output = cli.output.as_ref();
    match cli.command {
        Commands::Validate {
            payload,
            source,
            max_depth,
        } => {
            let schema = load_schema(&source)?;
            let data = read_document(&payload, "payload")?;

            let result = validate_with_options(&data, &schema, &ValidateOptions { max_depth });
            for warning in &result.warnings {
                tracing::info!(field = %warning.field, kind = ?warning.kind, "{}", warning.suggestion);
            }
            write_json(&result, output, cli.format)?;

            if !result.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Example {
            source,
            required_only,
            max_depth,
        } => {
            let schema = load_schema(&source)?;
            let node = compile(&schema)
                .map_err(|e| anyhow::Error::from(e).context("Schema could not be compiled"))?;

            // All fields set explicitly; clippy enforces exhaustiveness
            let options = ExampleOptions {
                required_only,
                max_depth,
            };
            write_json(&generate_example(&node, &options), output, cli.format)?;
        }
        Commands::Field { dot_path, source } => {
            let schema = load_schema(&source)?;
            let node = compile(&schema)
                .map_err(|e| anyhow::Error::from(e).context("Schema could not be compiled"))?;

            match get_field_schema(&node, &dot_path) {
                FieldLookup::Resolved(field) => write_json(&field.to_value(), output, cli.format)?,
                FieldLookup::Unresolved { at, reason } => {
                    tracing::debug!(%at, ?reason, "field not found in schema");
                    write_text(NO_FIELD_RULES, output)?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve the schema named by `--schema` or `--openapi`.
fn load_schema(source: &SchemaSource) -> Result<Value> {
    if let Some(path) = &source.schema {
        return read_document(path, "schema");
    }
    let Some(openapi) = &source.openapi else {
        bail!("Either --schema or --openapi must be given");
    };
    let (Some(op_path), Some(method)) = (&source.path, &source.method) else {
        bail!("--openapi requires --path and --method");
    };

    let endpoint = match &source.response {
        None => EndpointRef::request(op_path.as_str(), method.as_str()),
        Some(status) => EndpointRef::response(op_path.as_str(), method.as_str(), status.clone()),
    };
    let document = OpenApiDocument::new(read_document(openapi, "OpenAPI document")?);
    match document.lookup(&endpoint) {
        SchemaLookup::Found(schema) => Ok(schema),
        absent => bail!("No schema for {endpoint}: {absent}"),
    }
}

/// Read a JSON or YAML file, chosen by extension.
fn read_document(path: &Path, what: &str) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open {what} file: {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
    }
}

fn open_writer(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    })
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer = open_writer(path)?;

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}

fn write_text(text: &str, path: Option<&PathBuf>) -> Result<()> {
    let mut writer = open_writer(path)?;
    writeln!(writer, "{text}").context("Failed to write output")?;
    writer.flush().context("Failed to flush output")?;
    Ok(())
}
