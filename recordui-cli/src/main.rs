//! `recordui` opens one record collection in the terminal editor and writes
//! the edited collection back out when the editor closes.
//!
//! ```text
//! recordui --kind product --data products.json --in-place
//! recordui --schema invoice.yaml --data - -o -
//! ```

use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, bail, ensure, eyre};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recordui::{
    DocumentFormat, FormatProbe, OutputDestination, OutputOptions, RecordCollection, RecordSchema,
    RecordUI, UiOptions, catalog, emit_collection, guess_document, load_collection,
    parse_record_schema, read_document, shell::SessionContext,
};

const DEFAULT_TEMP_FILE: &str = "/tmp/recordui.json";
const LOG_ENV: &str = "RECORDUI_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "recordui",
    version,
    about = "Edit ERP record collections in an interactive TUI"
)]
struct Cli {
    /// Built-in record kind (employee, product, customer, order, register)
    #[arg(short = 'k', long = "kind", value_name = "KIND", conflicts_with = "schema")]
    kind: Option<String>,

    /// Record schema document: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "schema", value_name = "SPEC")]
    schema: Option<String>,

    /// Existing records: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "data", value_name = "SPEC")]
    data: Option<String>,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Operator name shown in the header
    #[arg(short = 'u', long = "user", value_name = "NAME")]
    user: Option<String>,

    /// Where to write the edited collection ("-" is stdout); repeatable
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DEST",
        num_args = 1..,
        action = ArgAction::Append
    )]
    outputs: Vec<String>,

    /// Write the edited collection back to the --data file
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,

    /// Scratch file used when no destination is given
    #[arg(long = "temp-file", value_name = "PATH")]
    temp_file: Option<PathBuf>,

    /// Skip the scratch file when no destination is given
    #[arg(long = "no-temp-file")]
    no_temp_file: bool,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite existing output files
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Write diagnostics to this file; filter with RECORDUI_LOG (default "info")
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the built-in record kinds and exit
    #[arg(long = "list-kinds")]
    list_kinds: bool,
}

/// A loaded document and the format it turned out to be in.
struct Loaded {
    value: Value,
    format: DocumentFormat,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.list_kinds {
        for kind in catalog::KINDS {
            println!("{kind}");
        }
        return Ok(());
    }
    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    ensure!(
        !(cli.schema.as_deref() == Some("-") && cli.data.as_deref() == Some("-")),
        "--schema and --data cannot both read stdin"
    );
    let schema = resolve_schema(&cli)?;
    let data = cli.data.as_deref().map(|spec| load_input(spec, "data")).transpose()?;
    let data_format = data.as_ref().map(|loaded| loaded.format);
    let collection = match data {
        Some(loaded) => load_collection(loaded.value, &schema)
            .map_err(|err| eyre!("data cannot be loaded: {err:#}"))?,
        None => RecordCollection::new(schema.id_key()),
    };
    let output = output_options(&cli, data_format)?;

    let kind = schema.kind().to_string();
    info!(%kind, records = collection.len(), "opening editor");
    let mut options = UiOptions::default();
    if let Some(title) = cli.title.as_ref() {
        options = options.with_title(title.clone());
    }
    let mut ui = RecordUI::new(schema)
        .with_collection(collection)
        .with_options(options);
    if let Some(user) = cli.user.as_ref() {
        ui = ui.with_session(SessionContext::signed_in(user.clone()));
    }
    let collection = ui.run().map_err(Report::msg)?;

    if let Some(options) = output {
        emit_collection(&kind, &collection, &options).map_err(Report::msg)?;
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install logger: {err}"))
}

fn resolve_schema(cli: &Cli) -> Result<RecordSchema> {
    if let Some(kind) = cli.kind.as_deref() {
        let Some(schema) = catalog::schema_for(kind) else {
            bail!(
                "unknown record kind '{kind}'; expected one of {}",
                catalog::KINDS.join(", ")
            );
        };
        return schema.wrap_err_with(|| format!("built-in '{kind}' schema is invalid"));
    }
    let Some(spec) = cli.schema.as_deref() else {
        bail!("provide --kind or --schema");
    };
    let loaded = load_input(spec, "schema")?;
    parse_record_schema(&loaded.value).map_err(|err| eyre!("invalid schema: {err:#}"))
}

/// Reads `spec` as stdin ("-"), an existing file, or the document text itself.
fn load_input(spec: &str, label: &str) -> Result<Loaded> {
    if spec == "-" {
        let mut contents = String::new();
        io::stdin()
            .read_to_string(&mut contents)
            .wrap_err_with(|| format!("failed to read {label} from stdin"))?;
        return guess(&contents, &format!("{label} from stdin"));
    }
    let path = Path::new(spec);
    if !path.is_file() {
        return guess(spec, &format!("inline {label}"));
    }
    match DocumentFormat::probe(path) {
        FormatProbe::Known(format) => {
            let value = read_document(path, Some(format)).map_err(|err| eyre!("{err:#}"))?;
            Ok(Loaded { value, format })
        }
        FormatProbe::MissingFeature(feature) => {
            bail!("{label} '{spec}' needs {feature} support, which this build lacks")
        }
        FormatProbe::Unknown => {
            let contents = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {label} from {}", path.display()))?;
            guess(&contents, &format!("{label} '{spec}'"))
        }
    }
}

fn guess(contents: &str, what: &str) -> Result<Loaded> {
    let (value, format) =
        guess_document(contents, None).map_err(|err| eyre!("{what}: {err:#}"))?;
    Ok(Loaded { value, format })
}

/// Works out where the edited collection goes. File destinations must agree
/// on one format; stdout follows the data document's format.
fn output_options(
    cli: &Cli,
    data_format: Option<DocumentFormat>,
) -> Result<Option<OutputOptions>> {
    // (destination, may already exist)
    let mut targets: Vec<(String, bool)> = cli
        .outputs
        .iter()
        .map(|target| (target.clone(), cli.force))
        .collect();
    if cli.in_place {
        let data = cli
            .data
            .as_deref()
            .filter(|spec| *spec != "-" && Path::new(spec).is_file())
            .ok_or_else(|| eyre!("--in-place needs --data pointing at an existing file"))?;
        targets.push((data.to_string(), true));
    }
    if targets.is_empty() {
        if cli.no_temp_file {
            return Ok(None);
        }
        let scratch = cli
            .temp_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_FILE));
        targets.push((scratch.to_string_lossy().into_owned(), true));
    }

    let mut destinations = Vec::with_capacity(targets.len());
    let mut file_format: Option<DocumentFormat> = None;
    for (target, overwrite) in targets {
        ensure!(!target.trim().is_empty(), "output destination cannot be empty");
        if target == "-" {
            destinations.push(OutputDestination::Stdout);
            continue;
        }
        let path = PathBuf::from(&target);
        let format = match DocumentFormat::probe(&path) {
            FormatProbe::Known(format) => format,
            FormatProbe::MissingFeature(feature) => bail!(
                "output file {} needs {feature} support, which this build lacks",
                path.display()
            ),
            FormatProbe::Unknown => bail!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            ),
        };
        if let Some(existing) = file_format
            && existing != format
        {
            bail!(
                "output file {} is {format} but other destinations are {existing}",
                path.display()
            );
        }
        ensure!(
            overwrite || !path.exists(),
            "file {} already exists (pass --force to overwrite)",
            path.display()
        );
        file_format = Some(format);
        destinations.push(OutputDestination::File(path));
    }

    let format = file_format.or(data_format).unwrap_or_default();
    Ok(Some(
        OutputOptions::new(format)
            .with_pretty(!cli.no_pretty)
            .with_destinations(destinations),
    ))
}
