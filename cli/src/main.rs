use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lilyflower_catalog::{CatalogBuilder, CatalogFile, ElementDefinition};
use lilyflower_core::{
    Arguments, Category, Comment, Document, Element, LeafValue, MarkupText, PairToggle, Pitch,
    SchemaRegistry, SchemaRule, Tone, describe,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEMO_VERSION: &str = "2.24.0";

/// Output format for listings and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "lilyflower")]
#[command(about = "Browse, check and export LilyPond element catalogs")]
struct Cli {
    #[command(flatten)]
    catalogs: CatalogArgs,
    /// Output format.
    #[arg(long, global = true, default_value = "table")]
    format: CliOutputFormat,
    /// Log debug records to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Extra catalog file, registered after the built-in table (repeatable).
    #[arg(long = "catalog", global = true)]
    catalogs: Vec<PathBuf>,
    /// Leave out the built-in table.
    #[arg(long, global = true)]
    no_builtin: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the registered elements.
    List(ListArgs),
    /// Print the help page of one element.
    Describe(DescribeArgs),
    /// Validate catalog files against the configured registry.
    Check(CheckArgs),
    /// Write the configured registry as one catalog file.
    Export(ExportArgs),
    /// Render a small demonstration score from the configured registry.
    Demo,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only elements carrying this category (e.g. markup, music).
    #[arg(long)]
    category: Option<String>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Element name (e.g. with_color).
    name: String,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Catalog files to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Output path (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    files: usize,
    elements: usize,
    total: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::List(args) => run_list(&cli.catalogs, args, cli.format),
        Command::Describe(args) => run_describe(&cli.catalogs, args, cli.format),
        Command::Check(args) => run_check(&cli.catalogs, args, cli.format),
        Command::Export(args) => run_export(&cli.catalogs, args, cli.format),
        Command::Demo => run_demo(&cli.catalogs),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_list(catalogs: &CatalogArgs, args: ListArgs, format: CliOutputFormat) -> Result<(), String> {
    let registry = build_registry(catalogs)?;
    let category = args
        .category
        .map(|label| label.parse::<Category>().map_err(|e| e.to_string()))
        .transpose()?;

    let rules: Vec<&SchemaRule> = registry
        .iter()
        .map(|rule| rule.as_ref())
        .filter(|rule| category.is_none_or(|c| rule.categories.contains(c)))
        .collect();

    match format {
        CliOutputFormat::Table => print!("{}", format_table(&rules)),
        CliOutputFormat::Json | CliOutputFormat::Yaml => {
            let definitions: Vec<ElementDefinition> =
                rules.iter().map(|rule| ElementDefinition::from_rule(rule)).collect();
            println!("{}", serialize(&definitions, format)?);
        }
    }
    Ok(())
}

fn run_describe(
    catalogs: &CatalogArgs,
    args: DescribeArgs,
    format: CliOutputFormat,
) -> Result<(), String> {
    let registry = build_registry(catalogs)?;
    let rule = registry.lookup(&args.name).map_err(|e| e.to_string())?;
    match format {
        CliOutputFormat::Table => print!("{}", describe(rule)),
        CliOutputFormat::Json | CliOutputFormat::Yaml => {
            println!("{}", serialize(&ElementDefinition::from_rule(rule), format)?);
        }
    }
    Ok(())
}

fn run_check(
    catalogs: &CatalogArgs,
    args: CheckArgs,
    format: CliOutputFormat,
) -> Result<(), String> {
    let mut registry = build_registry(catalogs)?;
    let mut elements = 0;
    for path in &args.inputs {
        let origin = path.display().to_string();
        let catalog =
            CatalogFile::load(path).map_err(|e| format!("Failed to load '{origin}': {e}"))?;
        elements += catalog
            .register_into(&mut registry, &origin)
            .map_err(|e| e.to_string())?;
        debug!(file = %origin, "Checked catalog");
    }

    let report = CheckReport {
        files: args.inputs.len(),
        elements,
        total: registry.len(),
    };
    match format {
        CliOutputFormat::Table => println!(
            "Checked {} catalog file(s) defining {} element(s); {} element(s) registered in total.",
            report.files, report.elements, report.total
        ),
        CliOutputFormat::Json | CliOutputFormat::Yaml => {
            println!("{}", serialize(&report, format)?);
        }
    }
    Ok(())
}

fn run_export(
    catalogs: &CatalogArgs,
    args: ExportArgs,
    format: CliOutputFormat,
) -> Result<(), String> {
    let registry = build_registry(catalogs)?;
    let catalog = CatalogFile::from_registry(&registry);
    let raw = match format {
        CliOutputFormat::Json => serialize(&catalog, CliOutputFormat::Json)?,
        CliOutputFormat::Table | CliOutputFormat::Yaml => {
            serialize(&catalog, CliOutputFormat::Yaml)?
        }
    };

    let Some(output) = args.output else {
        print!("{raw}");
        return Ok(());
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!("Failed to create output directory '{}': {err}", parent.display())
            })?;
        }
    }
    fs::write(&output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", output.display()))?;
    println!(
        "Exported {} element(s) to '{}'.",
        catalog.elements.len(),
        output.display()
    );
    Ok(())
}

fn run_demo(catalogs: &CatalogArgs) -> Result<(), String> {
    let registry = build_registry(catalogs)?;
    let document = demo_document(&registry).map_err(|e| e.to_string())?;
    print!("{}", document.render());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_registry(catalogs: &CatalogArgs) -> Result<SchemaRegistry, String> {
    let mut builder = CatalogBuilder::new();
    if catalogs.no_builtin {
        builder = builder.without_builtin();
    }
    for path in &catalogs.catalogs {
        builder = builder.with_file(path);
    }
    builder.build().map_err(|e| e.to_string())
}

/// Serializes `value` as pretty JSON or YAML.
fn serialize<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Table | CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// One row per rule: name, tag, shape and categories.
fn format_table(rules: &[&SchemaRule]) -> String {
    let name_width = rules.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);
    let tag_width = rules.iter().map(|r| r.tag.len()).max().unwrap_or(0).max(3);

    let mut out = format!(
        "{:<name_width$}  {:<tag_width$}  {:<9}  CATEGORIES\n",
        "NAME", "TAG", "KIND"
    );
    for rule in rules {
        let kind = if rule.is_container() { "container" } else { "command" };
        out.push_str(&format!(
            "{:<name_width$}  {:<tag_width$}  {:<9}  {}\n",
            rule.name, rule.tag, kind, rule.categories
        ));
    }
    out
}

/// A short score exercising nodes, tones, toggles and markup.
fn demo_document(registry: &SchemaRegistry) -> lilyflower_core::Result<Document> {
    let slur = std::rc::Rc::new(PairToggle::slur());
    let hairpin = std::rc::Rc::new(PairToggle::crescendo(Some(
        registry.node("forte", Arguments::new())?,
    ))?);
    let piano = registry.node("piano", Arguments::new())?;

    let note = |name: &str, octave: &str, duration: &str| -> lilyflower_core::Result<Tone> {
        Tone::note(Pitch::new(name, octave)?, duration)
    };
    let melody: Vec<Element> = vec![
        note("c", "'", "4")?.attach(piano)?.attach(&slur)?.into(),
        note("d", "'", "4")?.into(),
        note("e", "'", "4")?.attach(&slur)?.into(),
        note("f", "'", "4")?.attach(&hairpin)?.into(),
        note("g", "'", "2")?.attach(&hairpin)?.into(),
        registry
            .node("bar", Arguments::new().arg(LeafValue::string("|.")))?
            .into(),
    ];

    let relative = registry.node(
        "relative",
        Arguments::new().arg(note("c", "'", "")?).content(melody),
    )?;
    let layout = registry.node("layout", Arguments::new().content(Vec::new()))?;
    let score = registry.node(
        "score",
        Arguments::new().content(vec![relative.into(), layout.into()]),
    )?;

    let dolce = registry.node(
        "with_color",
        Arguments::new()
            .arg(LeafValue::color("darkred")?)
            .content(vec![MarkupText::new("dolce").into()]),
    )?;
    let markup = registry.node("markup", Arguments::new().content(vec![dolce.into()]))?;

    let mut document = Document::new().with_version(DEMO_VERSION);
    document.push(Comment::new("Generated by lilyflower"));
    document.push(score);
    document.push(markup);
    Ok(document)
}

#[cfg(test)]
mod tests {
    use lilyflower_catalog::builtin_registry;

    use super::{demo_document, format_table};

    #[test]
    fn test_demo_document_layout() {
        let registry = builtin_registry().unwrap();
        let rendered = demo_document(&registry).unwrap().render();
        assert_eq!(
            rendered,
            "\\version \"2.24.0\"\n\
             %{ Generated by lilyflower %}\n\
             \\score {\n  \
             \\relative c' {\n    \
             c'4\\p( d'4 e'4) f'4\\< g'2\\f \\bar #\"|.\"\n  \
             }\n  \
             \\layout { }\n\
             }\n\
             \\markup { \\with-color #darkred { dolce } }\n"
        );
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let registry = builtin_registry().unwrap();
        let rules = vec![
            registry.lookup("bold").unwrap().as_ref(),
            registry.lookup("staccato").unwrap().as_ref(),
        ];
        let table = format_table(&rules);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME      TAG        KIND"));
        assert!(lines[1].starts_with("bold      \\bold      container  markup, attachment"));
        assert!(lines[2].starts_with("staccato  \\staccato  command    attachment, accent"));
    }
}
