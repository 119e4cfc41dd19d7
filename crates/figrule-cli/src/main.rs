use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use figrule_codegen::{compile, CompileOptions, DialectKind};
use figrule_ir::{assign_stacking_order, normalize, TransformContext};
use figrule_rules::{decode_lenient, decode_rules, inspect, MappingRule};
use figrule_source::{
    parse_design_url, parse_document, DesignToken, NodeKey, SourceNode, TokenCollections, TokenMap,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "figrule")]
#[command(about = "Rule-driven design-to-code generator")]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). FIGRULE_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate code from a design tree JSON file
    Build {
        /// Source document (bare node or cached node record)
        source: PathBuf,

        /// Rules file (array, library or tiered object)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output dialect
        #[arg(long, value_enum, default_value_t = Dialect::Utility)]
        dialect: Dialect,

        /// Evaluate rules on every descendant, not only the root
        #[arg(long)]
        propagate_rules: bool,

        /// Design tokens file
        #[arg(long)]
        tokens: Option<PathBuf>,

        /// Write files into this directory instead of printing
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a rules file and list every invalid rule
    Check {
        /// Rules file
        rules: PathBuf,
    },

    /// Print per-node rule matches and resolved properties as JSON
    Inspect {
        /// Source document
        source: PathBuf,

        /// Rules file
        #[arg(long)]
        rules: PathBuf,
    },

    /// Print the `fileKey:nodeId` cache key for a design URL or key
    Key {
        /// Design-file URL or `fileKey:nodeId`
        input: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dialect {
    Inline,
    Utility,
    Stylesheet,
}

impl From<Dialect> for DialectKind {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Inline => DialectKind::Inline,
            Dialect::Utility => DialectKind::Utility,
            Dialect::Stylesheet => DialectKind::Stylesheet,
        }
    }
}

/// Token files come either as fetched collections or as a flat id → token map.
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenFile {
    Collections(TokenCollections),
    Flat(BTreeMap<String, DesignToken>),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build {
            source,
            rules,
            dialect,
            propagate_rules,
            tokens,
            out,
        } => {
            let options = CompileOptions {
                dialect: dialect.into(),
                propagate_rules_to_descendants: propagate_rules,
                tokens: tokens.as_deref().map(load_tokens),
            };
            cmd_build(&source, rules.as_deref(), &options, out.as_deref());
        }
        Command::Check { rules } => cmd_check(&rules),
        Command::Inspect { source, rules } => cmd_inspect(&source, &rules),
        Command::Key { input } => cmd_key(&input),
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("FIGRULE_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_file(path: &Path) -> String {
    if !path.exists() {
        eprintln!("Error: file not found: {}", path.display());
        std::process::exit(1);
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn load_source(path: &Path) -> SourceNode {
    match parse_document(&read_file(path)) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("Source error in {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn load_rules(path: &Path) -> Vec<MappingRule> {
    match decode_rules(&read_file(path)) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Rule error in {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn load_tokens(path: &Path) -> TokenMap {
    match serde_json::from_str::<TokenFile>(&read_file(path)) {
        Ok(TokenFile::Collections(collections)) => TokenMap::from_collections(&collections),
        Ok(TokenFile::Flat(tokens)) => {
            let mut map = TokenMap::new();
            for (id, token) in tokens {
                map.insert(id, token);
            }
            map
        }
        Err(e) => {
            eprintln!("Token error in {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn write_file(path: &Path, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        eprintln!("Error writing {}: {e}", path.display());
        std::process::exit(1);
    }
    eprintln!("Wrote: {}", path.display());
}

fn cmd_build(source: &Path, rules: Option<&Path>, options: &CompileOptions, out: Option<&Path>) {
    let node = load_source(source);
    let rules = rules.map(load_rules).unwrap_or_default();

    let output = match compile(&node, &rules, options) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let Some(dir) = out else {
        print!("{}", output.code);
        if !output.styles.is_empty() {
            println!();
            print!("{}", output.styles);
        }
        return;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Error creating {}: {e}", dir.display());
        std::process::exit(1);
    }
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("component");
    write_file(&dir.join(format!("{stem}.{}", output.language)), &output.code);
    if !output.styles.is_empty() {
        write_file(&dir.join(format!("{stem}.css")), &output.styles);
    }
}

fn cmd_check(path: &Path) {
    let report = match decode_lenient(&read_file(path)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Rule error in {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    if report.errors.is_empty() {
        eprintln!("OK: {} ({} rules)", path.display(), report.store.len());
        return;
    }
    for error in &report.errors {
        eprintln!("Rule error: {error}");
    }
    eprintln!(
        "{}: {} valid, {} invalid",
        path.display(),
        report.store.len(),
        report.errors.len()
    );
    std::process::exit(1);
}

fn cmd_inspect(source: &Path, rules: &Path) {
    let node = load_source(source);
    let rules = load_rules(rules);

    let Some(mut root) = normalize(&node, &mut TransformContext::new()) else {
        eprintln!("Error: root node `{}` is not visible", node.id);
        std::process::exit(1);
    };
    assign_stacking_order(&mut root);

    let reports = inspect(&root, &rules);
    match serde_json::to_string_pretty(&reports) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error encoding report: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_key(input: &str) {
    let key = if input.contains("://") {
        parse_design_url(input)
    } else {
        NodeKey::parse(input)
    };
    match key {
        Ok(key) => println!("{key}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
