//! Schemnet CLI - schematic netlist extraction from the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemnet::{
    infer_dots, DotReport, ElementLibrary, ExtractOptions, ExtractionResult, SchemnetCore, SchemnetError,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "schemnet")]
#[command(about = "Schematic to circuit netlist extraction tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Log extraction passes to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the circuit of a single schematic snapshot
    Extract {
        /// Path to a .sch.json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if extraction produced warnings
        #[arg(long)]
        fail_on_warning: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Infer junction dots and compare them against the saved ones
    Dots {
        /// Path to a .sch.json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if the saved dots differ from the inferred ones
        #[arg(long)]
        strict_dots: bool,

        /// Custom element library (JSON)
        #[arg(long, value_name = "FILE")]
        library: Option<PathBuf>,
    },

    /// Extract every schematic snapshot in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if any extraction produced warnings
        #[arg(long)]
        fail_on_warning: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// List the element and port-symbol library
    Elements {
        /// Show port locations
        #[arg(short, long)]
        verbose: bool,

        /// Custom element library (JSON)
        #[arg(long, value_name = "FILE")]
        library: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Skip comparing saved junction dots against inferred ones
    #[arg(long)]
    no_dot_check: bool,

    /// Fail when saved junction dots differ from inferred ones
    #[arg(long, conflicts_with = "no_dot_check")]
    strict_dots: bool,

    /// Let later same-named instances replace earlier ones
    #[arg(long)]
    allow_duplicate_instances: bool,

    /// Custom element library (JSON)
    #[arg(long, value_name = "FILE")]
    library: Option<PathBuf>,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            check_dots: !self.no_dot_check,
            strict_dots: self.strict_dots,
            allow_duplicate_instances: self.allow_duplicate_instances,
        }
    }
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// Full extraction report as JSON
    Json,
    /// Circuit JSON only
    Circuit,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Extract {
            file,
            format,
            fail_on_warning,
            extract,
        } => handle_extract(&file, format, fail_on_warning, &extract),
        Commands::Dots {
            file,
            format,
            strict_dots,
            library,
        } => handle_dots(&file, format, strict_dots, library.as_deref()),
        Commands::Project {
            dir,
            format,
            fail_on_warning,
            extract,
        } => handle_project(&dir, format, fail_on_warning, &extract),
        Commands::Elements { verbose, library } => handle_elements(verbose, library.as_deref()),
    };

    process::exit(exit_code);
}

fn load_library(path: Option<&Path>) -> Result<ElementLibrary, SchemnetError> {
    match path {
        Some(path) => ElementLibrary::load(path),
        None => Ok(ElementLibrary::default()),
    }
}

fn handle_extract(file: &Path, format: OutputFormat, fail_on_warning: bool, args: &ExtractArgs) -> i32 {
    let result = load_library(args.library.as_deref())
        .and_then(|library| SchemnetCore::extract_file(file, &library, &args.options()));

    match result {
        Ok(extraction) => {
            let results = [extraction];
            if let Err(e) = output_results(&results, &format) {
                eprintln!("Error: {}", e);
                return 1;
            }
            if fail_on_warning && results[0].has_warnings() {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_project(dir: &Path, format: OutputFormat, fail_on_warning: bool, args: &ExtractArgs) -> i32 {
    let result = load_library(args.library.as_deref())
        .and_then(|library| SchemnetCore::extract_project(dir, &library, &args.options()));

    match result {
        Ok(results) => {
            if let Err(e) = output_results(&results, &format) {
                eprintln!("Error: {}", e);
                return 1;
            }
            if fail_on_warning && results.iter().any(|r| r.has_warnings()) {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_dots(file: &Path, format: OutputFormat, strict_dots: bool, library: Option<&Path>) -> i32 {
    let result = load_library(library).and_then(|library| {
        let schematic = SchemnetCore::load_schematic(file)?;
        let dots = infer_dots(&schematic, &library)?;
        let report = DotReport::compare(&schematic.dots, &dots);
        Ok((dots, report))
    });

    let (dots, report) = match result {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match format {
        OutputFormat::Human => {
            println!("\nFile: {}", file.display());
            println!("{}", "─".repeat(60));
            println!("  Inferred dots: {}", dots.len());
            for dot in &dots {
                println!("    {}", dot);
            }
            if report.is_consistent() {
                println!("\n  Saved dots match");
            } else {
                println!("\n  Mismatches:");
                for message in report.messages() {
                    println!("    - {}", message);
                }
            }
        }
        OutputFormat::Json | OutputFormat::Circuit => {
            let output = serde_json::json!({
                "file": file.display().to_string(),
                "dots": dots,
                "report": report,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return 1;
                }
            }
        }
    }

    if strict_dots && !report.is_consistent() {
        return 1;
    }
    0
}

fn output_results(results: &[ExtractionResult], format: &OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Human => {
            output_human(results);
            Ok(())
        }
        OutputFormat::Json => output_json(results),
        OutputFormat::Circuit => output_circuit(results),
    }
}

fn output_human(results: &[ExtractionResult]) {
    for result in results {
        if let Some(file) = &result.file {
            println!("\nFile: {}", file.display());
        } else {
            println!("\nSchematic: {}", result.circuit.name);
        }
        println!("{}", "─".repeat(60));

        let circuit = &result.circuit;
        println!("  Circuit: {}", circuit.name);

        if !circuit.signals.is_empty() {
            println!("\n  Signals:");
            for signal in &circuit.signals {
                println!("    {} ({})", signal.name, signal.portdir);
            }
        }

        if !circuit.instances.is_empty() {
            println!("\n  Instances:");
            for instance in &circuit.instances {
                println!("    {} = {}", instance.name, instance.of);
                for conn in &instance.conns {
                    println!("      {} -> {}", conn.portname, conn.signame);
                }
            }
        }

        if result.has_warnings() {
            println!("\n  Warnings:");
            for warning in &result.warnings {
                println!("    - {}", warning);
            }
        }

        println!("\n  Summary:");
        println!("    Signals:     {}", result.stats.signals);
        println!("    Ports:       {}", result.stats.ports);
        println!("    Internal:    {}", result.stats.internal);
        println!("    Instances:   {}", result.stats.instances);
        println!("    Connections: {}", result.stats.connections);
        println!("    Warnings:    {}", result.stats.warnings);
    }
}

fn output_json(results: &[ExtractionResult]) -> Result<(), serde_json::Error> {
    let output = serde_json::json!({
        "results": results,
        "summary": {
            "total_files": results.len(),
            "total_signals": results.iter().map(|r| r.stats.signals).sum::<usize>(),
            "total_instances": results.iter().map(|r| r.stats.instances).sum::<usize>(),
            "total_warnings": results.iter().map(|r| r.stats.warnings).sum::<usize>(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_circuit(results: &[ExtractionResult]) -> Result<(), serde_json::Error> {
    if let [result] = results {
        println!("{}", serde_json::to_string_pretty(&result.circuit)?);
    } else {
        let circuits: Vec<_> = results.iter().map(|r| &r.circuit).collect();
        println!("{}", serde_json::to_string_pretty(&circuits)?);
    }
    Ok(())
}

fn handle_elements(verbose: bool, library: Option<&Path>) -> i32 {
    let library = match load_library(library) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("Available elements:\n");
    for element in &library.elements {
        println!("  {} ({})", element.kind, element.svg_tag);
        println!("    Default: {}, shortcut '{}'", element.default_of, element.keyboard_shortcut);
        if verbose {
            for port in &element.ports {
                println!("    port {} at {}", port.name, port.loc);
            }
        }
        println!();
    }

    println!("Port symbols:\n");
    for port in &library.port_elements {
        println!("  {} ({})", port.kind, port.svg_tag);
        println!("    Default name: {}, shortcut '{}'", port.default_name, port.keyboard_shortcut);
        println!();
    }
    0
}
