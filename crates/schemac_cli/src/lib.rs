//! Command-line interface for schemac.
//!
//! # Usage
//!
//! ```bash
//! # Compile an SDL schema and print a summary of the model
//! schemac compile schema.graphql
//!
//! # Compile an introspection dump to JSON, mapping ID to Guid
//! schemac compile schema.json --scalars ID=Guid --format json -o model.json
//!
//! # Check several schemas, failing on interfaces, unions and extensions
//! schemac check --strict a.graphql b.graphql
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use schemac_core::{CompileError, DiagnosticSeverity};
use schemac_model::{
    Compilation, CompileOptions, ObjectTypeDef, ScalarOverrides, SourceFormat, TypeModel,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// Log filter used when `RUST_LOG` is unset. Library events stay at debug
/// level; findings are reported as diagnostics.
pub const DEFAULT_LOG_FILTER: &str = "warn,schemac_cli=info";

#[derive(Parser, Debug)]
#[command(name = "schemac")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Introspection for `.json` files, SDL otherwise
    Auto,
    /// GraphQL schema definition language
    Sdl,
    /// Introspection query result
    Introspection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable type listing
    Summary,
    /// The type model as JSON
    Json,
}

/// Flags shared by `compile` and `check`.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Schema input encoding
    #[arg(short, long, value_enum, default_value = "auto")]
    pub input: InputFormat,

    /// Scalar overrides, e.g. `ID=Guid,DateTime=Instant!`
    #[arg(long)]
    pub scalars: Option<String>,

    /// Target for custom scalars without an override
    #[arg(long, default_value = "String")]
    pub default_scalar: String,

    /// Fail on interfaces, unions, directive definitions and extensions
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile schemas into type models
    Compile {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        args: CompileArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that schemas compile
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        args: CompileArgs,
    },

    /// Show version information
    Version,
}

/// Output flags shared by every command.
#[derive(Clone, Copy, Debug)]
struct Verbosity {
    verbose: bool,
    quiet: bool,
}

pub fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let verbosity = Verbosity {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    match cli.command {
        Commands::Compile {
            files,
            args,
            format,
            output,
        } => compile_files(&files, &args, format, output.as_deref(), verbosity),
        Commands::Check { files, args } => check_files(&files, &args, verbosity),
        Commands::Version => {
            println!("schemac {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

impl CompileArgs {
    /// Maps the flags onto compiler options.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidOverride`] for a malformed `--scalars` value.
    pub fn options(&self) -> Result<CompileOptions, CompileError> {
        let mut options = CompileOptions::new().with_fallback(&self.default_scalar);
        if let Some(scalars) = &self.scalars {
            options = options.with_overrides(scalars.parse::<ScalarOverrides>()?);
        }
        if self.strict {
            options = options.strict();
        }
        Ok(options)
    }
}

/// Picks the encoding of `path`.
#[must_use]
pub fn detect_format(path: &Path, input: InputFormat) -> SourceFormat {
    match input {
        InputFormat::Sdl => SourceFormat::Sdl,
        InputFormat::Introspection => SourceFormat::Introspection,
        InputFormat::Auto => {
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                SourceFormat::Introspection
            } else {
                SourceFormat::Sdl
            }
        }
    }
}

/// The result of compiling one file.
struct Outcome<'a> {
    path: &'a Path,
    source: String,
    result: Result<Compilation, CompileError>,
}

/// Reads and compiles every file in parallel. Results keep the input order.
fn compile_all<'a>(
    files: &'a [PathBuf],
    input: InputFormat,
    options: &CompileOptions,
) -> std::io::Result<Vec<Outcome<'a>>> {
    files
        .par_iter()
        .map(|path| -> std::io::Result<Outcome<'a>> {
            let source = std::fs::read_to_string(path)?;
            let format = detect_format(path, input);
            tracing::debug!(path = %path.display(), ?format, "compiling");
            let result = schemac_model::compile(&source, format, options);
            Ok(Outcome {
                path: path.as_path(),
                source,
                result,
            })
        })
        .collect()
}

fn load_options(args: &CompileArgs) -> Option<CompileOptions> {
    match args.options() {
        Ok(options) => Some(options),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            None
        }
    }
}

fn report_error(path: &Path, source: String, err: CompileError) {
    eprintln!("{} {}", "Error".red().bold(), path.display());
    let report = miette::Report::new(err).with_source_code(source);
    eprintln!("{report:?}");
}

fn report_warnings(path: &Path, compilation: &Compilation, verbosity: Verbosity) {
    if verbosity.quiet {
        return;
    }
    for diagnostic in compilation.warnings.iter() {
        let origin = diagnostic
            .primary_origin()
            .map(|origin| format!(" ({origin})"))
            .unwrap_or_default();
        match diagnostic.severity {
            DiagnosticSeverity::Warning => eprintln!(
                "{} [{}] {}: {}{}",
                "warning".yellow().bold(),
                diagnostic.code,
                path.display(),
                diagnostic.title,
                origin
            ),
            DiagnosticSeverity::Info if verbosity.verbose => eprintln!(
                "{} [{}] {}: {}{}",
                "info".blue(),
                diagnostic.code,
                path.display(),
                diagnostic.title,
                origin
            ),
            DiagnosticSeverity::Info => {}
        }
    }
}

fn check_files(
    files: &[PathBuf],
    args: &CompileArgs,
    verbosity: Verbosity,
) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(options) = load_options(args) else {
        return Ok(1);
    };

    let mut has_errors = false;
    for Outcome {
        path,
        source,
        result,
    } in compile_all(files, args.input, &options)?
    {
        match result {
            Ok(compilation) => {
                report_warnings(path, &compilation, verbosity);
                if verbosity.verbose {
                    println!(
                        "{} {} ({} skipped)",
                        "OK".green(),
                        path.display(),
                        compilation.skipped
                    );
                }
            }
            Err(err) => {
                has_errors = true;
                report_error(path, source, err);
            }
        }
    }

    if has_errors {
        Ok(1)
    } else {
        if !verbosity.quiet {
            println!(
                "{} {} file(s) checked",
                "Success:".green().bold(),
                files.len()
            );
        }
        Ok(0)
    }
}

fn compile_files(
    files: &[PathBuf],
    args: &CompileArgs,
    format: OutputFormat,
    output: Option<&Path>,
    verbosity: Verbosity,
) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(options) = load_options(args) else {
        return Ok(1);
    };

    let mut has_errors = false;
    let mut models = Vec::new();
    for Outcome {
        path,
        source,
        result,
    } in compile_all(files, args.input, &options)?
    {
        match result {
            Ok(compilation) => {
                report_warnings(path, &compilation, verbosity);
                models.push((path, compilation.model));
            }
            Err(err) => {
                has_errors = true;
                report_error(path, source, err);
            }
        }
    }
    if has_errors {
        return Ok(1);
    }

    let rendered = match format {
        OutputFormat::Summary => render_summaries(&models),
        OutputFormat::Json => render_json(&models)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            if !verbosity.quiet {
                println!("{} {}", "Wrote".green(), path.display());
            }
        }
        None => print!("{rendered}"),
    }
    Ok(0)
}

fn render_summaries(models: &[(&Path, TypeModel)]) -> String {
    if let [(_, model)] = models {
        return Summary(model).to_string();
    }
    models
        .iter()
        .map(|(path, model)| format!("# {}\n{}", path.display(), Summary(model)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One model is written as is; several are keyed by file path.
fn render_json(models: &[(&Path, TypeModel)]) -> serde_json::Result<String> {
    let mut rendered = if let [(_, model)] = models {
        serde_json::to_string_pretty(model)?
    } else {
        let mut map = serde_json::Map::new();
        for (path, model) in models {
            map.insert(path.display().to_string(), serde_json::to_value(model)?);
        }
        serde_json::to_string_pretty(&map)?
    };
    rendered.push('\n');
    Ok(rendered)
}

/// Human-readable listing of a type model.
pub struct Summary<'a>(pub &'a TypeModel);

impl Summary<'_> {
    fn object(f: &mut fmt::Formatter<'_>, keyword: &str, object: &ObjectTypeDef) -> fmt::Result {
        writeln!(f, "{keyword} {}", object.name)?;
        for field in &object.fields {
            writeln!(f, "  {field}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;
        Self::object(f, "query", &model.query)?;
        Self::object(f, "mutation", &model.mutation)?;
        for object in model.types.values() {
            Self::object(f, "type", object)?;
        }
        for input in model.inputs.values() {
            writeln!(f, "input {}", input.name)?;
            for field in &input.fields {
                writeln!(f, "  {field}")?;
            }
        }
        for enum_def in model.enums.values() {
            let values: Vec<&str> = enum_def.values.iter().map(String::as_str).collect();
            writeln!(f, "enum {} {{ {} }}", enum_def.name, values.join(", "))?;
        }
        for scalar in model.scalars.values() {
            writeln!(f, "scalar {} -> {}", scalar.name, scalar.target)?;
        }
        Ok(())
    }
}
