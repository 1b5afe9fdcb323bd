use arl_compiler::batch::{self, BatchConfig, BatchResults};
use arl_compiler::config::RuntimeConfig;
use arl_compiler::document::{Document, VariableMapping};
use arl_compiler::logging;
use arl_compiler::pipeline::{Pipeline, PipelineError, PipelineResult};
use arl_compiler::syntax::{split_sections, Section, SyntaxError};
use arl_compiler::utils::SourceMap;
use indexmap::IndexMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Check {
        input: PathBuf,
        recursive: bool,
        threads: Option<usize>,
    },
    Json {
        input: PathBuf,
        output: Option<PathBuf>,
        complete: bool,
    },
    Slice {
        input: PathBuf,
        conclusion: String,
    },
    Remap {
        input: PathBuf,
        mapping: PathBuf,
    },
    Format {
        input: PathBuf,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    command: Command,
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("arl");

    let invocation = match parse_args(&args[1.min(args.len())..]) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Run '{} --help' for usage", program);
            std::process::exit(1);
        }
    };

    if invocation.command == Command::Help {
        print_help(program);
        return Ok(());
    }

    let config = match &invocation.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    let pipeline = Pipeline::from_config(&config);
    let succeeded = run(invocation.command, &pipeline);

    logging::print_cargo_style_summary();
    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Command, pipeline: &Pipeline) -> bool {
    match command {
        Command::Check {
            input,
            recursive,
            threads,
        } => check(&input, recursive, threads, pipeline),
        Command::Json {
            input,
            output,
            complete,
        } => {
            let pipeline = if complete {
                let mut parser = pipeline.parser.clone();
                parser.features = parser.features.with_range_completion(true);
                pipeline.clone().with_parser(parser)
            } else {
                pipeline.clone()
            };
            write_json(&input, output.as_deref(), &pipeline)
        }
        Command::Slice { input, conclusion } => transform(&input, pipeline, |document| {
            document.slice_to_conclusion(&conclusion)
        }),
        Command::Remap { input, mapping } => {
            let mapping = match load_mapping(&mapping) {
                Ok(mapping) => mapping,
                Err(message) => {
                    eprintln!("Error: {}", message);
                    return false;
                }
            };
            transform(&input, pipeline, |document| document.remap_with(&mapping))
        }
        Command::Format { input } => {
            transform(&input, pipeline, Document::with_completed_features)
        }
        Command::Help => true,
    }
}

fn print_help(program_name: &str) {
    println!("ARL Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Parser and validator for feature/rule/conclusion knowledge documents");
    println!();
    println!("USAGE:");
    println!("    {} [--config <file.toml>] <command> [options]", program_name);
    println!();
    println!("COMMANDS:");
    println!("    check <file|directory>        Parse and report missing references");
    println!("        --recursive               Search subdirectories");
    println!("        --parallel                Use one worker per available core");
    println!("        --threads N               Use N worker threads");
    println!("    json <file>                   Print the structured form as JSON");
    println!("        --output <path>           Write to a file instead of stdout");
    println!("        --complete                Fill gaps in numeric feature ranges");
    println!("    slice <file> <conclusion>     Keep only one conclusion's lines");
    println!("    remap <file> <mapping>        Rename variables (.toml or .json table)");
    println!("    format <file>                 Print with range-completed features");
    println!();
    println!("EXAMPLES:");
    println!("    {} check plant.arl", program_name);
    println!("    {} check rules/ --recursive --threads 4", program_name);
    println!("    {} json plant.arl --output plant.json", program_name);
    println!("    {} slice plant.arl Fault", program_name);
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut config = None;
    let mut positional: Vec<&str> = Vec::new();
    let mut recursive = false;
    let mut parallel = false;
    let mut threads = None;
    let mut output = None;
    let mut complete = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                return Ok(Invocation {
                    command: Command::Help,
                    config,
                })
            }
            "--config" => {
                config = Some(PathBuf::from(option_value(args, i, "--config")?));
                i += 1;
            }
            "--recursive" | "-r" => recursive = true,
            "--parallel" => parallel = true,
            "--threads" => {
                let value = option_value(args, i, "--threads")?;
                let count = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid thread count '{}'", value))?;
                threads = Some(count.max(1));
                i += 1;
            }
            "--output" | "-o" => {
                output = Some(PathBuf::from(option_value(args, i, "--output")?));
                i += 1;
            }
            "--complete" => complete = true,
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(format!("Unknown option '{}'", other));
            }
            other => positional.push(other),
        }
        i += 1;
    }

    if parallel && threads.is_none() {
        threads = Some(BatchConfig::parallel().max_threads);
    }

    let command = match positional.as_slice() {
        [] => Command::Help,
        ["check", input] => Command::Check {
            input: PathBuf::from(*input),
            recursive,
            threads,
        },
        ["json", input] => Command::Json {
            input: PathBuf::from(*input),
            output,
            complete,
        },
        ["slice", input, conclusion] => Command::Slice {
            input: PathBuf::from(*input),
            conclusion: conclusion.to_string(),
        },
        ["remap", input, mapping] => Command::Remap {
            input: PathBuf::from(*input),
            mapping: PathBuf::from(*mapping),
        },
        ["format", input] => Command::Format {
            input: PathBuf::from(*input),
        },
        [name, ..] if ["check", "json", "slice", "remap", "format"].contains(name) => {
            return Err(format!("Wrong number of arguments for '{}'", name));
        }
        [name, ..] => return Err(format!("Unknown command '{}'", name)),
    };

    Ok(Invocation { command, config })
}

fn option_value<'a>(args: &'a [String], index: usize, option: &str) -> Result<&'a str, String> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", option))
}

fn check(input: &Path, recursive: bool, threads: Option<usize>, pipeline: &Pipeline) -> bool {
    if input.is_dir() {
        let config = BatchConfig {
            recursive,
            progress_reporting: threads.is_none(),
            ..BatchConfig::default()
        };
        let config = match threads {
            Some(threads) => config.with_threads(threads),
            None => config,
        };

        println!("Checking directory: {}", input.display());
        match batch::process_directory(input, pipeline, &config) {
            Ok(results) => {
                print_batch_results(&results);
                results.failure_count() == 0
            }
            Err(error) => {
                eprintln!("error[{}]: {}", error.error_code(), error);
                false
            }
        }
    } else {
        match pipeline.process_file(input) {
            Ok(result) => {
                print_file_result(&result);
                true
            }
            Err(error) => {
                print_detailed_error(input, &error);
                false
            }
        }
    }
}

fn print_file_result(result: &PipelineResult) {
    let document = &result.document;
    println!(
        "OK: {} ({} features, {} rules, {} conclusions)",
        result.file_metadata.path.display(),
        document.features().len(),
        document.rules().len(),
        document.conclusions().len()
    );

    let undefined = &document.features().undefined;
    if !undefined.is_empty() {
        let names: Vec<&str> = undefined.iter().map(String::as_str).collect();
        println!("  undefined values: {}", names.join(", "));
    }

    for (section, report) in [
        ("rules", &document.rules().missing),
        ("conclusions", &document.conclusions().missing),
    ] {
        for line in report.describe() {
            println!("  warning: {} {}", section, line);
        }
    }
}

fn print_batch_results(results: &BatchResults) {
    println!("Batch Processing Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  Files processed: {}", results.files_processed);
    println!(
        "  Successful: {} ({:.1}%)",
        results.success_count(),
        results.success_rate() * 100.0
    );
    println!(
        "  With missing references: {}",
        results.files_with_missing_references()
    );
    println!("  Failed: {}", results.failure_count());

    let diagnostics = logging::get_processing_summary();
    println!(
        "  Diagnostics: {} errors, {} warnings",
        diagnostics.total_errors, diagnostics.total_warnings
    );
    println!(
        "  Total time: {:.2}s",
        results.processing_duration.as_secs_f64()
    );

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!(
                "  {}: [{}] {}",
                file_path.display(),
                error.error_code(),
                error.stage()
            );
        }
    }
}

fn print_detailed_error(input: &Path, error: &PipelineError) {
    eprintln!("FAILED: {}", input.display());
    eprintln!("error[{}]: {} stage failed", error.error_code(), error.stage());
    eprintln!("  {}", error);

    if let PipelineError::Document(document_error) = error {
        if let Some(syntax) = document_error.as_syntax() {
            print_syntax_excerpt(input, syntax);
        }
    }
}

/// Show the failing line of the section the error points into
fn print_syntax_excerpt(input: &Path, error: &SyntaxError) {
    let Ok(source) = fs::read_to_string(input) else {
        return;
    };
    let section = split_sections(&source)
        .into_iter()
        .find(|raw| Section::from_name(raw.name) == Some(error.section()));

    if let Some(raw) = section {
        let map = SourceMap::new(raw.content.to_string());
        let message = format!("[{}] {}", error.section().as_str(), error);
        eprint!("{}", map.format_error(&error.span(), &message));
    }
}

fn load_document(input: &Path, pipeline: &Pipeline) -> Option<Document> {
    match pipeline.process_file(input) {
        Ok(result) => Some(result.document),
        Err(error) => {
            print_detailed_error(input, &error);
            None
        }
    }
}

/// Load, apply `operation`, print the resulting document text
fn transform<F>(input: &Path, pipeline: &Pipeline, operation: F) -> bool
where
    F: FnOnce(&Document) -> arl_compiler::document::DocumentResult<Document>,
{
    let Some(document) = load_document(input, pipeline) else {
        return false;
    };

    match operation(&document) {
        Ok(document) => {
            println!("{}", document.to_text());
            true
        }
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            false
        }
    }
}

fn write_json(input: &Path, output: Option<&Path>, pipeline: &Pipeline) -> bool {
    let result = match pipeline.process_file(input) {
        Ok(result) => result,
        Err(error) => {
            print_detailed_error(input, &error);
            return false;
        }
    };

    let json = match result.output().to_json_pretty() {
        Ok(json) => json,
        Err(error) => {
            eprintln!("Error: failed to serialize output: {}", error);
            return false;
        }
    };

    match output {
        Some(path) => match fs::write(path, json) {
            Ok(()) => {
                println!("Wrote {}", path.display());
                true
            }
            Err(error) => {
                eprintln!("Error: failed to write '{}': {}", path.display(), error);
                false
            }
        },
        None => {
            println!("{}", json);
            true
        }
    }
}

/// Read a flat `old = "new"` table from TOML, or a JSON object
fn load_mapping(path: &Path) -> Result<VariableMapping, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read mapping '{}': {}", path.display(), e))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let table: IndexMap<String, String> = if is_json {
        serde_json::from_str(&content).map_err(|e| format!("Invalid JSON mapping: {}", e))?
    } else {
        toml::from_str(&content).map_err(|e| format!("Invalid TOML mapping: {}", e))?
    };

    VariableMapping::new(table).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_check_options() {
        let invocation = parse_args(&args(&["check", "rules/", "--recursive", "--threads", "4"])).unwrap();

        assert_eq!(
            invocation.command,
            Command::Check {
                input: PathBuf::from("rules/"),
                recursive: true,
                threads: Some(4),
            }
        );
        assert_eq!(invocation.config, None);
    }

    #[test]
    fn test_parse_parallel_without_threads() {
        let invocation = parse_args(&args(&["check", "rules/", "--parallel"])).unwrap();
        assert_matches!(invocation.command, Command::Check { threads: Some(n), .. } if n >= 1);
    }

    #[test]
    fn test_parse_json_options() {
        let invocation = parse_args(&args(&[
            "--config", "arl.toml", "json", "plant.arl", "-o", "out.json", "--complete",
        ]))
        .unwrap();

        assert_eq!(invocation.config, Some(PathBuf::from("arl.toml")));
        assert_eq!(
            invocation.command,
            Command::Json {
                input: PathBuf::from("plant.arl"),
                output: Some(PathBuf::from("out.json")),
                complete: true,
            }
        );
    }

    #[test]
    fn test_parse_positional_commands() {
        assert_eq!(
            parse_args(&args(&["slice", "plant.arl", "Fault"])).unwrap().command,
            Command::Slice {
                input: PathBuf::from("plant.arl"),
                conclusion: "Fault".to_string(),
            }
        );
        assert_eq!(
            parse_args(&args(&["format", "plant.arl"])).unwrap().command,
            Command::Format {
                input: PathBuf::from("plant.arl"),
            }
        );
        assert_eq!(parse_args(&[]).unwrap().command, Command::Help);
        assert_eq!(parse_args(&args(&["json", "--help"])).unwrap().command, Command::Help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["check"])).unwrap_err().contains("Wrong number"));
        assert!(parse_args(&args(&["compile", "x.arl"])).unwrap_err().contains("Unknown command"));
        assert!(parse_args(&args(&["check", "x.arl", "--fast"])).unwrap_err().contains("Unknown option"));
        assert!(parse_args(&args(&["check", "x.arl", "--threads"])).unwrap_err().contains("requires a value"));
        assert!(parse_args(&args(&["check", "x.arl", "--threads", "many"])).unwrap_err().contains("Invalid thread count"));
    }

    #[test]
    fn test_load_mapping_formats() {
        let dir = tempdir().unwrap();

        let toml_path = dir.path().join("mapping.toml");
        fs::write(&toml_path, "temp = \"temperature\"\np = \"pressure\"\n").unwrap();
        let mapping = load_mapping(&toml_path).unwrap();
        assert_eq!(mapping.len(), 2);

        let json_path = dir.path().join("mapping.json");
        fs::write(&json_path, r#"{"temp": "temperature"}"#).unwrap();
        assert_eq!(load_mapping(&json_path).unwrap().len(), 1);

        let clash_path = dir.path().join("clash.json");
        fs::write(&clash_path, r#"{"a": "x", "b": "x"}"#).unwrap();
        assert!(load_mapping(&clash_path).unwrap_err().contains("Invalid variable mapping"));
    }
}
