use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use statusgen::{
    DuplicatePolicy, Error, Generated, NameStyle, Options, Pipeline, ProtoFile, Target,
    discover_protos, message_docs,
};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "statusgen")]
#[command(about = "statusgen - status-code classes from .proto enums")]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the status class from the declaration file and .proto sources
    Generate {
        /// JSON file with generation options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory containing the .proto sources
        #[arg(long)]
        proto_dir: Option<PathBuf>,

        /// Generated type-declaration file (proto.d.ts)
        #[arg(long)]
        declarations: Option<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enum to scrape and class to generate
        #[arg(long, value_enum)]
        target: Option<Target>,

        /// Spelling of generated member names
        #[arg(long, value_enum)]
        names: Option<NameStyle>,

        /// Let later duplicate keys replace earlier ones instead of failing
        #[arg(long)]
        allow_duplicates: bool,

        /// Leave out the license comment
        #[arg(long)]
        no_license: bool,

        /// Print the generated code instead of writing the output file
        #[arg(long)]
        stdout: bool,

        /// Print a JSON summary of the run
        #[arg(long)]
        json: bool,
    },
    /// Print the messages and enums found in .proto files
    Inspect {
        /// Path to a .proto file or a directory of them
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            config,
            proto_dir,
            declarations,
            output,
            target,
            names,
            allow_duplicates,
            no_license,
            stdout,
            json,
        } => build_options(config.as_deref()).and_then(|mut options| {
            if let Some(dir) = proto_dir {
                options.proto_dir = dir;
            }
            if let Some(file) = declarations {
                options.declarations = file;
            }
            if let Some(file) = output {
                options.output = file;
            }
            if let Some(target) = target {
                options.target = target;
            }
            if let Some(names) = names {
                options.name_style = names;
            }
            if allow_duplicates {
                options.duplicates = DuplicatePolicy::LastWriteWins;
            }
            if no_license {
                options.license_header = false;
            }
            generate(options, stdout, json)
        }),
        Commands::Inspect { path, json } => inspect(&path, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_options(config: Option<&Path>) -> Result<Options, Error> {
    match config {
        Some(path) => Options::load(path),
        None => Ok(Options::default()),
    }
}

fn generate(options: Options, to_stdout: bool, json: bool) -> Result<(), Error> {
    let start = Instant::now();
    let pipeline = Pipeline::new(options);

    if to_stdout {
        let generated = pipeline.run()?;
        print!("{}", generated.code);
        if json {
            print_json(&generated);
        }
        return Ok(());
    }

    let generated = pipeline.generate()?;
    print_generated(&generated.output.display().to_string());
    if json {
        print_json(&generated);
    }
    print_summary(&generated, start.elapsed());
    Ok(())
}

fn inspect(path: &Path, json: bool) -> Result<(), Error> {
    let pipeline = Pipeline::default();

    let files = if path.is_dir() {
        discover_protos(path)?
    } else if path.exists() {
        vec![path.to_path_buf()]
    } else {
        return Err(Error::MissingInput { path: path.to_path_buf() });
    };

    let protos = files
        .iter()
        .map(|file| pipeline.parse_proto_file(file))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        print_json(&serde_json::json!({
            "files": protos,
            "message_docs": message_docs(&protos),
        }));
    } else {
        for file in &protos {
            print_proto(file);
        }
    }
    Ok(())
}

fn print_proto(file: &ProtoFile) {
    let name = file
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<source>".to_string());
    match &file.package {
        Some(package) => println!("{} (package {})", name, package),
        None => println!("{}", name),
    }

    for (path, message) in file.all_messages() {
        match message.doc.first() {
            Some(summary) => println!("  message {}  // {}", path, summary),
            None => println!("  message {}", path),
        }
        for nested in &message.enums {
            println!("  enum {}.{} ({} values)", path, nested.name, nested.values.len());
        }
    }

    for item in &file.enums {
        println!("  enum {} ({} values)", item.name, item.values.len());
        for value in &item.values {
            match value.doc.first() {
                Some(summary) => println!("    {} = {}  // {}", value.name, value.number, summary),
                None => println!("    {} = {}", value.name, value.number),
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Error: failed to serialize JSON: {}", err),
    }
}

fn print_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprint!("{}", err.render_color());
    } else {
        eprint!("{}", err.render());
    }
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(generated: &Generated, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let count = generated.constants.len();
    let word = if count == 1 { "constant" } else { "constants" };
    let line = format!(
        "Generated {} with {} {} ({} documented, {} .proto files) in {}",
        generated.class_name, count, word, generated.documented, generated.proto_files, time_str
    );

    if is_tty {
        eprintln!("\n\x1b[1m✨ {}\x1b[0m", line);
    } else {
        eprintln!("\n✨ {}", line);
    }

    if let Some(drift) = generated.drift.as_ref().filter(|d| !d.is_empty()) {
        eprintln!(
            "  {} declared value(s) missing from .proto, {} .proto value(s) not declared",
            drift.missing_in_proto.len(),
            drift.missing_in_declarations.len()
        );
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
