use anyhow::Context;
use mysqldump_to_tsv::{utils::memory_map, Converter, Error};
use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Converts the INSERT statements of MySQL dumps to tab-separated values.

USAGE:
    mysqldump-to-tsv [FILE]...

Reads standard input if no FILE is given or FILE is -.
Each INSERT line is written as the line up to VALUES,
followed by one line per row. Other lines are skipped.

OPTIONS:
    -h, --help       Print this message
    -V, --version    Print the version

The RUST_LOG environment variable sets the log level (default: warn).
";

enum Source {
    Stdin,
    File(PathBuf),
}

impl From<OsString> for Source {
    fn from(arg: OsString) -> Self {
        if arg.as_os_str() == "-" {
            Source::Stdin
        } else {
            Source::File(arg.into())
        }
    }
}

fn convert_source<W: Write>(
    converter: &mut Converter<W>,
    source: &Source,
) -> anyhow::Result<()> {
    match source {
        Source::Stdin => {
            let stdin = io::stdin();
            converter
                .convert_reader(stdin.lock())
                .context("in standard input")?;
        }
        Source::File(path) => {
            let map = match unsafe { memory_map(path)? } {
                Some(map) => map,
                None => {
                    tracing::info!(path = %path.display(), "skipping empty file");
                    return Ok(());
                }
            };
            converter
                .convert_reader(&map[..])
                .with_context(|| format!("in {}", path.display()))?;
        }
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(());
    }
    if args.contains(["-V", "--version"]) {
        println!("mysqldump-to-tsv {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let mut sources: Vec<Source> = args.finish().into_iter().map(Source::from).collect();
    if sources.is_empty() {
        sources.push(Source::Stdin);
    }

    let stdout = io::stdout();
    let mut converter = Converter::new(io::BufWriter::new(stdout.lock()));
    for source in &sources {
        convert_source(&mut converter, source)?;
    }
    converter.flush()?;

    let stats = converter.stats();
    tracing::info!(
        statements = stats.statements,
        rows = stats.rows,
        "finished converting"
    );
    Ok(())
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| match cause.downcast_ref::<Error>() {
        Some(e) => e.is_broken_pipe(),
        None => cause
            .downcast_ref::<io::Error>()
            .map_or(false, |e| e.kind() == io::ErrorKind::BrokenPipe),
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        // The reader of our output went away, as with `| head`.
        if is_broken_pipe(&e) {
            std::process::exit(0);
        }
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
