mod cli;

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use syscall_synopsis::{
    ScanOrder, Settings, SyscallResolver, availability::load_environments, check_availability, parse_declaration,
};

use cli::{Args, Command};

fn init_tracing(
    args: &Args,
    settings: &Settings,
) {
    let directive = if args.verbose {
        "syscall_synopsis=debug".to_string()
    } else {
        settings.logging.level.filter_directive()
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&directive));

    let file_layer = args.log_file.as_ref().map(|log_path| {
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path.file_name().unwrap_or(std::ffi::OsStr::new("syscall-synopsis.log")),
        );
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new("syscall_synopsis=debug"))
    });

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).init();
}

fn write_output(
    path: Option<&std::path::Path>,
    content: &str,
) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write `{}`", path.display()))?;
            info!("Wrote {}", path.display());
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes()).context("Failed to write to stdout")?;
            stdout.write_all(b"\n").context("Failed to write to stdout")?;
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = cli::load_settings(&args)?;
    init_tracing(&args, &settings);
    debug!("syscall-synopsis v{} with {:?}", env!("CARGO_PKG_VERSION"), settings);

    match &args.command {
        Command::Lookup { names, json } => {
            let resolver = SyscallResolver::new(cli::page_source(&args, &settings), settings.lookup.clone());
            let mut results = Vec::with_capacity(names.len());
            let mut defects = 0usize;
            for name in names {
                match resolver.lookup(name).await {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        error!("[{name}] {e}");
                        defects += 1;
                    },
                }
            }

            if *json {
                write_output(None, &serde_json::to_string_pretty(&results)?)?;
            } else {
                for result in &results {
                    println!("{result}\n");
                }
            }

            if defects > 0 {
                bail!("{defects} lookup(s) ended in a defect");
            }
        },
        Command::Batch { names, output, jobs } => {
            cli::apply_jobs(&mut settings, *jobs);
            let call_names = cli::batch_call_names(names.as_deref(), &args, &settings)?;
            let resolver = SyscallResolver::new(cli::page_source(&args, &settings), settings.lookup.clone());
            let report = resolver.lookup_batch(&call_names).await;
            write_output(output.as_deref(), &serde_json::to_string_pretty(&report)?)?;
        },
        Command::Parse { declaration, json } => {
            let definition = parse_declaration(declaration)?;
            if *json {
                write_output(None, &serde_json::to_string_pretty(&definition)?)?;
            } else {
                println!("{definition}");
                for (idx, parameter) in definition.parameters.iter().enumerate() {
                    println!("  [{idx}] {parameter:?}");
                }
            }
        },
        Command::Availability {
            definitions,
            libraries,
            symbol_lists,
            order,
            json,
        } => {
            let call_names = cli::read_definition_names(definitions)?;
            let specs = cli::library_specs(&settings, libraries, symbol_lists);
            if specs.is_empty() {
                bail!("no environments configured; pass `--library name=path` or `--symbols name=path`");
            }
            let environments = load_environments(&specs).await?;
            let order = ScanOrder::from_names(order.clone().unwrap_or_else(|| settings.availability.order.clone()));
            let report = check_availability(&environments, &call_names, &order)?;

            if *json {
                write_output(None, &serde_json::to_string_pretty(&report)?)?;
            } else {
                print!("{report}");
            }
        },
    }

    Ok(())
}
