use std::path::Path;

use anyhow::Context;
use bsw_recon::config::{ModuleOptions, META};
use bsw_recon::external::tools;
use bsw_recon::external::ProcessExecutor;
use bsw_recon::host::gather_domains;
use bsw_recon::{DomainEnrichmentAdapter, MemoryHost};

use crate::cli::{Cli, Commands};

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Alerts log at info; error alerts still show at the default warn level.
    // Logs go to stderr so `--hosts-out -` stays clean CSV.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!("bsw_recon={level}", level = crate_level);
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            print_info();
            Ok(())
        }
        Commands::Run { domains, domains_file, options, config, save_location, tool, timeout, hosts_out } => {
            let file_opts = match options {
                Some(path) => ModuleOptions::from_json_file(Path::new(&path))
                    .with_context(|| format!("reading options from {}", path))?,
                None => ModuleOptions::default(),
            };
            let opts = file_opts.with_overrides(config, save_location, tool, timeout);

            let file_data = match domains_file {
                Some(path) => Some(
                    std::fs::read_to_string(&path).with_context(|| format!("reading domains from {}", path))?,
                ),
                None => None,
            };
            let domains = gather_domains(domains, file_data.as_deref());

            run_module(opts, domains, hosts_out).await
        }
    }
}

async fn run_module(opts: ModuleOptions, domains: Vec<String>, hosts_out: Option<String>) -> anyhow::Result<()> {
    let request = opts.request(domains)?;

    if tools::locate(&opts.tool).is_none() {
        anyhow::bail!("{} not found in PATH", opts.tool);
    }

    let executor = ProcessExecutor::new().with_timeout(opts.timeout());
    let adapter = DomainEnrichmentAdapter::with_program(executor, opts.tool.clone());

    tracing::info!(
        domains = request.domains().len(),
        tool = %adapter.program(),
        config = %request.config_file(),
        timeout = ?opts.timeout_secs,
        "Starting module run"
    );
    let mut host = MemoryHost::new();

    let outcome = adapter.run(&request, &mut host).await;

    if let Some(path) = hosts_out {
        if path == "-" {
            host.write_csv(std::io::stdout().lock())?;
        } else {
            let f = std::fs::File::create(&path).with_context(|| format!("creating {}", path))?;
            host.write_csv(f)?;
        }
    }

    let summary = outcome?;
    println!(
        "[+] {} records parsed, {} new hosts{}",
        summary.records_parsed,
        summary.hosts_ingested,
        if summary.saved { format!(", output saved to {}", opts.save_location) } else { String::new() }
    );
    Ok(())
}

fn print_info() {
    println!("{} {}", META.name, META.version);
    println!("Author: {}", META.author);
    println!("{}", META.description);
    println!("Query: {}", META.query);
    println!("\nOptions:");
    println!("  {:<15} {:<8} {:<8} {}", "NAME", "DEFAULT", "REQUIRED", "DESCRIPTION");
    for o in META.options {
        println!(
            "  {:<15} {:<8} {:<8} {}",
            o.name,
            o.default,
            if o.required { "yes" } else { "no" },
            o.description
        );
    }
}
