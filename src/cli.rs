use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run blacksheepwall for the given domains and collect the hosts it finds
    Run {
        /// Domains to scan (only the first one is passed to blacksheepwall)
        domains: Vec<String>,

        /// File with newline-delimited domains, appended after positional ones
        #[arg(short = 'd', long, value_name = "FILE")]
        domains_file: Option<String>,

        /// JSON file with module options (config, save_location, tool, timeout_secs)
        #[arg(long, value_name = "FILE")]
        options: Option<String>,

        /// blacksheepwall config file (required unless set in --options)
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<String>,

        /// Save raw JSON output here, only used when a single domain is provided
        #[arg(short = 's', long, value_name = "FILE")]
        save_location: Option<String>,

        /// blacksheepwall binary name or path
        #[arg(long)]
        tool: Option<String>,

        /// Kill blacksheepwall after this many seconds (default: wait forever)
        #[arg(short = 't', long)]
        timeout: Option<u64>,

        /// Write the collected host table as CSV ("-" for stdout)
        #[arg(long, value_name = "FILE")]
        hosts_out: Option<String>,
    },

    /// Show module metadata and options
    Info,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
