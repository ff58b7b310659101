use std::path::{Path, PathBuf};

use crate::error::EnrichmentError;
use crate::external::runner::{Executor, RunningTool};
use crate::external::tools::{self, BLACKSHEEPWALL};
use crate::host::Host;
use crate::output::write_raw;
use crate::record::parse_records;

/// Input to a single module run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    domains: Vec<String>,
    config_file: String,
    save_location: Option<String>,
}

impl EnrichmentRequest {
    pub fn new(
        domains: Vec<String>,
        config_file: impl Into<String>,
        save_location: Option<String>,
    ) -> Result<Self, EnrichmentError> {
        if domains.is_empty() {
            return Err(EnrichmentError::InvalidInput("no domains to scan".into()));
        }
        if let Some(d) = domains.iter().find(|d| d.is_empty()) {
            return Err(EnrichmentError::InvalidInput(format!("empty domain name {:?}", d)));
        }
        Ok(Self {
            domains,
            config_file: config_file.into(),
            save_location: save_location.filter(|s| !s.is_empty()),
        })
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn save_location(&self) -> Option<&Path> {
        self.save_location.as_deref().map(Path::new)
    }

    /// Raw output is only kept when the run covers a single domain.
    pub fn save_target(&self) -> Option<&Path> {
        if self.domains.len() <= 1 {
            self.save_location()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub records_parsed: usize,
    pub hosts_ingested: usize,
    pub saved: bool,
}

/// Runs blacksheepwall for a request and feeds its findings to a [`Host`].
///
/// Only the first domain is ever scanned; every other domain just gets its
/// "Running ..." alert. See DESIGN.md.
pub struct DomainEnrichmentAdapter<E> {
    executor: E,
    program: String,
}

impl<E: Executor> DomainEnrichmentAdapter<E> {
    pub fn new(executor: E) -> Self {
        Self::with_program(executor, BLACKSHEEPWALL)
    }

    pub fn with_program(executor: E, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub async fn run(
        &self,
        request: &EnrichmentRequest,
        host: &mut dyn Host,
    ) -> Result<EnrichmentSummary, EnrichmentError> {
        let first = &request.domains[0];
        let invocation = tools::blacksheepwall(&self.program, first, &request.config_file);

        let mut running = alert_on_err(host, self.executor.launch(&invocation))?;
        for domain in &request.domains {
            host.alert(&format!("Running blacksheepwall for domain: {}", domain));
            alert_on_err(host, running.wait().await)?;
        }
        let result = running.wait().await?;

        if !result.stderr.is_empty() && !result.success() {
            let stderr = result.stderr_lossy();
            host.error("Error running blacksheepwall.");
            host.error(&stderr);
            return Err(EnrichmentError::ExternalTool {
                exit_code: result.exit_code,
                stderr,
            });
        }

        let records = match parse_records(&result.stdout) {
            Ok(r) => r,
            Err(e) => {
                host.error(&format!("Could not parse blacksheepwall output: {}", e));
                return Err(e);
            }
        };
        tracing::debug!(domain = %first, records = records.len(), "parsed blacksheepwall output");

        let mut hosts_ingested = 0;
        for rec in &records {
            hosts_ingested += host.add_host(&rec.hostname, &rec.ip_address);
        }

        let mut saved = false;
        if let Some(path) = request.save_target() {
            host.alert(&format!("Writing output to {}", path.display()));
            if let Err(source) = write_raw(path, &result.stdout).await {
                host.error(&format!("Could not write {}: {}", path.display(), source));
                return Err(EnrichmentError::Persistence {
                    path: PathBuf::from(path),
                    hosts_ingested,
                    source,
                });
            }
            saved = true;
        }

        Ok(EnrichmentSummary {
            records_parsed: records.len(),
            hosts_ingested,
            saved,
        })
    }
}

fn alert_on_err<T>(host: &mut dyn Host, res: Result<T, EnrichmentError>) -> Result<T, EnrichmentError> {
    res.map_err(|e| {
        host.error(&format!("Error running blacksheepwall: {}", e));
        e
    })
}
