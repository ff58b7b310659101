use std::collections::HashSet;
use std::io::Write;

use serde::Serialize;

/// Capabilities the surrounding framework lends to a module run.
pub trait Host {
    /// Informational message for the operator.
    fn alert(&mut self, message: &str);

    /// Error message for the operator. Defaults to a plain alert.
    fn error(&mut self, message: &str) {
        self.alert(message);
    }

    /// Store a discovered host. Returns how many rows were actually added
    /// (0 when the pair was already known or rejected).
    fn add_host(&mut self, hostname: &str, ip_address: &str) -> usize;
}

/// Trimmed, non-empty domains in first-seen order without duplicates.
pub fn distinct_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for d in domains {
        let d = d.as_ref().trim();
        if d.is_empty() {
            continue;
        }
        if seen.insert(d.to_string()) {
            out.push(d.to_string());
        }
    }
    out
}

/// Positional domains followed by the lines of a domains file, deduplicated.
pub fn gather_domains(positional: Vec<String>, file_data: Option<&str>) -> Vec<String> {
    let from_file = file_data.into_iter().flat_map(str::lines).map(str::to_string);
    distinct_domains(positional.into_iter().chain(from_file))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HostRow {
    pub hostname: String,
    pub ip_address: String,
}

/// In-process host used by the CLI and tests. Alerts go to `tracing` and are
/// kept for inspection; hosts are deduplicated on the (hostname, ip) pair.
#[derive(Debug, Default)]
pub struct MemoryHost {
    alerts: Vec<String>,
    errors: Vec<String>,
    hosts: Vec<HostRow>,
    index: HashSet<HostRow>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn hosts(&self) -> &[HostRow] {
        &self.hosts
    }

    /// Dump the host table as `hostname,ip_address` CSV.
    pub fn write_csv<W: Write>(&self, out: W) -> anyhow::Result<()> {
        let mut w = csv::Writer::from_writer(out);
        for row in &self.hosts {
            w.serialize(row)?;
        }
        w.flush()?;
        Ok(())
    }
}

impl Host for MemoryHost {
    fn alert(&mut self, message: &str) {
        tracing::info!("{}", message);
        self.alerts.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{}", message);
        self.errors.push(message.to_string());
    }

    fn add_host(&mut self, hostname: &str, ip_address: &str) -> usize {
        let row = HostRow {
            hostname: hostname.to_string(),
            ip_address: ip_address.to_string(),
        };
        if !self.index.insert(row.clone()) {
            tracing::debug!(hostname, ip_address, "duplicate host skipped");
            return 0;
        }
        self.hosts.push(row);
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_domains_keeps_order() {
        let got = distinct_domains(["b.com", " a.com ", "", "b.com", "  ", "c.com"]);
        assert_eq!(got, ["b.com", "a.com", "c.com"]);
    }

    #[test]
    fn gather_domains_appends_file_lines() {
        let file = "b.com\n\nc.com\r\na.com\n";
        let got = gather_domains(vec!["a.com".into(), "b.com".into()], Some(file));
        assert_eq!(got, ["a.com", "b.com", "c.com"]);
        assert_eq!(gather_domains(vec!["a.com".into()], None), ["a.com"]);
        assert!(gather_domains(vec![], Some("\n  \n")).is_empty());
    }

    #[test]
    fn memory_host_dedups_pairs() {
        let mut host = MemoryHost::new();
        assert_eq!(host.add_host("www.example.com", "192.0.2.1"), 1);
        assert_eq!(host.add_host("www.example.com", "192.0.2.1"), 0);
        assert_eq!(host.add_host("www.example.com", "192.0.2.2"), 1);
        assert_eq!(host.hosts().len(), 2);
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let mut host = MemoryHost::new();
        host.add_host("www.example.com", "192.0.2.1");
        let mut buf = Vec::new();
        host.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "hostname,ip_address\nwww.example.com,192.0.2.1\n");
    }

    #[test]
    fn errors_are_kept_apart_from_alerts() {
        let mut host = MemoryHost::new();
        host.alert("hello");
        host.error("boom");
        assert_eq!(host.alerts(), ["hello"]);
        assert_eq!(host.errors(), ["boom"]);
    }
}
