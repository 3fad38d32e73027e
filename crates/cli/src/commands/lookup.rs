use crate::di::DnsServices;
use ferrous_lookup_application::ports::ResolutionContext;
use ferrous_lookup_domain::{DnsQuery, DomainError, RecordType};
use std::io::Write;

/// Resolves one name and prints the answers, one record per line.
pub async fn lookup(services: &DnsServices, domain: &str, record_type: &str) -> anyhow::Result<()> {
    let record_type = parse_cli_type(record_type)?;
    let query = DnsQuery::parse(domain, record_type)?;

    let ctx = match services.resolution_timeout {
        Some(timeout) => ResolutionContext::with_timeout(timeout),
        None => ResolutionContext::new(),
    };

    println!("Root server: {}", services.root_server);

    let resolution = services.lookup_use_case().execute(&query, &ctx).await?;

    let mut stdout = std::io::stdout().lock();
    for record in &resolution.answers {
        writeln!(stdout, "{}", record)?;
    }
    Ok(())
}

/// Only the five resolvable types are accepted on the command line.
fn parse_cli_type(value: &str) -> Result<RecordType, DomainError> {
    match value.parse::<RecordType>() {
        Ok(RecordType::Unknown(_)) | Err(_) => Err(DomainError::UnsupportedRecord(format!(
            "Unsupported record type: {}",
            value
        ))),
        Ok(record_type) => Ok(record_type),
    }
}
