use crate::ports::{DnsResolution, DnsResolver, ResolutionContext};
use ferrous_lookup_domain::{DnsQuery, DomainError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// One top-level resolution, as run by the `lookup` command.
pub struct LookupUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl LookupUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(
        &self,
        query: &DnsQuery,
        ctx: &ResolutionContext,
    ) -> Result<DnsResolution, DomainError> {
        let start = Instant::now();

        match self.resolver.resolve(query, ctx).await {
            Ok(resolution) => {
                info!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    answers = resolution.answers.len(),
                    answered_by = %resolution.answered_by,
                    queries_sent = resolution.queries_sent,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Lookup completed"
                );
                Ok(resolution)
            }
            Err(e) => {
                warn!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Lookup failed"
                );
                Err(e)
            }
        }
    }
}
