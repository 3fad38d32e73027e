use async_trait::async_trait;
use ferrous_lookup_domain::{DnsQuery, DomainError, DomainName, ResourceRecord};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct DnsResolution {
    pub answers: Vec<ResourceRecord>,
    /// Records from the AUTHORITY section of the final response.
    pub authority_records: Vec<ResourceRecord>,
    pub answered_by: SocketAddr,
    /// Transport calls spent, nested name server lookups included.
    pub queries_sent: usize,
}

impl DnsResolution {
    pub fn new(answers: Vec<ResourceRecord>, answered_by: SocketAddr) -> Self {
        Self {
            answers,
            authority_records: vec![],
            answered_by,
            queries_sent: 0,
        }
    }
}

/// Deadline and cancellation shared by everything one resolution does.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    deadline: Option<Instant>,
    shutdown: CancellationToken,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Fails if the resolution was cancelled or its deadline has passed.
    pub fn check(&self, domain: &DomainName) -> Result<(), DomainError> {
        if self.shutdown.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DomainError::DeadlineExceeded {
                domain: domain.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Drives `operation` unless cancellation or the deadline cuts it short.
    pub async fn run<F, T>(&self, domain: &DomainName, operation: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        self.check(domain)?;

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, operation)
                    .await
                    .map_err(|_| DomainError::DeadlineExceeded {
                        domain: domain.to_string(),
                    })?,
                None => operation.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(DomainError::Cancelled),
            result = bounded => result,
        }
    }
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(
        &self,
        query: &DnsQuery,
        ctx: &ResolutionContext,
    ) -> Result<DnsResolution, DomainError>;
}
