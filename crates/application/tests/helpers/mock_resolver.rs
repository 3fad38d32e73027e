#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_lookup_application::ports::{DnsResolution, DnsResolver, ResolutionContext};
use ferrous_lookup_domain::{DnsQuery, DomainError};
use std::sync::Mutex;

pub struct MockDnsResolver {
    result: Result<DnsResolution, DomainError>,
    queries: Mutex<Vec<DnsQuery>>,
}

impl MockDnsResolver {
    pub fn answering(resolution: DnsResolution) -> Self {
        Self {
            result: Ok(resolution),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            result: Err(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<DnsQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(
        &self,
        query: &DnsQuery,
        _ctx: &ResolutionContext,
    ) -> Result<DnsResolution, DomainError> {
        self.queries.lock().unwrap().push(query.clone());
        self.result.clone()
    }
}
