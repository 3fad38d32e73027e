use crate::ports::{
    DnsResolution, DnsResolver, DnsTransport, QueryIdGenerator, ResolutionContext,
};
use async_trait::async_trait;
use ferrous_lookup_domain::config::ResolverConfig;
use ferrous_lookup_domain::wire::{decode_message, encode_query};
use ferrous_lookup_domain::{DnsQuery, DomainError, DomainName, Message, RData, RecordType};
use futures::future::{BoxFuture, FutureExt};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// a.root-servers.net
pub const DEFAULT_ROOT_SERVER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(198, 41, 0, 4)), 53);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverLimits {
    /// Transport calls per top-level resolution, shared with nested lookups.
    pub max_hops: usize,
    /// How many glue-less name server lookups may be stacked.
    pub max_nesting_depth: usize,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self {
            max_hops: 32,
            max_nesting_depth: 4,
        }
    }
}

impl From<&ResolverConfig> for ResolverLimits {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            max_nesting_depth: config.max_nesting_depth,
        }
    }
}

struct HopBudget {
    limit: usize,
    spent: AtomicUsize,
}

impl HopBudget {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            spent: AtomicUsize::new(0),
        }
    }

    fn try_spend(&self) -> bool {
        self.spent
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |spent| {
                (spent < self.limit).then_some(spent + 1)
            })
            .is_ok()
    }

    fn spent(&self) -> usize {
        self.spent.load(Ordering::Relaxed)
    }
}

enum Delegation<'m> {
    Glue {
        nameserver: &'m DomainName,
        server: SocketAddr,
    },
    Glueless(&'m DomainName),
}

/// Walks the delegation chain from the root, one server at a time.
///
/// Referrals are followed through their glue; a referral without glue
/// starts a nested resolution of the name server's address from the root.
/// Every exchange draws from one hop budget, so a top-level resolution never
/// makes more than `max_hops` transport calls.
pub struct IterativeResolver {
    transport: Arc<dyn DnsTransport>,
    query_ids: Arc<dyn QueryIdGenerator>,
    root_server: SocketAddr,
    limits: ResolverLimits,
}

impl IterativeResolver {
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        query_ids: Arc<dyn QueryIdGenerator>,
        root_server: SocketAddr,
    ) -> Self {
        Self {
            transport,
            query_ids,
            root_server,
            limits: ResolverLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResolverLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn root_server(&self) -> SocketAddr {
        self.root_server
    }

    pub fn limits(&self) -> ResolverLimits {
        self.limits
    }

    fn walk<'a>(
        &'a self,
        query: &'a DnsQuery,
        ctx: &'a ResolutionContext,
        budget: &'a HopBudget,
        depth: usize,
    ) -> BoxFuture<'a, Result<DnsResolution, DomainError>> {
        async move {
            let mut server = self.root_server;

            loop {
                let response = self.exchange(query, server, ctx, budget).await?;

                if !response.answers().is_empty() {
                    info!(
                        domain = %query.domain,
                        record_type = %query.record_type,
                        server = %server,
                        answers = response.answers().len(),
                        depth = depth,
                        "Answer received"
                    );
                    let (answers, authority_records, _) = response.into_sections();
                    return Ok(DnsResolution {
                        answers,
                        authority_records,
                        answered_by: server,
                        queries_sent: budget.spent(),
                    });
                }

                server = match self.delegation(query, server, &response)? {
                    Delegation::Glue {
                        nameserver,
                        server: next,
                    } => {
                        info!(
                            domain = %query.domain,
                            nameserver = %nameserver,
                            next = %next,
                            "Following referral"
                        );
                        next
                    }
                    Delegation::Glueless(nameserver) => {
                        let next = self
                            .resolve_nameserver(nameserver, ctx, budget, depth)
                            .await?;
                        if next == server {
                            warn!(
                                domain = %query.domain,
                                nameserver = %nameserver,
                                server = %server,
                                "Name server resolves back to the referring server"
                            );
                            return Err(DomainError::NoDelegation {
                                domain: query.domain.to_string(),
                                server,
                            });
                        }
                        next
                    }
                };
            }
        }
        .boxed()
    }

    async fn exchange(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        ctx: &ResolutionContext,
        budget: &HopBudget,
    ) -> Result<Message, DomainError> {
        if !budget.try_spend() {
            warn!(
                domain = %query.domain,
                hops = budget.spent(),
                "Hop budget exhausted"
            );
            return Err(DomainError::HopLimitExceeded {
                domain: query.domain.to_string(),
                hops: budget.spent(),
            });
        }

        let id = self.query_ids.next_id();
        let request = encode_query(id, query);

        info!(
            domain = %query.domain,
            record_type = %query.record_type,
            server = %server,
            hop = budget.spent(),
            "Querying name server"
        );

        let response = ctx
            .run(&query.domain, self.transport.send(server, &request))
            .await?;

        let message = decode_message(&response.bytes).map_err(|e| e.from_server(server))?;
        if message.id() != id {
            return Err(DomainError::MalformedResponse {
                server,
                reason: format!("reply id {} does not match query id {}", message.id(), id),
            });
        }

        debug!(
            server = %server,
            protocol = response.protocol_used,
            answers = message.answers().len(),
            authorities = message.authorities().len(),
            additionals = message.additionals().len(),
            "Response decoded"
        );

        Ok(message)
    }

    fn delegation<'m>(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        response: &'m Message,
    ) -> Result<Delegation<'m>, DomainError> {
        let no_delegation = || DomainError::NoDelegation {
            domain: query.domain.to_string(),
            server,
        };

        let nameservers: Vec<&DomainName> = response
            .authorities()
            .iter()
            .filter_map(|record| match &record.rdata {
                RData::Ns(target) => Some(target),
                _ => None,
            })
            .collect();
        let first = *nameservers.first().ok_or_else(no_delegation)?;

        for nameserver in nameservers.iter().copied() {
            if let Some(glue) = find_glue(response, nameserver) {
                let next = SocketAddr::new(IpAddr::V4(glue), self.root_server.port());
                if next == server {
                    warn!(
                        domain = %query.domain,
                        nameserver = %nameserver,
                        server = %server,
                        "Referral points back at the queried server"
                    );
                    return Err(no_delegation());
                }
                return Ok(Delegation::Glue {
                    nameserver,
                    server: next,
                });
            }
        }

        Ok(Delegation::Glueless(first))
    }

    async fn resolve_nameserver(
        &self,
        nameserver: &DomainName,
        ctx: &ResolutionContext,
        budget: &HopBudget,
        depth: usize,
    ) -> Result<SocketAddr, DomainError> {
        if depth >= self.limits.max_nesting_depth {
            warn!(
                nameserver = %nameserver,
                depth = depth,
                "Name server lookups nested too deeply"
            );
            return Err(DomainError::HopLimitExceeded {
                domain: nameserver.to_string(),
                hops: budget.spent(),
            });
        }

        info!(
            nameserver = %nameserver,
            depth = depth + 1,
            "No glue for name server, resolving its address from the root"
        );

        let nested = DnsQuery::new(nameserver.clone(), RecordType::A);
        let resolution = self
            .walk(&nested, ctx, budget, depth + 1)
            .await
            .map_err(|e| match e {
                DomainError::HopLimitExceeded { .. }
                | DomainError::DeadlineExceeded { .. }
                | DomainError::Cancelled => e,
                other => DomainError::NestedResolution {
                    nameserver: nameserver.to_string(),
                    source: Box::new(other),
                },
            })?;

        let address = resolution
            .answers
            .iter()
            .find_map(|record| record.rdata.as_ipv4())
            .ok_or_else(|| DomainError::NameserverAddressNotFound {
                nameserver: nameserver.to_string(),
            })?;

        Ok(SocketAddr::new(IpAddr::V4(address), self.root_server.port()))
    }
}

/// Address record in the additional section owned by `nameserver`.
fn find_glue(response: &Message, nameserver: &DomainName) -> Option<Ipv4Addr> {
    response
        .additionals()
        .iter()
        .filter(|record| &record.name == nameserver)
        .find_map(|record| record.rdata.as_ipv4())
}

#[async_trait]
impl DnsResolver for IterativeResolver {
    async fn resolve(
        &self,
        query: &DnsQuery,
        ctx: &ResolutionContext,
    ) -> Result<DnsResolution, DomainError> {
        let budget = HopBudget::new(self.limits.max_hops);
        self.walk(query, ctx, &budget, 0).await
    }
}
