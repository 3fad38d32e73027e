use ferrous_lookup_application::services::{IterativeResolver, ResolverLimits};
use ferrous_lookup_application::use_cases::{HandleDnsQueryUseCase, LookupUseCase};
use ferrous_lookup_domain::Config;
use ferrous_lookup_infrastructure::dns::{RandomQueryId, RetryPolicy, UdpTransport};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Resolver stack wired from configuration.
pub struct DnsServices {
    pub resolver: Arc<IterativeResolver>,
    pub root_server: SocketAddr,
    pub resolution_timeout: Option<Duration>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let root_server = config.resolver.root_server_addr()?;
        let policy = RetryPolicy::from(&config.transport);
        let limits = ResolverLimits::from(&config.resolver);

        info!(
            root_server = %root_server,
            max_hops = limits.max_hops,
            max_nesting_depth = limits.max_nesting_depth,
            max_attempts = policy.max_attempts,
            attempt_timeout_ms = policy.attempt_timeout.as_millis() as u64,
            "Initializing iterative resolver"
        );

        let resolver = IterativeResolver::new(
            Arc::new(UdpTransport::new(policy)),
            Arc::new(RandomQueryId),
            root_server,
        )
        .with_limits(limits);

        Ok(Self {
            resolver: Arc::new(resolver),
            root_server,
            resolution_timeout: config.resolver.resolution_timeout(),
        })
    }

    pub fn lookup_use_case(&self) -> LookupUseCase {
        LookupUseCase::new(self.resolver.clone())
    }

    pub fn handler_use_case(&self, shutdown: CancellationToken) -> Arc<HandleDnsQueryUseCase> {
        Arc::new(
            HandleDnsQueryUseCase::new(self.resolver.clone())
                .with_resolution_timeout(self.resolution_timeout)
                .with_cancellation(shutdown),
        )
    }
}
