mod handle_dns_query;
mod lookup;

pub use handle_dns_query::HandleDnsQueryUseCase;
pub use lookup::LookupUseCase;
