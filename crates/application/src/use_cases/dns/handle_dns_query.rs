use crate::ports::{DnsResolver, ResolutionContext};
use ferrous_lookup_domain::wire::{decode_message, encode_message};
use ferrous_lookup_domain::{DomainError, Message, MessageBuilder, ResponseCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Turns one inbound query datagram into the reply datagram.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
    resolution_timeout: Option<Duration>,
    shutdown: CancellationToken,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            resolver,
            resolution_timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_resolution_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolution_timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Returns the encoded reply, or an error when the datagram is not a
    /// well-formed single-question query and should be dropped.
    ///
    /// Resolution failures do not surface here: they become SERVFAIL replies
    /// carrying the query's id.
    pub async fn execute(&self, datagram: &[u8]) -> Result<Vec<u8>, DomainError> {
        let start = Instant::now();
        let request = decode_message(datagram)?;

        if request.header().is_response() {
            return Err(DomainError::malformed("datagram is a response, not a query"));
        }
        let question = match request.questions() {
            [question] => question,
            questions => {
                return Err(DomainError::malformed(format!(
                    "expected exactly one question, got {}",
                    questions.len()
                )))
            }
        };
        let query = question.to_query();

        let ctx = self.context();
        let response = match self.resolver.resolve(&query, &ctx).await {
            Ok(resolution) => {
                debug!(
                    id = request.id(),
                    domain = %query.domain,
                    record_type = %query.record_type,
                    answers = resolution.answers.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Query resolved"
                );
                MessageBuilder::response_to(&request)
                    .recursion_available(true)
                    .answers(resolution.answers)
                    .authorities(resolution.authority_records)
                    .build()
            }
            Err(e) => {
                warn!(
                    id = request.id(),
                    domain = %query.domain,
                    record_type = %query.record_type,
                    error = %e,
                    "Resolution failed, replying SERVFAIL"
                );
                servfail(&request)
            }
        };

        match encode_message(&response) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(id = request.id(), error = %e, "Failed to encode reply, replying SERVFAIL");
                encode_message(&servfail(&request))
            }
        }
    }

    fn context(&self) -> ResolutionContext {
        let ctx = ResolutionContext::new().with_cancellation(self.shutdown.child_token());
        match self.resolution_timeout {
            Some(timeout) => ctx.with_deadline(tokio::time::Instant::now() + timeout),
            None => ctx,
        }
    }
}

fn servfail(request: &Message) -> Message {
    MessageBuilder::response_to(request)
        .recursion_available(true)
        .response_code(ResponseCode::ServFail)
        .build()
}
