/// Source of transaction ids for outgoing queries.
pub trait QueryIdGenerator: Send + Sync {
    fn next_id(&self) -> u16;
}
