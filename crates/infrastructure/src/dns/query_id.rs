use ferrous_lookup_application::ports::QueryIdGenerator;

/// Draws a fresh random id for every query.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomQueryId;

impl QueryIdGenerator for RandomQueryId {
    fn next_id(&self) -> u16 {
        fastrand::u16(..)
    }
}
