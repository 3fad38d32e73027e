mod iterative_resolver;

pub use iterative_resolver::{IterativeResolver, ResolverLimits, DEFAULT_ROOT_SERVER};
