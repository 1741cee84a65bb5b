pub mod consensus;
pub mod registry;

pub use consensus::{ConsensusResolver, HttpChainSource};
pub use registry::NodeRegistry;
