pub mod assistant;
pub mod matcher;
pub mod resolver;
pub mod responder;
pub mod source;

pub use assistant::Assistant;
