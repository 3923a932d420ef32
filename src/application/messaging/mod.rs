//! Message handling - routing, response selection, template rendering

pub mod router;
pub mod selector;
pub mod template;

pub use router::{CompetingBot, MessageRouter};
pub use selector::ResponseSelector;
pub use template::{render, RenderContext};
