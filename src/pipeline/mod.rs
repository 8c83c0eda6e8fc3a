//! Pipeline entry points for bot operations.
//!
//! - `filter_new`: Drop feed items already in the publish history
//! - `publish_new_items`: Post new items in order under a quota
//! - `Bot`: Wire it all together for one run

pub mod bot;
pub mod filter;
pub mod publish;

pub use bot::Bot;
pub use filter::filter_new;
pub use publish::{publish_new_items, PublishOutcome};
