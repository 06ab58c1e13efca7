pub mod close;
pub mod embeds;
pub mod range;
pub mod stats;
