/// Guild channel lookups and HTTP error classification.
pub mod channels;
/// Generic embed builders shared across commands.
pub mod embed;
/// Interaction response helpers for slash commands and components.
pub mod interaction;
/// Button-driven pagination sessions.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
