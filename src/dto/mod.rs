/// Session notifications and their stable names.
pub mod events;
/// Serialisable session snapshot.
pub mod session;
