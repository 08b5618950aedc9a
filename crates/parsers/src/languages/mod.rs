/// Language front ends for the SAST engine.
///
/// Each front end is a module exposing a `parse_<language>` function that
/// turns source text into the engine's syntax tree.
pub mod php;
pub use php::parse_php;
