/// Bot commands
pub mod commands;
/// Update dispatch and handlers
pub mod handlers;
/// Inline and reply keyboard builders
pub mod keyboards;
