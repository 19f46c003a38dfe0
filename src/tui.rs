use std::sync::Arc;

use anyhow::Result;

use crate::discovery::Deps;

/// Run the interactive console against the given collaborators.
pub fn run(deps: Arc<Deps>) -> Result<()> {
    crate::tui_shell::run(deps)
}
