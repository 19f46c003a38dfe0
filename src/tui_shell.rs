use std::sync::Arc;

use anyhow::Result;

use crate::discovery::Deps;

mod app;
mod event_loop;
mod msg;
mod render;
mod router;
mod search;
mod tasks;
mod views;

use app::{App, Pane, Screen};
use msg::UiMsg;
use router::Action;
use search::Search;

pub(crate) fn run(deps: Arc<Deps>) -> Result<()> {
    app::run(deps)
}
