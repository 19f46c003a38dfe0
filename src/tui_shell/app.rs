use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::discovery::Deps;
use crate::model::{ClusterRecord, KUBEADMIN_USER, login_command};
use crate::session::SessionCache;

use super::{Action, Search, UiMsg, event_loop, tasks};

pub(super) const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub(super) fn run(deps: Arc<Deps>) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("interactive console requires a terminal (TTY)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(deps, tx);
    // Start discovery right away so the cluster list is warm by the time the
    // operator opens it.
    app.start_discovery();
    let res = event_loop::run_loop(&mut terminal, &mut app, &rx);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Screen {
    MainMenu,
    ClusterList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Pane {
    List,
    Detail,
}

#[derive(Debug)]
pub(super) struct Notification {
    pub(super) text: String,
    pub(super) is_error: bool,
    pub(super) deadline: Instant,
}

/// What a selection change requires from the background. Decided
/// synchronously so the decision itself is testable without threads.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum FetchPlan {
    None,
    Detail(String),
    Credential(String),
}

pub(super) struct App {
    pub(super) deps: Arc<Deps>,
    pub(super) tx: Sender<UiMsg>,

    pub(super) screen: Screen,
    pub(super) menu_selected: usize,

    // Records and both caches are touched only on this thread.
    pub(super) records: Vec<ClusterRecord>,
    pub(super) cache: SessionCache,

    // Bumped on every full discovery; results from superseded batches are
    // discarded on arrival.
    pub(super) generation: u64,
    pub(super) loading: bool,
    pub(super) discovered: bool,

    pub(super) focused: Pane,
    pub(super) selected: usize,
    pub(super) search: Search,
    pub(super) detail_selected: usize,
    /// Cluster whose lazy detail fetch is in flight, if any.
    pub(super) detail_loading: Option<String>,
    /// Last failed detail fetch, keyed by cluster, so the pane can show the
    /// failure instead of a perpetual loading placeholder.
    pub(super) detail_error: Option<(String, String)>,
    /// Cluster being single-refreshed, if any.
    pub(super) refreshing: Option<String>,

    pub(super) notification: Option<Notification>,
    pub(super) error: Option<String>,
    pub(super) updated_at: Option<String>,

    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(deps: Arc<Deps>, tx: Sender<UiMsg>) -> Self {
        Self {
            deps,
            tx,
            screen: Screen::MainMenu,
            menu_selected: 0,
            records: Vec::new(),
            cache: SessionCache::default(),
            generation: 0,
            loading: false,
            discovered: false,
            focused: Pane::List,
            selected: 0,
            search: Search::default(),
            detail_selected: 0,
            detail_loading: None,
            detail_error: None,
            refreshing: None,
            notification: None,
            error: None,
            updated_at: None,
            quit: false,
        }
    }

    // ---- derived view state ----

    /// Indices of records visible under the current search filter.
    pub(super) fn visible_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.search.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    pub(super) fn selected_record(&self) -> Option<&ClusterRecord> {
        let visible = self.visible_indices();
        let idx = *visible.get(self.selected)?;
        self.records.get(idx)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_indices().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Field/value pairs shown in the detail pane; also the copy source.
    pub(super) fn detail_rows(&self) -> Vec<(String, String)> {
        let Some(record) = self.selected_record() else {
            return Vec::new();
        };
        if !record.accessible {
            return Vec::new();
        }
        let Some(detail) = self.cache.detail(&record.name) else {
            return Vec::new();
        };

        let mut rows = vec![
            ("OCP version".to_string(), detail.ocp_version.clone()),
            ("MTV version".to_string(), detail.mtv_display()),
            ("CNV version".to_string(), detail.cnv_version.clone()),
            ("Console URL".to_string(), detail.console_url.clone()),
            ("Username".to_string(), KUBEADMIN_USER.to_string()),
        ];
        if let Some(cred) = self.cache.credential(&record.name) {
            rows.push(("Password".to_string(), cred.password.clone()));
            rows.push((
                "Login command".to_string(),
                login_command(&self.deps.config.api_url(&record.name), &cred.password),
            ));
        }
        rows
    }

    // ---- transitions ----

    pub(super) fn handle_action(&mut self, action: Action) {
        match action {
            Action::Noop => {}
            Action::Quit => self.quit = true,

            Action::MenuUp => self.menu_selected = self.menu_selected.saturating_sub(1),
            Action::MenuDown => {
                // Single menu entry today; clamp anyway.
                self.menu_selected = (self.menu_selected + 1).min(0);
            }
            Action::MenuSelect => {
                self.screen = Screen::ClusterList;
                if !self.discovered && !self.loading {
                    self.start_discovery();
                } else {
                    self.on_selection_changed();
                }
            }

            Action::Back => {
                if self.search.active {
                    self.search.reset();
                    self.clamp_selection();
                    self.on_selection_changed();
                } else {
                    self.screen = Screen::MainMenu;
                    self.focused = Pane::List;
                    self.error = None;
                }
            }

            Action::MoveUp => self.move_cursor(-1),
            Action::MoveDown => self.move_cursor(1),

            Action::ToggleFocus => {
                self.focused = match self.focused {
                    Pane::List => Pane::Detail,
                    Pane::Detail => Pane::List,
                };
                self.detail_selected = 0;
            }

            Action::EnterSearch => self.search.active = true,
            Action::SearchChar(c) => {
                self.search.query.push(c);
                self.clamp_selection();
                self.on_selection_changed();
            }
            Action::SearchBackspace => {
                self.search.query.pop();
                self.clamp_selection();
                self.on_selection_changed();
            }

            Action::FullRefresh => self.start_discovery(),
            Action::SingleRefresh => self.single_refresh(),
            Action::CopySelected => self.copy_selected(),
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        match self.focused {
            Pane::List => {
                let len = self.visible_indices().len();
                if len == 0 {
                    return;
                }
                let old = self.selected;
                let new = (self.selected as i64 + delta).clamp(0, len as i64 - 1) as usize;
                self.selected = new;
                if new != old {
                    self.on_selection_changed();
                }
            }
            Pane::Detail => {
                let len = self.detail_rows().len();
                if len == 0 {
                    return;
                }
                self.detail_selected =
                    (self.detail_selected as i64 + delta).clamp(0, len as i64 - 1) as usize;
            }
        }
    }

    /// Start (or restart) a full discovery batch: new generation, both caches
    /// dropped, every row back to Loading.
    pub(super) fn start_discovery(&mut self) {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.search.reset();
        self.cache.invalidate_all();
        self.detail_loading = None;
        self.detail_error = None;
        self.refreshing = None;
        self.focused = Pane::List;
        for record in &mut self.records {
            *record = ClusterRecord::loading(&record.name);
        }
        tasks::spawn_discovery(Arc::clone(&self.deps), self.tx.clone(), self.generation);
    }

    fn single_refresh(&mut self) {
        let Some(record) = self.selected_record() else {
            self.notify("No cluster selected".to_string(), true);
            return;
        };
        if !record.accessible {
            self.notify("Cannot refresh an inaccessible cluster".to_string(), true);
            return;
        }
        let name = record.name.clone();

        self.cache.invalidate(&name);
        self.detail_loading = None;
        if self.detail_error.as_ref().is_some_and(|(c, _)| *c == name) {
            self.detail_error = None;
        }
        if let Some(record) = self.records.iter_mut().find(|r| r.name == name) {
            *record = ClusterRecord {
                accessible: true,
                ..ClusterRecord::loading(&name)
            };
        }
        self.refreshing = Some(name.clone());
        tasks::spawn_single_refresh(
            Arc::clone(&self.deps),
            self.tx.clone(),
            self.generation,
            name.clone(),
        );
        self.notify(format!("Refreshing {}...", name), false);
    }

    fn copy_selected(&mut self) {
        let rows = self.detail_rows();
        if rows.is_empty() {
            self.notify("No cluster details available".to_string(), true);
            return;
        }
        let idx = self.detail_selected.min(rows.len() - 1);
        let (field, value) = rows[idx].clone();
        tasks::spawn_copy(Arc::clone(&self.deps), self.tx.clone(), field, value);
    }

    /// Decide what (if anything) the new selection needs fetched. Records
    /// that are not accessible never dispatch anything; the pane simply has
    /// no cache entry to render.
    pub(super) fn selection_plan(&mut self) -> FetchPlan {
        let name = match self.selected_record() {
            Some(record) if record.accessible => record.name.clone(),
            _ => {
                self.detail_loading = None;
                return FetchPlan::None;
            }
        };

        if self.cache.detail(&name).is_some() {
            self.detail_loading = None;
            if self.cache.credential(&name).is_none() {
                return FetchPlan::Credential(name);
            }
            return FetchPlan::None;
        }

        // Single-flight: don't re-dispatch while this cluster's fetch runs.
        if self.detail_loading.as_deref() == Some(name.as_str()) {
            return FetchPlan::None;
        }
        // Re-selecting a cluster whose last fetch failed retries it.
        if self.detail_error.as_ref().is_some_and(|(c, _)| *c == name) {
            self.detail_error = None;
        }
        self.detail_loading = Some(name.clone());
        FetchPlan::Detail(name)
    }

    pub(super) fn on_selection_changed(&mut self) {
        self.detail_selected = 0;
        match self.selection_plan() {
            FetchPlan::None => {}
            FetchPlan::Detail(name) => {
                tasks::spawn_detail_fetch(
                    Arc::clone(&self.deps),
                    self.tx.clone(),
                    self.generation,
                    name,
                );
            }
            FetchPlan::Credential(name) => {
                tasks::spawn_credential_fetch(
                    Arc::clone(&self.deps),
                    self.tx.clone(),
                    self.generation,
                    name,
                );
            }
        }
    }

    pub(super) fn notify(&mut self, text: String, is_error: bool) {
        self.notification = Some(Notification {
            text,
            is_error,
            deadline: Instant::now() + NOTIFICATION_TTL,
        });
        tasks::spawn_notification_timer(self.tx.clone());
    }

    // ---- message consumption ----

    pub(super) fn apply(&mut self, msg: UiMsg) {
        match msg {
            UiMsg::CandidatesListed { generation, names } => {
                if generation != self.generation {
                    return;
                }
                self.records = names.iter().map(|n| ClusterRecord::loading(n)).collect();
                self.selected = 0;
            }

            UiMsg::BatchFinished {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    return;
                }
                self.loading = false;
                self.discovered = true;
                self.records = outcome.records;
                for (_, detail) in outcome.details {
                    self.cache.insert_detail(detail);
                }
                self.updated_at = Some(now_stamp());
                self.selected = 0;
                self.on_selection_changed();
            }

            UiMsg::BatchFailed { generation, error } => {
                if generation != self.generation {
                    return;
                }
                self.loading = false;
                self.discovered = true;
                self.records.clear();
                self.error = Some(error);
            }

            UiMsg::SingleRefreshFinished {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    return;
                }
                let name = outcome.record.name.clone();
                if self.refreshing.as_deref() == Some(name.as_str()) {
                    self.refreshing = None;
                }
                if let Some(record) = self.records.iter_mut().find(|r| r.name == name) {
                    *record = outcome.record;
                }
                if let Some(detail) = outcome.detail {
                    self.cache.insert_detail(detail);
                }
                if let Some(credential) = outcome.credential {
                    self.cache.insert_credential(&name, credential);
                }
                match outcome.error {
                    Some(err) => self.notify(format!("Failed to refresh {}: {}", name, err), true),
                    None => self.notify(format!("{} refreshed", name), false),
                }
            }

            UiMsg::DetailLoaded {
                generation,
                cluster,
                result,
            } => {
                // A full refresh since dispatch invalidated everything this
                // fetch knows; its result must not repopulate the cache.
                if generation != self.generation {
                    return;
                }
                if self.detail_loading.as_deref() == Some(cluster.as_str()) {
                    self.detail_loading = None;
                }
                match result {
                    Ok((detail, credential)) => {
                        self.cache.insert_detail(detail);
                        self.cache.insert_credential(&cluster, credential);
                    }
                    Err(err) => {
                        self.error = Some(format!("Failed to load {} details: {}", cluster, err));
                        self.detail_error = Some((cluster, err));
                    }
                }
            }

            UiMsg::CredentialLoaded {
                generation,
                cluster,
                result,
            } => {
                if generation != self.generation {
                    return;
                }
                match result {
                    Ok(credential) => self.cache.insert_credential(&cluster, credential),
                    Err(err) => {
                        self.error = Some(format!("Failed to read {} password: {}", cluster, err));
                    }
                }
            }

            UiMsg::CopyFinished { field, result } => match result {
                Ok(()) => self.notify(format!("Copied {}", field), false),
                Err(err) => self.notify(format!("Failed to copy: {}", err), true),
            },

            UiMsg::NotificationExpired => {
                if let Some(n) = &self.notification {
                    if Instant::now() >= n.deadline {
                        self.notification = None;
                    }
                }
            }
        }
    }
}

pub(super) fn now_stamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map(|s| s.get(11..19).unwrap_or(&s).to_string())
        .unwrap_or_default()
}
