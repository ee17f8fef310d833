//! Scenario replay against the simulated browser.
//!
//! A scenario is a JSON script of host actions and commands. Windows are
//! referred to by the name given when they were opened, or by numeric id.
//! Lifecycle events are applied after every step, as the host would deliver
//! them between commands.

use crate::api::WindowRing;
use crate::commands::Command;
use crate::config::MAX_SETTLE_DELAY_MS;
use crate::error::ApiError;
use crate::labels::WindowSummary;
use crate::platform::{SimulatedBrowser, WindowPlatform};
use crate::store::{KeyValueStore, MemoryKeyValueStore};
use crate::types::{WindowId, WindowKind, WindowOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub settle_delay_ms: u64,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum WindowRef {
    Id(WindowId),
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    Open {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        kind: WindowKind,
        #[serde(default)]
        tabs: Vec<String>,
    },
    Close {
        window: WindowRef,
    },
    /// The user switches windows
    Focus {
        window: WindowRef,
    },
    /// Select tabs by position; the first becomes active
    Highlight {
        window: WindowRef,
        tabs: Vec<usize>,
    },
    Activate {
        window: WindowRef,
        tab: usize,
    },
    Command {
        command: Command,
    },
    Reorder {
        windows: Vec<WindowRef>,
    },
    Label {
        window: WindowRef,
        label: String,
    },
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let scenario: Self = serde_json::from_str(json)
            .map_err(|e| ApiError::InvalidArgument(format!("Invalid scenario: {e}")))?;
        if scenario.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ApiError::InvalidArgument(format!(
                "Invalid scenario: settle_delay_ms {} exceeds {}",
                scenario.settle_delay_ms, MAX_SETTLE_DELAY_MS
            )));
        }
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ApiError::InvalidArgument(format!("Cannot read scenario {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// What one step did
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub action: String,
    pub result: String,
    /// Persisted order after the step and its lifecycle events
    pub order: WindowOrder,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepRecord>,
    pub windows: Vec<WindowSummary>,
    pub focused: Option<WindowId>,
}

/// Replay `scenario` on a fresh simulated browser and in-memory store.
pub async fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport, ApiError> {
    run_scenario_with_store(scenario, Arc::new(MemoryKeyValueStore::new())).await
}

/// Replay `scenario` on a fresh simulated browser, persisting to `backend`.
///
/// Host actions that name unknown windows abort the run. Commands never do;
/// their failures are recorded the way the dispatcher would log them.
pub async fn run_scenario_with_store(
    scenario: &Scenario,
    backend: Arc<dyn KeyValueStore>,
) -> Result<ScenarioReport, ApiError> {
    let browser = Arc::new(SimulatedBrowser::new());
    let ring = WindowRing::new(browser.clone(), backend, scenario.settle_delay());
    let listener = ring.lifecycle();
    let mut events = browser.subscribe();
    let mut runner = Runner {
        browser: &browser,
        ring: &ring,
        names: HashMap::new(),
    };

    info!(steps = scenario.steps.len(), "Replaying scenario");
    let mut records = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let (action, result) = runner.apply(step).await?;
        let handled = listener.drain(&mut events).await;
        debug!(index, action = %action, events = handled, "Scenario step applied");
        records.push(StepRecord {
            index,
            action,
            result,
            order: ring.store().read_order().await?.unwrap_or_default(),
        });
    }

    Ok(ScenarioReport {
        steps: records,
        windows: ring.window_summaries().await?,
        focused: browser.focused(),
    })
}

struct Runner<'a> {
    browser: &'a SimulatedBrowser,
    ring: &'a WindowRing,
    names: HashMap<String, WindowId>,
}

impl Runner<'_> {
    fn resolve(&self, window: &WindowRef) -> Result<WindowId, ApiError> {
        match window {
            WindowRef::Id(id) => Ok(*id),
            WindowRef::Name(name) => self.names.get(name).copied().ok_or_else(|| {
                ApiError::InvalidArgument(format!("Unknown window name: {name}"))
            }),
        }
    }

    async fn apply(&mut self, step: &Step) -> Result<(String, String), ApiError> {
        let done = |action: String| -> Result<(String, String), ApiError> {
            Ok((action, "ok".to_string()))
        };
        match step {
            Step::Open { name, kind, tabs } => {
                let titles: Vec<&str> = tabs.iter().map(String::as_str).collect();
                let id = self.browser.open_window(*kind, &titles);
                if let Some(name) = name {
                    self.names.insert(name.clone(), id);
                }
                Ok((
                    format!("open {} ({} tabs)", name.as_deref().unwrap_or("window"), tabs.len()),
                    format!("window {id}"),
                ))
            }
            Step::Close { window } => {
                let id = self.resolve(window)?;
                self.browser.close_window(id)?;
                done(format!("close {id}"))
            }
            Step::Focus { window } => {
                let id = self.resolve(window)?;
                self.browser.set_focused(id)?;
                done(format!("focus {id}"))
            }
            Step::Highlight { window, tabs } => {
                let id = self.resolve(window)?;
                self.browser.set_highlighted(id, tabs)?;
                if let Some(first) = tabs.first() {
                    self.browser.set_active(id, *first)?;
                }
                done(format!("highlight {id} {tabs:?}"))
            }
            Step::Activate { window, tab } => {
                let id = self.resolve(window)?;
                self.browser.set_active(id, *tab)?;
                self.browser.set_highlighted(id, &[*tab])?;
                done(format!("activate {id} tab {tab}"))
            }
            Step::Command { command } => {
                let result = match self.ring.execute(*command).await {
                    Ok(outcome) => outcome.to_string(),
                    Err(e) => format!("failed: {e}"),
                };
                Ok((command.to_string(), result))
            }
            Step::Reorder { windows } => {
                let ids = windows
                    .iter()
                    .map(|window| self.resolve(window))
                    .collect::<Result<Vec<_>, _>>()?;
                let saved = self.ring.save_order(&ids).await?;
                Ok((
                    format!("reorder {ids:?}"),
                    if saved { "saved" } else { "ignored" }.to_string(),
                ))
            }
            Step::Label { window, label } => {
                let id = self.resolve(window)?;
                let applied = self.ring.rename_window(id, label).await?;
                Ok((
                    format!("label {id}"),
                    applied.unwrap_or_else(|| "cleared".to_string()),
                ))
            }
        }
    }
}
