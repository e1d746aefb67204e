//! Click actions configured on a graph, resolved against handlers the host
//! registered up front.

use std::fmt;
use std::sync::Arc;

use data::context::ClickAction;
use data::{GraphId, Timestamp};
use rustc_hash::FxHashMap;

/// What the host should do after a graph was clicked.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Navigate(String),
    Handled { name: String },
    Unhandled { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Click<'a> {
    pub graph: &'a GraphId,
    pub time: Timestamp,
    pub args: &'a [serde_json::Value],
}

type Handler = Arc<dyn Fn(&Click<'_>) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ClickHandlers {
    handlers: FxHashMap<String, Handler>,
}

impl fmt::Debug for ClickHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ClickHandlers").field("handlers", &names).finish()
    }
}

impl ClickHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Click<'_>) + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn dispatch(&self, graph: &GraphId, action: &ClickAction, time: Timestamp) -> ClickOutcome {
        match action {
            ClickAction::Navigate { url } => ClickOutcome::Navigate(url.clone()),
            ClickAction::Callback { name, args } => match self.handlers.get(name) {
                Some(handler) => {
                    handler(&Click { graph, time, args });
                    ClickOutcome::Handled { name: name.clone() }
                }
                None => {
                    log::warn!("No click handler named {name} for graph {graph}");
                    ClickOutcome::Unhandled { name: name.clone() }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn callbacks_run_only_registered_handlers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handlers = ClickHandlers::new().register("select", {
            let seen = Arc::clone(&seen);
            move |click: &Click<'_>| {
                seen.lock().unwrap().push((click.graph.to_string(), click.time));
            }
        });
        let graph = GraphId::from("graph_2");

        let known = ClickAction::Callback {
            name: "select".to_string(),
            args: vec![serde_json::json!(3)],
        };
        let unknown = ClickAction::Callback {
            name: "alert".to_string(),
            args: Vec::new(),
        };

        assert_eq!(
            handlers.dispatch(&graph, &known, 1200.0),
            ClickOutcome::Handled {
                name: "select".to_string()
            }
        );
        assert_eq!(
            handlers.dispatch(&graph, &unknown, 1200.0),
            ClickOutcome::Unhandled {
                name: "alert".to_string()
            }
        );
        assert_eq!(*seen.lock().unwrap(), vec![("graph_2".to_string(), 1200.0)]);
    }

    #[test]
    fn navigation_is_passed_to_the_host() {
        let action = ClickAction::Navigate {
            url: "view.py?view_name=host".to_string(),
        };
        assert_eq!(
            ClickHandlers::new().dispatch(&GraphId::from("graph_1"), &action, 0.0),
            ClickOutcome::Navigate("view.py?view_name=host".to_string())
        );
    }
}
