//! Command interpretation
//!
//! An invocation carries at most one pending action, either an explicit
//! submit or a `toggle=<id>` / `delete=<id>` pair embedded in the current
//! location. The interpreter validates it, applies it with the mutator,
//! saves the result and reports whether the view must be redrawn.
//!
//! Precedence when several are present: submit, then toggle, then delete.
//! Everything else is dropped.

use crate::error::{ListError, Result};
use crate::model::{Catalog, ItemId, Table};
use crate::mutate;
use crate::store::RowStore;
use crate::view::{project, GroupedView};

pub const MSG_NO_STORE: &str = "Please select a store.";
pub const MSG_NO_CATEGORY: &str = "Please select a category.";

const TOGGLE_KEY: &str = "toggle";
const DELETE_KEY: &str = "delete";

/// A user-issued request against the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        item: String,
        category: Option<String>,
        store: Option<String>,
    },
    Toggle {
        id: ItemId,
    },
    Delete {
        id: ItemId,
    },
    ClearPurchased,
    ClearAll,
}

// ============================================
// LINK PARAMETERS
// ============================================

/// Location split into base, query and fragment
struct Location<'a> {
    base: &'a str,
    query: &'a str,
    fragment: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// Accepts a full location (`/list?toggle=3`), a bare query (`?toggle=3`)
    /// or just the pairs (`toggle=3`)
    fn split(location: &'a str) -> Self {
        let (rest, fragment) = match location.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag)),
            None => (location, None),
        };
        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, query),
            None if rest.contains('=') => ("", rest),
            None => (rest, ""),
        };
        Self {
            base,
            query,
            fragment,
        }
    }

    fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
    }
}

/// Command parameters decoded from a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParams {
    location: String,
    pub toggle: Option<ItemId>,
    pub delete: Option<ItemId>,
    present: bool,
}

impl LinkParams {
    /// Malformed ids count as absent; the first occurrence of a key wins
    pub fn parse(location: &str) -> Self {
        let mut toggle = None;
        let mut delete = None;
        let mut present = false;
        let mut seen_toggle = false;
        let mut seen_delete = false;

        for (key, value) in Location::split(location).pairs() {
            match key {
                TOGGLE_KEY if !seen_toggle => {
                    seen_toggle = true;
                    present = true;
                    toggle = value.parse::<ItemId>().ok();
                }
                DELETE_KEY if !seen_delete => {
                    seen_delete = true;
                    present = true;
                    delete = value.parse::<ItemId>().ok();
                }
                _ => {}
            }
        }

        if present && toggle.is_none() && delete.is_none() {
            tracing::debug!("Ignoring malformed command parameters in {:?}", location);
        }

        Self {
            location: location.to_string(),
            toggle,
            delete,
            present,
        }
    }

    /// Whether any command key appeared, valid or not
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Toggle wins over delete
    pub fn command(&self) -> Option<Command> {
        self.toggle
            .map(|id| Command::Toggle { id })
            .or_else(|| self.delete.map(|id| Command::Delete { id }))
    }

    /// The location with command keys removed, so a reload cannot replay them
    pub fn consumed(&self) -> String {
        consume_location(&self.location)
    }
}

pub fn consume_location(location: &str) -> String {
    let parts = Location::split(location);
    let kept: Vec<String> = parts
        .pairs()
        .filter(|(key, _)| *key != TOGGLE_KEY && *key != DELETE_KEY)
        .map(|(key, value)| {
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect();

    let mut out = parts.base.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

// ============================================
// REQUESTS & OUTCOMES
// ============================================

/// Everything pending for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub submit: Option<Command>,
    pub link: Option<LinkParams>,
}

impl Request {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn submit(command: Command) -> Self {
        Self {
            submit: Some(command),
            link: None,
        }
    }

    pub fn link(location: &str) -> Self {
        Self {
            submit: None,
            link: Some(LinkParams::parse(location)),
        }
    }

    /// The single command this invocation will act on
    pub fn pending(&self) -> Option<Command> {
        self.submit
            .clone()
            .or_else(|| self.link.as_ref().and_then(LinkParams::command))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do
    Idle { table: Table },
    /// Mutation applied and saved; redraw everything
    Applied {
        command: Command,
        table: Table,
        message: String,
    },
    /// Bad input; nothing changed
    Rejected { table: Table, reason: String },
    /// Id no longer exists; nothing changed
    Stale { table: Table, id: ItemId },
}

impl Outcome {
    pub fn table(&self) -> &Table {
        match self {
            Outcome::Idle { table }
            | Outcome::Applied { table, .. }
            | Outcome::Rejected { table, .. }
            | Outcome::Stale { table, .. } => table,
        }
    }

    pub fn needs_render(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

// ============================================
// INTERPRETER
// ============================================

pub struct Interpreter<'a> {
    store: &'a dyn RowStore,
    catalog: &'a Catalog,
}

impl<'a> Interpreter<'a> {
    pub fn new(store: &'a dyn RowStore, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    /// Apply the pending command, if any, and persist the result.
    /// Only storage failures are returned as errors.
    pub fn interpret(&self, table: Table, request: &Request) -> Result<Outcome> {
        let Some(command) = request.pending() else {
            return Ok(Outcome::Idle { table });
        };

        match self.apply(&table, &command) {
            Ok((next, message)) => {
                self.store.save(&next)?;
                tracing::info!("{}", message);
                Ok(Outcome::Applied {
                    command,
                    table: next,
                    message,
                })
            }
            Err(ListError::Validation(reason)) => {
                tracing::debug!("Rejected {:?}: {}", command, reason);
                Ok(Outcome::Rejected { table, reason })
            }
            Err(ListError::NotFound(id)) => {
                tracing::debug!("Ignoring {:?}: item {} no longer exists", command, id);
                Ok(Outcome::Stale { table, id })
            }
            Err(e) => Err(e),
        }
    }

    fn apply(&self, table: &Table, command: &Command) -> Result<(Table, String)> {
        match command {
            Command::Add {
                item,
                category,
                store,
            } => {
                let store = store
                    .as_deref()
                    .filter(|s| self.catalog.has_store(s))
                    .ok_or_else(|| ListError::validation(MSG_NO_STORE))?;
                let category = category
                    .as_deref()
                    .filter(|c| self.catalog.has_category(c))
                    .ok_or_else(|| ListError::validation(MSG_NO_CATEGORY))?;

                let next = mutate::add(table, item, category, store)?;
                let message = format!(
                    "'{}' added to the list for {} under '{}'.",
                    item.trim(),
                    store,
                    category
                );
                Ok((next, message))
            }
            Command::Toggle { id } => {
                let next = mutate::toggle(table, *id)?;
                let row = next.get(*id).ok_or(ListError::NotFound(*id))?;
                let message = if row.purchased {
                    format!("'{}' marked as purchased.", row.item)
                } else {
                    format!("'{}' moved back to the list.", row.item)
                };
                Ok((next, message))
            }
            Command::Delete { id } => {
                let name = table
                    .get(*id)
                    .map(|row| row.item.clone())
                    .ok_or(ListError::NotFound(*id))?;
                let next = mutate::delete(table, *id)?;
                Ok((next, format!("'{}' removed from the list.", name)))
            }
            Command::ClearPurchased => {
                let next = mutate::clear_purchased(table);
                let removed = table.len() - next.len();
                Ok((next, format!("Removed {} purchased {}.", removed, items(removed))))
            }
            Command::ClearAll => {
                let next = mutate::clear_all(table);
                let cleared = table.len();
                Ok((next, format!("Cleared the list ({} {}).", cleared, items(cleared))))
            }
        }
    }
}

/// Result of one load-interpret-project pass
#[derive(Debug)]
pub struct Cycle {
    pub outcome: Outcome,
    pub view: GroupedView,
    /// Replacement location when command parameters were consumed
    pub location: Option<String>,
}

/// Load, apply at most one command, and project the resulting table
pub fn run_cycle(store: &dyn RowStore, catalog: &Catalog, request: &Request) -> Result<Cycle> {
    let table = store.load()?;
    let outcome = Interpreter::new(store, catalog).interpret(table, request)?;
    let view = project(outcome.table(), catalog);
    let location = request
        .link
        .as_ref()
        .filter(|link| link.is_present())
        .map(LinkParams::consumed);

    Ok(Cycle {
        outcome,
        view,
        location,
    })
}

fn items(count: usize) -> &'static str {
    if count == 1 {
        "item"
    } else {
        "items"
    }
}
