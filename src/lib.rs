pub mod admin;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod mutate;
pub mod normalize;
pub mod store;
pub mod view;

pub use command::{run_cycle, Command, Interpreter, Outcome, Request};
pub use config::Config;
pub use error::{ListError, StoreError};
pub use model::{Catalog, Item, ItemId, Table};
pub use store::RowStore;
