//! Command-line interface components
//!
//! This module contains the terminal consumer of the store: argument parsing,
//! command handlers, rendering, the loading spinner and the interactive shell.

pub mod args;
pub mod commands;
pub mod progress;
pub mod render;
pub mod shell;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs, ListArgs, LoginArgs, ProductsAction,
    ProductsArgs, UsersAction, UsersArgs,
};
pub use commands::{
    handle_config, handle_dashboard, handle_login, handle_logout, handle_products, handle_users,
    handle_whoami,
};
pub use progress::LoadingIndicator;
pub use shell::run_shell;
