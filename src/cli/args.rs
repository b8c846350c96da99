//! Command-line argument parsing for the console store
//!
//! This module defines the CLI structure using clap derive macros: session
//! commands, list/detail views over users and products, a dashboard, an
//! interactive shell and configuration management.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::pagination;
use crate::app::query::QueryParams;
use crate::constants::query::DEFAULT_LIMIT;

/// Console Store - admin console over the users/products API
#[derive(Parser, Debug)]
#[command(
    name = "console_store",
    version,
    about = "Browse users and products of the admin API from the terminal",
    long_about = "A terminal consumer of the admin console store.
Pages are cached per query, so revisiting a page or search is instant, and the
session persists across runs."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API root URL, overriding config and environment
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Session file, overriding config and environment
    #[arg(long, global = true, value_name = "FILE")]
    pub session_file: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and persist the session
    Login(LoginArgs),

    /// Sign out and forget the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse users
    Users(UsersArgs),

    /// Browse products
    Products(ProductsArgs),

    /// Summary of the first page of users and products
    Dashboard,

    /// Interactive session over one store instance
    Shell,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the login command
#[derive(Args, Debug, Clone, Default)]
pub struct LoginArgs {
    /// Username (prompted when missing)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (prompted without echo when missing)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Use the demo account
    #[arg(long, conflicts_with_all = ["username", "password"])]
    pub demo: bool,
}

/// Paging and search shared by list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (10, 20 or 30 in the console)
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub page_size: u32,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_LIMIT,
            search: None,
        }
    }
}

impl ListArgs {
    /// Reject page sizes the API cannot serve
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("Page size must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Query for the requested page
    pub fn to_params(&self) -> QueryParams {
        let params = QueryParams::new()
            .with_limit(self.page_size)
            .with_skip(pagination::skip_for_page(self.page, self.page_size));
        match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => params.with_search(search),
            _ => params,
        }
    }
}

/// Arguments for user browsing
#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// User browsing actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List a page of users
    List(ListArgs),

    /// Show one user
    Show {
        /// User id
        id: u64,
    },
}

/// Arguments for product browsing
#[derive(Args, Debug)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub action: ProductsAction,
}

/// Product browsing actions
#[derive(Subcommand, Debug)]
pub enum ProductsAction {
    /// List a page of products
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only products in this category (ignored when searching)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one product
    Show {
        /// Product id
        id: u64,
    },

    /// List product categories
    Categories,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default config file
    Init {
        /// Where to write it (default: user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested by flags, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
