//! Interactive shell over one store instance
//!
//! The shell keeps a single [`AdminStore`] alive between commands, so
//! revisiting a page or search is served from the cache and `stats` shows the
//! hit counts.

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::app::pagination;
use crate::app::query::QueryParams;
use crate::app::store::AdminStore;
use crate::cli::args::LoginArgs;
use crate::cli::commands::{self, require_session};
use crate::cli::render;
use crate::constants::routes;
use crate::errors::{AppError, Result};

/// Which collection a list command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Products,
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Login { username: Option<String> },
    Demo,
    Logout,
    Whoami,
    /// Page `page` of a collection with the current page size
    List { collection: Collection, page: u32 },
    Search { collection: Collection, term: String },
    Category(String),
    Show { collection: Collection, id: u64 },
    Categories,
    Next,
    Prev,
    PageSize(u32),
    Retry,
    Dashboard,
    Stats,
}

const HELP: &str = "\
Commands:
  users [page]              list users
  users search <term>       search users
  user <id>                 show one user
  products [page]           list products
  products search <term>    search products
  products category <name>  products in a category
  product <id>              show one product
  categories                list product categories
  next | prev               page through the last list
  size <10|20|30>           set the page size
  retry                     re-run the last list query
  dashboard                 summary of loaded pages
  stats                     cache statistics
  login [username] | demo   sign in
  logout | whoami
  help | quit";

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid {}: {}", what, value))
}

impl ShellCommand {
    /// Parse one input line; `Ok(None)` for blank lines
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let collection = match head {
            "users" => Some(Collection::Users),
            "products" => Some(Collection::Products),
            _ => None,
        };

        let command = match (head, rest.as_slice()) {
            ("help" | "?", _) => ShellCommand::Help,
            ("quit" | "exit", _) => ShellCommand::Quit,
            ("login", []) => ShellCommand::Login { username: None },
            ("login", [username]) => ShellCommand::Login {
                username: Some(username.to_string()),
            },
            ("demo", []) => ShellCommand::Demo,
            ("logout", []) => ShellCommand::Logout,
            ("whoami", []) => ShellCommand::Whoami,
            ("users" | "products", []) => ShellCommand::List {
                collection: collection.unwrap_or(Collection::Users),
                page: 1,
            },
            ("users" | "products", ["search", term @ ..]) if !term.is_empty() => {
                ShellCommand::Search {
                    collection: collection.unwrap_or(Collection::Users),
                    term: term.join(" "),
                }
            }
            ("products", ["category", name @ ..]) if !name.is_empty() => {
                ShellCommand::Category(name.join(" "))
            }
            ("users" | "products", [page]) => ShellCommand::List {
                collection: collection.unwrap_or(Collection::Users),
                page: parse_number(page, "page")?,
            },
            ("user", [id]) => ShellCommand::Show {
                collection: Collection::Users,
                id: parse_number(id, "id")?,
            },
            ("product", [id]) => ShellCommand::Show {
                collection: Collection::Products,
                id: parse_number(id, "id")?,
            },
            ("categories", []) => ShellCommand::Categories,
            ("next", []) => ShellCommand::Next,
            ("prev", []) => ShellCommand::Prev,
            ("size", [size]) => {
                let size: u32 = parse_number(size, "page size")?;
                if size == 0 {
                    return Err("Page size must be greater than 0".to_string());
                }
                ShellCommand::PageSize(size)
            }
            ("retry", []) => ShellCommand::Retry,
            ("dashboard", []) => ShellCommand::Dashboard,
            ("stats", []) => ShellCommand::Stats,
            _ => return Err(format!("Unknown command: {} (try 'help')", line.trim())),
        };
        Ok(Some(command))
    }
}

/// Paging context carried between commands
struct ShellState {
    page_size: u32,
    last: Collection,
}

impl ShellState {
    fn params(&self, page: u32) -> QueryParams {
        QueryParams::new()
            .with_limit(self.page_size)
            .with_skip(pagination::skip_for_page(page, self.page_size))
    }
}

async fn list(store: &AdminStore, collection: Collection, params: QueryParams) -> Result<()> {
    match collection {
        Collection::Users => {
            require_session(store, routes::USERS).await?;
            commands::list_users(store, params, false).await
        }
        Collection::Products => {
            require_session(store, routes::PRODUCTS).await?;
            commands::list_products(store, params, false).await
        }
    }
}

/// Active query of `collection` moved by `delta` pages
fn paged(store: &AdminStore, collection: Collection, delta: i64) -> QueryParams {
    let (query, total) = match collection {
        Collection::Users => {
            let state = store.users().state();
            (state.active_query, state.total)
        }
        Collection::Products => {
            let state = store.products().state();
            (state.active_query, state.total)
        }
    };

    let page = i64::from(pagination::page_for_skip(query.skip, query.limit)) + delta;
    let last_page = i64::try_from(pagination::page_count(total, query.limit)).unwrap_or(i64::MAX);
    let page = page.clamp(1, last_page.max(1));
    let page = u32::try_from(page).unwrap_or(1);

    query
        .to_params()
        .with_skip(pagination::skip_for_page(page, query.limit))
}

async fn execute(store: &AdminStore, state: &mut ShellState, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
        ShellCommand::Login { username } => {
            let args = LoginArgs {
                username,
                ..LoginArgs::default()
            };
            commands::handle_login(store, args, false).await?;
        }
        ShellCommand::Demo => {
            let args = LoginArgs {
                demo: true,
                ..LoginArgs::default()
            };
            commands::handle_login(store, args, false).await?;
        }
        ShellCommand::Logout => commands::handle_logout(store).await?,
        ShellCommand::Whoami => commands::handle_whoami(store).await?,
        ShellCommand::List { collection, page } => {
            state.last = collection;
            list(store, collection, state.params(page)).await?;
        }
        ShellCommand::Search { collection, term } => {
            state.last = collection;
            list(store, collection, state.params(1).with_search(term)).await?;
        }
        ShellCommand::Category(name) => {
            state.last = Collection::Products;
            list(
                store,
                Collection::Products,
                state.params(1).with_category(name),
            )
            .await?;
        }
        ShellCommand::Show { collection, id } => match collection {
            Collection::Users => {
                require_session(store, routes::USERS).await?;
                render::print_user(&store.fetch_user(id).await?);
            }
            Collection::Products => {
                require_session(store, routes::PRODUCTS).await?;
                render::print_product(&store.fetch_product(id).await?);
            }
        },
        ShellCommand::Categories => {
            require_session(store, routes::PRODUCTS).await?;
            render::print_categories(&store.categories().ensure_loaded().await?);
        }
        ShellCommand::Next => list(store, state.last, paged(store, state.last, 1)).await?,
        ShellCommand::Prev => list(store, state.last, paged(store, state.last, -1)).await?,
        ShellCommand::PageSize(size) => {
            state.page_size = size;
            println!("Page size set to {}", size);
        }
        ShellCommand::Retry => match state.last {
            Collection::Users => {
                require_session(store, routes::USERS).await?;
                let result = store.users().retry().await;
                render::print_users(&store.users().state());
                result?;
            }
            Collection::Products => {
                require_session(store, routes::PRODUCTS).await?;
                let result = store.products().retry().await;
                render::print_products(&store.products().state());
                result?;
            }
        },
        ShellCommand::Dashboard => {
            require_session(store, routes::DASHBOARD).await?;
            render::print_dashboard(&store.dashboard());
        }
        ShellCommand::Stats => {
            println!("📊 Cache:");
            render::print_cache_stats("users", &store.users().cache_stats().await);
            render::print_cache_stats("products", &store.products().cache_stats().await);
        }
    }
    Ok(())
}

/// Run the read-eval-print loop until `quit` or end of input
pub async fn run_shell(store: &AdminStore) -> Result<()> {
    let mut state = ShellState {
        page_size: crate::constants::query::DEFAULT_LIMIT,
        last: Collection::Users,
    };

    println!("Console store shell. Type 'help' for commands.");
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"console> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        if command == ShellCommand::Quit {
            break;
        }
        if let Err(e) = execute(store, &mut state, command).await {
            report(&e);
        }
    }

    println!();
    Ok(())
}

fn report(error: &AppError) {
    println!("❌ {}", error);
    if let Some(hint) = retry_hint(error) {
        println!("   {}", hint);
    }
}

/// Follow-up offered for failures that may succeed on a second attempt
fn retry_hint(error: &AppError) -> Option<&'static str> {
    if !error.is_recoverable() {
        return None;
    }
    match error {
        AppError::Fetch(_) => Some("Type 'retry' to reload the last list."),
        AppError::Auth(_) => Some("Type 'login' to try again."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        ShellCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_list_and_paging() {
        assert_eq!(
            parse("users"),
            ShellCommand::List {
                collection: Collection::Users,
                page: 1
            }
        );
        assert_eq!(
            parse("products 3"),
            ShellCommand::List {
                collection: Collection::Products,
                page: 3
            }
        );
        assert_eq!(parse("next"), ShellCommand::Next);
        assert_eq!(parse("size 20"), ShellCommand::PageSize(20));
    }

    #[test]
    fn test_search_keeps_spaces() {
        assert_eq!(
            parse("products search red lipstick"),
            ShellCommand::Search {
                collection: Collection::Products,
                term: "red lipstick".to_string()
            }
        );
        assert_eq!(
            parse("products category home-decoration"),
            ShellCommand::Category("home-decoration".to_string())
        );
    }

    #[test]
    fn test_detail_and_login() {
        assert_eq!(
            parse("user 5"),
            ShellCommand::Show {
                collection: Collection::Users,
                id: 5
            }
        );
        assert_eq!(
            parse("login emilys"),
            ShellCommand::Login {
                username: Some("emilys".to_string())
            }
        );
        assert_eq!(parse("exit"), ShellCommand::Quit);
    }

    #[test]
    fn test_retry_hint_for_transient_failures() {
        use crate::errors::{AuthError, FetchError};

        let unavailable = AppError::from(FetchError::status("users", 503));
        assert_eq!(
            retry_hint(&unavailable),
            Some("Type 'retry' to reload the last list.")
        );

        let missing = AppError::from(FetchError::status("user", 404));
        assert_eq!(retry_hint(&missing), None);

        let rejected = AppError::from(AuthError::Rejected {
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(retry_hint(&rejected), None);
        assert_eq!(retry_hint(&AppError::generic("Not signed in.")), None);
    }

    #[test]
    fn test_invalid_input() {
        assert!(ShellCommand::parse("user abc").is_err());
        assert!(ShellCommand::parse("size 0").is_err());
        assert!(ShellCommand::parse("users search").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }
}
