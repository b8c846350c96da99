//! Command handlers for the console store CLI
//!
//! Each handler drives one [`AdminStore`] that `main` has built and
//! initialized. Protected commands consult the auth guard first, the same way
//! the console's routes do.

use std::path::PathBuf;

use futures::future;
use tracing::{debug, info};

use crate::app::guard::GuardDecision;
use crate::app::query::QueryParams;
use crate::app::store::AdminStore;
use crate::cli::args::{
    ConfigAction, ConfigArgs, ListArgs, LoginArgs, ProductsAction, ProductsArgs, UsersAction,
    UsersArgs,
};
use crate::cli::progress::LoadingIndicator;
use crate::cli::render;
use crate::config::AppConfig;
use crate::constants::{auth, routes};
use crate::errors::{AppError, Result};

/// Fail unless the guard lets `route` through
pub async fn require_session(store: &AdminStore, route: &str) -> Result<()> {
    match store.guard().resolve(route).await {
        GuardDecision::Allow => Ok(()),
        decision => {
            debug!("Guard decision for {}: {:?}", route, decision);
            Err(AppError::generic(
                "Not signed in. Run 'console_store login' first.",
            ))
        }
    }
}

/// Username and password from flags, `--demo`, or prompts
pub fn resolve_credentials(args: &LoginArgs) -> Result<(String, String)> {
    if args.demo {
        return Ok((auth::DEMO_USERNAME.to_string(), auth::DEMO_PASSWORD.to_string()));
    }

    let username = match &args.username {
        Some(username) => username.trim().to_string(),
        None => prompt_line("Username: ")?,
    };
    if username.is_empty() {
        return Err(AppError::generic("Username cannot be empty"));
    }

    let password = match &args.password {
        Some(password) => password.clone(),
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        return Err(AppError::generic("Password cannot be empty"));
    }

    Ok((username, password))
}

fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Handle the login command
pub async fn handle_login(store: &AdminStore, args: LoginArgs, quiet: bool) -> Result<()> {
    if let GuardDecision::RedirectToDashboard = store.guard().resolve(routes::LOGIN).await {
        println!("ℹ️  Already signed in; signing in again replaces the session.");
    }

    let (username, password) = resolve_credentials(&args)?;
    let indicator = LoadingIndicator::spawn_unless(
        quiet,
        store.sessions().subscribe(),
        |state| state.loading,
        format!("Signing in as {}...", username),
    );
    let result = store.login(&username, &password).await;
    indicator.finish().await;

    let session = result?;
    info!("Login command succeeded");
    render::print_session(&session);
    Ok(())
}

/// Handle the logout command
pub async fn handle_logout(store: &AdminStore) -> Result<()> {
    if !store.sessions().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    store.logout().await;
    println!("👋 Signed out.");
    Ok(())
}

/// Handle the whoami command
pub async fn handle_whoami(store: &AdminStore) -> Result<()> {
    store.gate().wait().await;
    render::print_session(&store.sessions().session());
    Ok(())
}

/// Fetch and print a page of users
pub async fn list_users(store: &AdminStore, params: QueryParams, quiet: bool) -> Result<()> {
    let indicator = LoadingIndicator::spawn_unless(
        quiet,
        store.users().subscribe(),
        |state| state.loading,
        "Loading users...",
    );
    let result = store.fetch_users(params).await;
    indicator.finish().await;

    render::print_users(&store.users().state());
    result.map(|_| ()).map_err(AppError::from)
}

/// Fetch and print a page of products
pub async fn list_products(store: &AdminStore, params: QueryParams, quiet: bool) -> Result<()> {
    let indicator = LoadingIndicator::spawn_unless(
        quiet,
        store.products().subscribe(),
        |state| state.loading,
        "Loading products...",
    );
    let result = store.fetch_products(params).await;
    indicator.finish().await;

    render::print_products(&store.products().state());
    result.map(|_| ()).map_err(AppError::from)
}

/// Handle the users command
pub async fn handle_users(store: &AdminStore, args: UsersArgs, quiet: bool) -> Result<()> {
    require_session(store, routes::USERS).await?;

    match args.action {
        UsersAction::List(list) => {
            list.validate().map_err(AppError::generic)?;
            list_users(store, list.to_params(), quiet).await
        }
        UsersAction::Show { id } => {
            let user = store.fetch_user(id).await?;
            render::print_user(&user);
            Ok(())
        }
    }
}

/// Query for a product list; category only applies without a search
pub fn product_params(list: &ListArgs, category: Option<&str>) -> QueryParams {
    let params = list.to_params();
    match category.map(str::trim) {
        Some(category) if !category.is_empty() => params.with_category(category),
        _ => params,
    }
}

/// Handle the products command
pub async fn handle_products(store: &AdminStore, args: ProductsArgs, quiet: bool) -> Result<()> {
    require_session(store, routes::PRODUCTS).await?;

    match args.action {
        ProductsAction::List { list, category } => {
            list.validate().map_err(AppError::generic)?;
            list_products(store, product_params(&list, category.as_deref()), quiet).await
        }
        ProductsAction::Show { id } => {
            let product = store.fetch_product(id).await?;
            render::print_product(&product);
            Ok(())
        }
        ProductsAction::Categories => {
            let categories = store.categories().ensure_loaded().await?;
            render::print_categories(&categories);
            Ok(())
        }
    }
}

/// Load the first page of both collections, then summarize
pub async fn show_dashboard(store: &AdminStore, quiet: bool) -> Result<()> {
    let indicator = LoadingIndicator::spawn_unless(
        quiet,
        store.users().subscribe(),
        |state| state.loading,
        "Loading dashboard...",
    );
    let (users, products) = future::join(
        store.fetch_users(QueryParams::new()),
        store.fetch_products(QueryParams::new()),
    )
    .await;
    indicator.finish().await;

    render::print_dashboard(&store.dashboard());
    users?;
    products?;
    Ok(())
}

/// Handle the dashboard command
pub async fn handle_dashboard(store: &AdminStore, quiet: bool) -> Result<()> {
    require_session(store, routes::DASHBOARD).await?;
    show_dashboard(store, quiet).await
}

/// Handle the config command
pub async fn handle_config(config: &AppConfig, args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path: PathBuf = match path {
                Some(path) => path,
                None => AppConfig::get_default_config_path()?,
            };
            if path.exists() && !force {
                return Err(AppError::generic(format!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            AppConfig::write_default(&path).await?;
            println!("📁 Wrote default configuration to {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_credentials() {
        let args = LoginArgs {
            demo: true,
            ..LoginArgs::default()
        };
        let (username, password) = resolve_credentials(&args).unwrap();
        assert_eq!(username, auth::DEMO_USERNAME);
        assert_eq!(password, auth::DEMO_PASSWORD);
    }

    #[test]
    fn test_explicit_credentials_are_used() {
        let args = LoginArgs {
            username: Some(" emilys ".to_string()),
            password: Some("emilyspass".to_string()),
            demo: false,
        };
        let (username, password) = resolve_credentials(&args).unwrap();
        assert_eq!(username, "emilys");
        assert_eq!(password, "emilyspass");
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let args = LoginArgs {
            username: Some("emilys".to_string()),
            password: Some(String::new()),
            demo: false,
        };
        assert!(resolve_credentials(&args).is_err());
    }

    #[test]
    fn test_product_params_with_category() {
        let list = ListArgs::default();
        let params = product_params(&list, Some("beauty"));
        assert_eq!(params.category.as_deref(), Some("beauty"));

        let params = product_params(&list, Some("  "));
        assert_eq!(params.category, None);
    }
}
