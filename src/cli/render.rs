//! Terminal rendering of store state

use crate::app::cache::CacheStats;
use crate::app::collection::CollectionState;
use crate::app::dashboard::DashboardSummary;
use crate::app::models::{Product, Session, User};
use crate::app::pagination;

/// Truncate to `width` characters, marking the cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// `Page 2 of 21 · showing 10 of 208`
pub fn page_footer<R>(state: &CollectionState<R>) -> String {
    let query = &state.active_query;
    format!(
        "Page {} of {} · showing {} of {}",
        pagination::page_for_skip(query.skip, query.limit),
        pagination::page_count(state.total, query.limit),
        state.items.len(),
        state.total
    )
}

fn print_error<R>(state: &CollectionState<R>) {
    if let Some(error) = &state.error {
        println!("❌ {}", error);
        println!("   Run the same command again (or 'retry' in the shell) to try again.");
    }
}

pub fn print_users(state: &CollectionState<User>) {
    print_error(state);
    if state.items.is_empty() {
        println!("No users found.");
        return;
    }

    println!(
        "{:>5}  {:<24} {:<30} {:<14} {:<20}",
        "ID", "Name", "Email", "Phone", "Company"
    );
    for user in &state.items {
        let company = user
            .company
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("-");
        println!(
            "{:>5}  {:<24} {:<30} {:<14} {:<20}",
            user.id,
            truncate(&user.full_name(), 24),
            truncate(&user.email, 30),
            truncate(user.phone.as_deref().unwrap_or("-"), 14),
            truncate(company, 20)
        );
    }
    println!();
    println!("{}", page_footer(state));
}

pub fn print_products(state: &CollectionState<Product>) {
    print_error(state);
    if state.items.is_empty() {
        println!("No products found.");
        return;
    }

    println!(
        "{:>5}  {:<32} {:<18} {:>10} {:>6} {:>6}",
        "ID", "Title", "Category", "Price", "Rating", "Stock"
    );
    for product in &state.items {
        println!(
            "{:>5}  {:<32} {:<18} {:>10} {:>6} {:>6}",
            product.id,
            truncate(&product.title, 32),
            truncate(&product.category, 18),
            format!("${:.2}", product.price),
            product
                .rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_string()),
            product
                .stock
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    println!();
    println!("{}", page_footer(state));
}

pub fn print_user(user: &User) {
    println!("👤 {} (#{})", user.full_name(), user.id);
    println!("   Username: {}", user.username);
    println!("   Email:    {}", user.email);
    if let Some(phone) = &user.phone {
        println!("   Phone:    {}", phone);
    }
    if let Some(age) = user.age {
        println!("   Age:      {}", age);
    }
    if let Some(gender) = &user.gender {
        println!("   Gender:   {}", gender);
    }
    if let Some(company) = &user.company {
        let parts: Vec<&str> = [&company.title, &company.department, &company.name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();
        if !parts.is_empty() {
            println!("   Company:  {}", parts.join(", "));
        }
    }
    if let Some(address) = &user.address {
        println!("   Address:  {}", address.short());
    }
}

pub fn print_product(product: &Product) {
    println!("📦 {} (#{})", product.title, product.id);
    println!("   Category: {}", product.category);
    if let Some(brand) = &product.brand {
        println!("   Brand:    {}", brand);
    }
    match product.discount_percentage {
        Some(discount) if discount > 0.0 => {
            println!("   Price:    ${:.2} (-{:.1}%)", product.price, discount)
        }
        _ => println!("   Price:    ${:.2}", product.price),
    }
    if let Some(rating) = product.rating {
        println!("   Rating:   {:.2}", rating);
    }
    if let Some(stock) = product.stock {
        println!("   Stock:    {}", stock);
    }
    if !product.description.is_empty() {
        println!();
        println!("   {}", product.description);
    }
    if !product.images.is_empty() {
        println!("   Images:   {}", product.images.len());
    }
}

pub fn print_categories(categories: &[String]) {
    if categories.is_empty() {
        println!("No categories.");
        return;
    }
    println!("🏷️  {} categories:", categories.len());
    for category in categories {
        println!("   {}", category);
    }
}

pub fn print_session(session: &Session) {
    match &session.user {
        Some(user) => {
            println!("✅ Signed in as {} (#{})", user.username, user.id);
            let name = [user.first_name.as_deref(), user.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            if !name.is_empty() {
                println!("   Name:  {}", name);
            }
            if let Some(email) = &user.email {
                println!("   Email: {}", email);
            }
        }
        None => println!("❌ Not signed in. Run 'console_store login' first."),
    }
}

pub fn print_dashboard(summary: &DashboardSummary) {
    println!("{}", summary.welcome);
    println!();
    println!(
        "👥 Users:    {} loaded of {}",
        summary.loaded_users, summary.total_users
    );
    println!(
        "📦 Products: {} loaded of {}",
        summary.loaded_products, summary.total_products
    );
    println!("⭐ Avg rating: {:.2}", summary.average_rating);

    if !summary.recent_users.is_empty() {
        println!();
        println!("Recent users:");
        for user in &summary.recent_users {
            println!("   {:<24} {}", truncate(&user.full_name(), 24), user.email);
        }
    }
}

pub fn print_cache_stats(label: &str, stats: &CacheStats) {
    println!(
        "   {:<9} {}/{} entries · {} hits · {} misses · {} evictions · {:.0}% hit rate",
        label,
        stats.entries,
        stats.capacity,
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.hit_rate()
    );
}
