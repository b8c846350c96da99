//! Dashboard summary over whatever pages are currently loaded
//!
//! Counts reflect loaded pages, not collection totals; totals are reported
//! alongside.

use crate::app::collection::CollectionState;
use crate::app::models::{Product, Session, User};
use crate::constants::query::DASHBOARD_RECENT_USERS;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub welcome: String,
    pub loaded_users: usize,
    pub total_users: u64,
    pub loaded_products: usize,
    pub total_products: u64,
    /// Mean rating of loaded products; products without a rating count as 0
    pub average_rating: f64,
    pub recent_users: Vec<User>,
}

impl DashboardSummary {
    pub fn build(
        session: &Session,
        users: &CollectionState<User>,
        products: &CollectionState<Product>,
    ) -> Self {
        let welcome = match &session.user {
            Some(user) => format!("Welcome back, {}", user.display_name()),
            None => "Welcome".to_string(),
        };

        let average_rating = if products.items.is_empty() {
            0.0
        } else {
            let sum: f64 = products.items.iter().map(|p| p.rating.unwrap_or(0.0)).sum();
            sum / products.items.len() as f64
        };

        Self {
            welcome,
            loaded_users: users.items.len(),
            total_users: users.total,
            loaded_products: products.items.len(),
            total_products: products.total,
            average_rating,
            recent_users: users
                .items
                .iter()
                .take(DASHBOARD_RECENT_USERS)
                .cloned()
                .collect(),
        }
    }
}
