//! Data models for remote resources and the authenticated session
//!
//! Wire shapes follow the remote API's camelCase JSON. Fields the console
//! never reads are kept in a flattened `extra` map so detail views can still
//! show them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A remote collection the store can list, search and page through
///
/// Implementors name the collection once; the endpoint builder derives every
/// path (`/{name}`, `/{name}/search`, `/{name}/category/{c}`, `/{name}/{id}`)
/// and the list response field from it.
pub trait CollectionResource:
    DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Path segment and list response field, e.g. `users`
    const COLLECTION: &'static str;

    /// Singular label used for detail fetches, e.g. `user`
    const SINGULAR: &'static str;

    /// Whether category-scoped listing applies to this collection
    const SUPPORTS_CATEGORY: bool;

    /// Remote identifier
    fn id(&self) -> u64;
}

/// Company block of a user record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Postal address block of a user record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Address {
    /// `street, city` the way the detail view renders it
    pub fn short(&self) -> String {
        format!(
            "{}, {}",
            self.address.as_deref().unwrap_or_default(),
            self.city.as_deref().unwrap_or_default()
        )
    }
}

/// A user record from the users collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub address: Option<Address>,
    /// Fields the console does not model explicitly
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// `first last`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl CollectionResource for User {
    const COLLECTION: &'static str = "users";
    const SINGULAR: &'static str = "user";
    const SUPPORTS_CATEGORY: bool = false;

    fn id(&self) -> u64 {
        self.id
    }
}

/// A product record from the products collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub stock: Option<u64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Fields the console does not model explicitly
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionResource for Product {
    const COLLECTION: &'static str = "products";
    const SINGULAR: &'static str = "product";
    const SUPPORTS_CATEGORY: bool = true;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Profile of the signed-in account as returned by the login endpoint
///
/// Everything the server sends besides the token is kept, named or not, so
/// the persisted user matches the login response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// First name when known, else the username
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Successful login response: profile fields plus the issued token
///
/// Servers send the token as `token`, `accessToken`, or both; `token` wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl LoginResponse {
    /// The issued bearer token, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().or(self.access_token.as_deref())
    }
}

/// The authenticated session; the only state persisted across restarts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl Session {
    /// Session created by a successful login
    pub fn new(user: UserProfile, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        let token = response.bearer_token().map(str::to_string);
        Self {
            user: Some(response.profile),
            token,
        }
    }
}
