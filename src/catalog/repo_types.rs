use serde::Serialize;
use sqlx::FromRow;

/// Catalog entry. `price` is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub price: i64,
    pub is_active: bool,
}
