use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub employee_id: String,
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
}

