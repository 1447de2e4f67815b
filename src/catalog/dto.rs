use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: i64,
    pub is_active: bool,
}
