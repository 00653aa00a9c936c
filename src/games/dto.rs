use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateGameRequest {
    pub id: String,
    pub name: String,
}
