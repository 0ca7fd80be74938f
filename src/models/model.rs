use serde::{Deserialize, Serialize};

/// Entry of the model catalog (`GET /models`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub owned_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Models {
    pub data: Vec<Model>,
    #[serde(default)]
    pub object: String,
}
