pub mod assets;
pub mod identify;
pub mod verify;

use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "app": "ecogame-backend"
    }))
}
