//! Read-only JSON view of the leaderboard.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::AppState;

#[derive(Deserialize)]
struct LeaderboardQuery {
    /// Caller identity to compute a rank for (e.g. "tg:123")
    caller_id: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/leaderboard").route(web::get().to(get_leaderboard)));
}

/// GET /api/leaderboard?caller_id=...
async fn get_leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> HttpResponse {
    let caller_id = query.caller_id.as_deref().unwrap_or("");
    match state.ranking.leaderboard(caller_id) {
        Ok(board) => HttpResponse::Ok().json(board),
        Err(e) => {
            log::error!("Failed to compute leaderboard: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to compute leaderboard"
            }))
        }
    }
}
