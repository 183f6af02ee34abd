/// OpenAPI documentation generation.
pub mod documentation;
/// Short shareable game id generation.
pub mod game_id;
/// Health check service.
pub mod health_service;
/// Ranking of submitted predictions.
pub mod leaderboard_service;
/// Participant prediction workflow.
pub mod prediction_service;
/// Eviction of idle live sessions.
pub mod session_reaper;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// Host tournament workflow.
pub mod tournament_service;
