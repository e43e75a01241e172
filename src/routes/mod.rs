pub mod achievements;

pub mod activity_logs;

pub mod admin;

pub mod auth;

pub mod courses;

pub mod exercises;

pub mod labs;

pub mod portal;

pub mod simulations;

pub mod frontend;

pub use achievements::configure_achievement_routes;
pub use activity_logs::configure_activity_log_routes;
pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use exercises::configure_exercise_routes;
pub use frontend::configure_frontend_routes;
pub use labs::configure_lab_routes;
pub use portal::configure_portal_routes;
pub use simulations::configure_simulation_routes;
