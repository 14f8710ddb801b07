pub mod forms;
pub mod routes;
pub mod session;

pub use routes::DashboardServer;
