pub mod dispatch;
pub mod model;
pub mod page;

pub use dispatch::{dispatch, Action};
pub use model::{recompute_view, DashboardView, DateBounds, HourButton};
pub use page::{paginate, RecordPage};
