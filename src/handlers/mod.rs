pub mod bucket_handlers;
pub mod calendar_handlers;
pub mod health_handlers;
pub mod task_handlers;
