pub mod admin_badge;
pub mod notification_center;
