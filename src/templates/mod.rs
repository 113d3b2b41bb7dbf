pub mod notification_template;
