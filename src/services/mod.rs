pub mod auth_service;
pub mod email_service;
pub mod file_service;
pub mod sms_service;

pub use auth_service::AuthService;
pub use email_service::EmailService;
pub use file_service::FileService;
pub use sms_service::SmsService;
