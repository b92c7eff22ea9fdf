//! Kernel module - external collaborators (mail relay, Twilio SMS).

pub mod mail;
pub mod notifications;

pub use mail::MailClient;
pub use notifications::Notifier;
