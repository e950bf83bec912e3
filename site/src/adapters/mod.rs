mod file_newsletter_store;
mod http_newsletter_store;

pub use file_newsletter_store::FileNewsletterStore;
pub use http_newsletter_store::HttpNewsletterStore;
