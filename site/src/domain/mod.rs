mod newsletter;
mod newsletter_id;
mod newsletter_store;

pub use newsletter::{parse_feed, Newsletter, NewsletterFeed, NewsletterRecord, RecordError};
pub use newsletter_id::NewsletterId;
pub use newsletter_store::{NewsletterStore, NewsletterStoreError};
