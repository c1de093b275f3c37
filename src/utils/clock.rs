use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing dates across application. Reports stamp the
/// generation date through it, so tests can pin "now".
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
