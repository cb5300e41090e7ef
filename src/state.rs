use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::SubmissionRateLimiter;
use crate::relay::MailRelay;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub relay: Arc<dyn MailRelay>,
    pub submission_limiter: SubmissionRateLimiter,
}
