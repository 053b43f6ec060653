pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod response;
pub mod status;
pub mod telegram;

pub use api::{HomeworkSource, PracticumClient};
pub use config::{Credentials, InitialCursor, PollConfig};
pub use error::{ConfigError, PollError};
pub use poller::{spawn_poller, CycleOutcome, HomeworkPoller, PollCursor, PollerHandle};
pub use response::{check_response, current_date};
pub use status::{parse_status, Verdict};
pub use telegram::{Notifier, TelegramNotifier};
