// Domain models

mod summary;
mod tick;
mod website;

pub use summary::{EndpointSummary, SummaryView, WindowStatus};
pub use tick::{Outcome, RawTick, Sample, UP_MARKER};
pub use website::{Website, WebsiteStatus};
