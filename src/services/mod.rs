//! Application service layer.
//!
//! `Dispatcher` fans normalized rows out to the messaging provider and
//! `SmsCampaign` runs the whole read, resolve, normalize, dispatch pipeline.

mod campaign;
mod dispatcher;

pub use campaign::{CampaignOptions, CampaignReport, CampaignRequest, SmsCampaign};
pub use dispatcher::{Dispatcher, DEFAULT_MAX_CONCURRENT_SENDS};
