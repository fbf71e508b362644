//! Command handlers -- one module per subcommand

pub mod collect;
pub mod config;
pub mod feeds;
pub mod reports;
pub mod run;

use chrono::{Local, NaiveDate};

use ovrgen_core::config::OvrgenConfig;
use ovrgen_core::layout::WeekLayout;

use crate::cli::StageArgs;

/// Loaded configuration plus the date-derived week layout shared by every stage.
pub struct StageContext {
    pub config: OvrgenConfig,
    pub today: NaiveDate,
    pub layout: WeekLayout,
}

impl StageContext {
    pub fn new(config: OvrgenConfig, args: &StageArgs) -> Self {
        let today = args.date.unwrap_or_else(|| Local::now().date_naive());
        let layout = WeekLayout::for_date(config.general.workdir_path(), today);
        Self {
            config,
            today,
            layout,
        }
    }
}
