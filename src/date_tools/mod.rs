mod get_current_date;
mod get_day_of_week;
mod get_monday;
mod get_week_info;

use crate::calendar::Clock;
use crate::types::{ToolSet, ToolSetCreationError};

use std::sync::Arc;

pub use get_current_date::GetCurrentDate;
pub use get_day_of_week::GetDayOfWeek;
pub use get_monday::GetMonday;
pub use get_week_info::GetWeekInfo;

/// Context handed to every date tool call.
#[derive(Clone)]
pub struct DateContext {
    pub clock: Arc<dyn Clock>,
}

impl DateContext {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }
}

pub fn date_toolset() -> Result<ToolSet<DateContext>, ToolSetCreationError> {
    ToolSet::new()
        .add_tool::<GetMonday>()?
        .add_tool::<GetCurrentDate>()?
        .add_tool::<GetWeekInfo>()?
        .add_tool::<GetDayOfWeek>()
}
