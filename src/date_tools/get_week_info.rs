use super::DateContext;
use crate::Tool;
use crate::calendar;

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(
    title = "get_week_info",
    description = "Get comprehensive week information for a given date including all days of the week."
)]
pub struct GetWeekInfo {
    #[schemars(description = "The input date as a string in YYYY-MM-DD format")]
    pub date_str: String,
}

impl Tool for GetWeekInfo {
    type Context = DateContext;

    fn apply(&self, _: Self::Context) -> anyhow::Result<String> {
        let week = match calendar::week_info(&self.date_str) {
            Ok(week) => week,
            Err(err) => return Ok(err.to_string()),
        };
        let days = week
            .into_iter()
            .map(|(name, day)| format!("{name}: {day}"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("Week containing {}:\n{days}", self.date_str))
    }
}
