use super::DateContext;
use crate::Tool;
use crate::calendar;

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(
    title = "get_day_of_week",
    description = "Get the day of the week for a given date."
)]
pub struct GetDayOfWeek {
    #[schemars(description = "The input date as a string in YYYY-MM-DD format")]
    pub date_str: String,
}

impl Tool for GetDayOfWeek {
    type Context = DateContext;

    fn apply(&self, _: Self::Context) -> anyhow::Result<String> {
        Ok(match calendar::weekday_name(&self.date_str) {
            Ok(name) => format!("{} is a {name}", self.date_str),
            Err(err) => err.to_string(),
        })
    }
}
