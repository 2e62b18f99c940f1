use super::DateContext;
use crate::Tool;
use crate::calendar;

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(
    title = "get_current_date",
    description = "Get the current date in YYYY-MM-DD format."
)]
pub struct GetCurrentDate {}

impl Tool for GetCurrentDate {
    type Context = DateContext;

    fn apply(&self, context: Self::Context) -> anyhow::Result<String> {
        Ok(calendar::today(context.clock.as_ref()))
    }
}
