use super::DateContext;
use crate::Tool;
use crate::calendar;

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(
    title = "get_monday",
    description = "Returns the date of the Monday of the week containing the given date."
)]
pub struct GetMonday {
    #[schemars(description = "The input date as a string in YYYY-MM-DD format")]
    pub date_str: String,
}

impl Tool for GetMonday {
    type Context = DateContext;

    fn apply(&self, _: Self::Context) -> anyhow::Result<String> {
        Ok(calendar::monday_of(&self.date_str).unwrap_or_else(|err| err.to_string()))
    }
}
