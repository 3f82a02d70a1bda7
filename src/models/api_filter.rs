use serde::{Deserialize, Serialize};

/// A single EC2 `Filters` entry (`Name` plus accepted `Values`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ApiFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl ApiFilter {
    pub fn new<I, S>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}
