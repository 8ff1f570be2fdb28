use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::{Id, ListPayload};
use crate::result::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    pub id: Id,
    #[serde(default)]
    pub school_id: Option<Id>,
    pub name: String,
    #[serde(default)]
    pub numeric_level: Option<i32>,
}

impl Class {
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<Class>> {
        let payload: ListPayload<Class> = client.get("/classes", &[]).await?;
        Ok(payload.into_items())
    }
}
