use crate::models::plant::{Plant, PlantCategory, PlantList};
use crate::services::client::{ApiClient, ApiError};

/// Client for the plant encyclopedia.
#[derive(Debug, Clone)]
pub struct PlantApi {
    client: ApiClient,
}

impl PlantApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every encyclopedia entry. Filtering happens client-side with
    /// [`PlantFilter`](crate::models::plant::PlantFilter).
    pub async fn all_plants(&self) -> Result<Vec<Plant>, ApiError> {
        let list: PlantList = self.client.get("/plants").await?;
        Ok(list.plants)
    }

    pub async fn plant(&self, plant_id: u64) -> Result<Plant, ApiError> {
        self.client.get(&format!("/plants/{}", plant_id)).await
    }

    pub async fn categories(&self) -> Result<Vec<PlantCategory>, ApiError> {
        self.client.get("/plants/categories").await
    }
}
