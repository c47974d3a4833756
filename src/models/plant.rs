use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Encyclopedia entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: u64,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub category: Option<PlantCategory>,
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub care_instructions: Option<String>,
    #[serde(default, deserialize_with = "super::image_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub light_requirement: Option<String>,
    #[serde(default)]
    pub water_frequency: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /plants` wraps the list; older deployments omit the key entirely.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlantList {
    #[serde(default)]
    pub plants: Vec<Plant>,
}

/// Client-side encyclopedia filter: category AND name search.
#[derive(Debug, Clone, Default)]
pub struct PlantFilter {
    /// `None` shows every category.
    pub category_id: Option<u64>,
    pub search: String,
}

impl PlantFilter {
    pub fn matches(&self, plant: &Plant) -> bool {
        let category_ok = match self.category_id {
            Some(id) => plant.category_id == Some(id),
            None => true,
        };

        let needle = self.search.to_lowercase();
        let search_ok = plant.name.to_lowercase().contains(&needle)
            || plant
                .scientific_name
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle));

        category_ok && search_ok
    }

    pub fn apply<'a>(&self, plants: &'a [Plant]) -> Vec<&'a Plant> {
        plants.iter().filter(|p| self.matches(p)).collect()
    }
}
