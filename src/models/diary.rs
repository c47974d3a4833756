use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::plant::Plant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GrowthStage {
    Seedling,
    #[default]
    Growing,
    Flowering,
    Mature,
    Dormant,
}

impl GrowthStage {
    /// Hex colour used when charting the stage.
    pub fn color(self) -> &'static str {
        match self {
            GrowthStage::Seedling => "#10B981",
            GrowthStage::Growing => "#3B82F6",
            GrowthStage::Flowering => "#F59E0B",
            GrowthStage::Mature => "#6366F1",
            GrowthStage::Dormant => "#6B7280",
        }
    }
}

/// Colour for a stage string the server sent, including unknown ones.
pub fn growth_stage_color(stage: &str) -> &'static str {
    stage
        .parse::<GrowthStage>()
        .map(GrowthStage::color)
        .unwrap_or("#22C55E")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityType {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    Observation,
    Treatment,
}

impl ActivityType {
    pub fn icon(self) -> &'static str {
        match self {
            ActivityType::Watering => "💧",
            ActivityType::Fertilizing => "🌱",
            ActivityType::Pruning => "✂️",
            ActivityType::Repotting => "🪴",
            ActivityType::Observation => "👀",
            ActivityType::Treatment => "💊",
        }
    }
}

pub fn activity_icon(activity: &str) -> &'static str {
    activity
        .parse::<ActivityType>()
        .map(ActivityType::icon)
        .unwrap_or("📝")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: u64,
    pub diary_id: u64,
    pub entry_date: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "super::image_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub growth_stage: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diary {
    pub id: u64,
    pub user_id: u64,
    pub plant_id: u64,
    #[serde(default)]
    pub plant: Option<Plant>,
    #[serde(default)]
    pub plant_nickname: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub entries: Vec<DiaryEntry>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Diary {
    /// Nickname, falling back to the plant's name and then a generic label.
    pub fn display_name(&self) -> &str {
        if !self.plant_nickname.is_empty() {
            return &self.plant_nickname;
        }
        self.plant
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(super::diagnosis::UNKNOWN_PLANT_NAME)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewDiary {
    #[garde(range(min = 1))]
    pub plant_id: u64,

    #[garde(length(chars, min = 1, max = 100))]
    pub plant_nickname: String,

    /// Sent as RFC 3339; the backend rejects bare dates here.
    #[garde(skip)]
    pub start_date: DateTime<Utc>,
}

/// Text portion of a diary entry, sent as multipart fields.
#[derive(Debug, Clone, Validate)]
pub struct EntryForm {
    #[garde(length(chars, max = 200))]
    pub title: String,

    #[garde(length(chars, min = 1))]
    pub content: String,

    #[garde(skip)]
    pub growth_stage: GrowthStage,

    #[garde(skip)]
    pub entry_date: NaiveDate,
}

impl EntryForm {
    /// Field pairs in the order the backend reads them.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("content", self.content.clone()),
            ("growth_stage", self.growth_stage.to_string()),
            ("entry_date", self.entry_date.format("%Y-%m-%d").to_string()),
        ]
    }
}
