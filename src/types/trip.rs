use serde::{Deserialize, Serialize};

/// Trip parameters posted by the client.
///
/// Nothing is validated: absent fields fall back to their defaults, and an
/// absent destination is carried through as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default = "default_num_days")]
    pub num_days: u32,
    #[serde(default = "default_travel_theme")]
    pub travel_theme: String,
    #[serde(
        rename = "activities",
        alias = "activity_preferences",
        default = "default_activities"
    )]
    pub activity_preferences: String,
    #[serde(default)]
    pub departure_date: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default = "default_budget")]
    pub budget: String,
    #[serde(default = "default_flight_class")]
    pub flight_class: String,
    #[serde(default = "default_hotel_rating")]
    pub hotel_rating: String,
    #[serde(default)]
    pub visa_required: bool,
    #[serde(default)]
    pub travel_insurance: bool,
}

fn default_num_days() -> u32 {
    5
}

fn default_travel_theme() -> String {
    "Solo Exploration".to_string()
}

fn default_activities() -> String {
    "sightseeing".to_string()
}

fn default_budget() -> String {
    "Standard".to_string()
}

fn default_flight_class() -> String {
    "Economy".to_string()
}

fn default_hotel_rating() -> String {
    "Any".to_string()
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            num_days: default_num_days(),
            travel_theme: default_travel_theme(),
            activity_preferences: default_activities(),
            departure_date: None,
            return_date: None,
            budget: default_budget(),
            flight_class: default_flight_class(),
            hotel_rating: default_hotel_rating(),
            visa_required: false,
            travel_insurance: false,
        }
    }
}

impl TripRequest {
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn with_num_days(mut self, num_days: u32) -> Self {
        self.num_days = num_days;
        self
    }

    /// Destination as it appears in prompt text.
    pub fn destination_label(&self) -> &str {
        self.destination.as_deref().unwrap_or("None")
    }
}

/// Successful response body of the planning endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub destination: Option<String>,
    pub research_summary: String,
    pub hotels_and_restaurants: String,
    pub itinerary: String,
}

/// Failure response body of the planning endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
