//! Prompt text for the three planning stages. Pure formatting, no failure modes.

use crate::types::TripRequest;

/// Flags render capitalized, e.g. `Visa Requirement: False.`
fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Stage 1: destination research
pub fn research_prompt(request: &TripRequest) -> String {
    format!(
        "Research the best attractions and activities in {destination} for a {days}-day {theme} trip. \
         The traveler enjoys: {activities}. Budget: {budget}. Flight Class: {flight_class}. \
         Hotel Rating: {hotel_rating}. Visa Requirement: {visa}. Travel Insurance: {insurance}.",
        destination = request.destination_label(),
        days = request.num_days,
        theme = request.travel_theme.to_lowercase(),
        activities = request.activity_preferences,
        budget = request.budget,
        flight_class = request.flight_class,
        hotel_rating = request.hotel_rating,
        visa = flag(request.visa_required),
        insurance = flag(request.travel_insurance),
    )
}

/// Stage 2: hotels and restaurants. Does not see the research output.
pub fn accommodation_prompt(request: &TripRequest) -> String {
    format!(
        "Find the best hotels and restaurants near popular attractions in {destination} for a {theme} trip. \
         Budget: {budget}. Hotel Rating: {hotel_rating}. Preferred activities: {activities}.",
        destination = request.destination_label(),
        theme = request.travel_theme.to_lowercase(),
        budget = request.budget,
        hotel_rating = request.hotel_rating,
        activities = request.activity_preferences,
    )
}

/// Stage 3: the itinerary, built on both earlier results
pub fn itinerary_prompt(request: &TripRequest, research: &str, hotels: &str) -> String {
    format!(
        "Based on the following data, create a {days}-day itinerary for a {theme} trip to {destination}. \
         The traveler enjoys: {activities}. Budget: {budget}. Flight Class: {flight_class}. \
         Hotel Rating: {hotel_rating}. Visa Requirement: {visa}. Travel Insurance: {insurance}. \
         Research: {research}. Hotels & Restaurants: {hotels}.",
        days = request.num_days,
        theme = request.travel_theme.to_lowercase(),
        destination = request.destination_label(),
        activities = request.activity_preferences,
        budget = request.budget,
        flight_class = request.flight_class,
        hotel_rating = request.hotel_rating,
        visa = flag(request.visa_required),
        insurance = flag(request.travel_insurance),
        research = research,
        hotels = hotels,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_prompt_with_defaults() {
        let prompt = research_prompt(&TripRequest::to("Paris").with_num_days(3));

        assert!(prompt.contains("Paris"));
        assert!(prompt.contains("3-day"));
        assert!(prompt.contains("solo exploration"));
        assert!(prompt.contains("The traveler enjoys: sightseeing."));
        assert!(prompt.contains("Budget: Standard."));
        assert!(prompt.contains("Flight Class: Economy."));
        assert!(prompt.contains("Hotel Rating: Any."));
        assert!(prompt.contains("Visa Requirement: False."));
        assert!(prompt.contains("Travel Insurance: False."));
    }

    #[test]
    fn test_research_prompt_renders_flags_capitalized() {
        let request = TripRequest {
            visa_required: true,
            travel_insurance: true,
            ..TripRequest::to("Paris")
        };
        let prompt = research_prompt(&request);

        assert!(prompt.ends_with("Visa Requirement: True. Travel Insurance: True."));
    }

    #[test]
    fn test_missing_destination_renders_none() {
        let prompt = accommodation_prompt(&TripRequest::default());
        assert!(prompt.contains("attractions in None for a solo exploration trip"));
    }

    #[test]
    fn test_accommodation_prompt_fields() {
        let request = TripRequest {
            hotel_rating: "4 stars".to_string(),
            budget: "Luxury".to_string(),
            ..TripRequest::to("Kyoto")
        };
        let prompt = accommodation_prompt(&request);

        assert!(prompt.starts_with("Find the best hotels and restaurants"));
        assert!(prompt.contains("Kyoto"));
        assert!(prompt.contains("Budget: Luxury."));
        assert!(prompt.contains("Hotel Rating: 4 stars."));
    }

    #[test]
    fn test_itinerary_prompt_embeds_prior_results() {
        let request = TripRequest {
            visa_required: true,
            ..TripRequest::to("Lima").with_num_days(4)
        };
        let prompt = itinerary_prompt(&request, "RESEARCH-TEXT", "HOTEL-TEXT");

        assert!(prompt.contains("create a 4-day itinerary"));
        assert!(prompt.contains("trip to Lima"));
        assert!(prompt.contains("Visa Requirement: True."));
        assert!(prompt.contains("Travel Insurance: False."));
        assert!(prompt.contains("Research: RESEARCH-TEXT."));
        assert!(prompt.contains("Hotels & Restaurants: HOTEL-TEXT."));
    }
}
