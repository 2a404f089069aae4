//! The three planning roles and how they are assembled from configuration.

use crate::{
    config::AppConfig,
    core::Agent,
    tools::{FunctionFactory, SerpApiTool},
};

pub const RESEARCHER_NAME: &str = "Researcher";
pub const FINDER_NAME: &str = "Hotel & Restaurant Finder";
pub const PLANNER_NAME: &str = "Planner";

pub const RESEARCHER_INSTRUCTIONS: &[&str] = &[
    "Identify the travel destination specified by the user.",
    "Gather detailed information on the destination, including climate, culture, and safety tips.",
    "Find popular attractions, landmarks, and must-visit places.",
    "Search for activities that match the user's interests and travel style.",
    "Prioritize information from reliable sources and official travel guides.",
    "Provide well-structured summaries with key insights and recommendations.",
];

pub const FINDER_INSTRUCTIONS: &[&str] = &[
    "Identify key locations in the user's travel itinerary.",
    "Search for highly rated hotels near those locations.",
    "Search for top-rated restaurants based on cuisine preferences and proximity.",
    "Prioritize results based on user preferences, ratings, and availability.",
    "Provide direct booking links or reservation options where possible.",
];

pub const PLANNER_INSTRUCTIONS: &[&str] = &[
    "Gather details about the user's travel preferences and budget.",
    "Create a detailed itinerary with scheduled activities and estimated costs.",
    "Ensure the itinerary includes transportation options and travel time estimates.",
    "Optimize the schedule for convenience and enjoyment.",
    "Present the itinerary in a structured format.",
];

/// The three roles a pipeline runs, in stage order
#[derive(Debug, Clone)]
pub struct Crew {
    pub researcher: Agent,
    pub finder: Agent,
    pub planner: Agent,
}

impl Crew {
    /// Build all roles from one configuration. The search tool is shared by
    /// the researcher and the finder; the planner works from text alone.
    pub fn from_config(config: &AppConfig) -> Self {
        let search_tools = FunctionFactory::new().with_tool(
            SerpApiTool::new(config.search_api_key.clone())
                .with_base_url(config.search_base_url.as_str()),
        );

        Self {
            researcher: Agent::from_config(RESEARCHER_NAME, config)
                .with_instructions(RESEARCHER_INSTRUCTIONS.iter().copied())
                .with_tools(search_tools.clone())
                .with_datetime_in_instructions(true),
            finder: Agent::from_config(FINDER_NAME, config)
                .with_instructions(FINDER_INSTRUCTIONS.iter().copied())
                .with_tools(search_tools)
                .with_datetime_in_instructions(true),
            planner: Agent::from_config(PLANNER_NAME, config)
                .with_instructions(PLANNER_INSTRUCTIONS.iter().copied())
                .with_datetime_in_instructions(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_differ_only_in_configuration() {
        let crew = Crew::from_config(&AppConfig::default());

        assert_eq!(crew.researcher.name(), RESEARCHER_NAME);
        assert_eq!(crew.finder.name(), FINDER_NAME);
        assert_eq!(crew.planner.name(), PLANNER_NAME);

        assert!(crew.researcher.function_factory().has_function("web_search"));
        assert!(crew.finder.function_factory().has_function("web_search"));
        assert!(crew.planner.function_factory().is_empty());

        assert_eq!(crew.researcher.instructions().len(), RESEARCHER_INSTRUCTIONS.len());
        assert_eq!(crew.planner.instructions()[0], PLANNER_INSTRUCTIONS[0]);
    }

    #[test]
    fn test_roles_share_model_configuration() {
        let config = AppConfig {
            model: "gemini-test".to_string(),
            ..AppConfig::default()
        };
        let crew = Crew::from_config(&config);

        for agent in [&crew.researcher, &crew.finder, &crew.planner] {
            assert_eq!(agent.model(), "gemini-test");
            assert!(agent.system_prompt().contains("The current time is"));
        }
    }
}
