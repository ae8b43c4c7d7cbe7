// 📚 Prevention Guide - Marine protection content
// Typed content behind the guide page: action lists, educational resources,
// impact statistics, and organization links

use serde::{Deserialize, Serialize};

// ============================================================================
// CONTENT TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub blurb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactStatistic {
    pub metric: String,
    pub value: String,
    pub delta: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreventionGuide {
    pub daily_habits: Vec<String>,
    pub active_participation: Vec<String>,
    pub documentaries: Vec<Resource>,
    pub articles: Vec<Resource>,
    pub video_channels: Vec<Resource>,
    pub impact_statistics: Vec<ImpactStatistic>,
    pub organizations: Vec<Resource>,
    pub reporting_links: Vec<Resource>,
}

fn resource(title: &str, url: &str, blurb: &str) -> Resource {
    Resource {
        title: title.to_string(),
        url: url.to_string(),
        blurb: blurb.to_string(),
    }
}

impl PreventionGuide {
    pub fn new() -> Self {
        PreventionGuide {
            daily_habits: vec![
                "Reduce single-use plastics".to_string(),
                "Choose sustainable seafood".to_string(),
                "Use reef-safe sunscreen".to_string(),
                "Properly dispose of waste".to_string(),
            ],
            active_participation: vec![
                "Join beach cleanup events".to_string(),
                "Support marine conservation groups".to_string(),
                "Report marine pollution incidents".to_string(),
                "Share awareness on social media".to_string(),
            ],
            documentaries: vec![
                resource(
                    "A Plastic Ocean",
                    "https://www.netflix.com/title/80164032",
                    "Documentary on plastic pollution",
                ),
                resource(
                    "Chasing Coral",
                    "https://www.chasingcoral.com/view-the-film/",
                    "Coral bleaching documented across reefs worldwide",
                ),
                resource(
                    "Mission Blue",
                    "https://www.netflix.com/title/70308278",
                    "Sylvia Earle's campaign for protected marine areas",
                ),
                resource(
                    "Seaspiracy",
                    "https://www.netflix.com/title/81014008",
                    "Documentary on industrial fishing",
                ),
            ],
            articles: vec![
                resource(
                    "National Geographic: Ocean Coverage",
                    "https://www.nationalgeographic.com/environment/topic/oceans",
                    "News coverage of ocean science",
                ),
                resource(
                    "The Guardian: Ocean Pollution",
                    "https://www.theguardian.com/environment/ocean-pollution",
                    "News coverage of marine pollution",
                ),
                resource(
                    "NOAA's Ocean Blog",
                    "https://blog.noaa.gov/",
                    "Agency science blog",
                ),
                resource(
                    "Deep Sea News",
                    "http://www.deepseanews.com/",
                    "Marine science blog",
                ),
                resource(
                    "Ocean Conservancy Blog",
                    "https://oceanconservancy.org/blog/",
                    "Conservation stories and campaigns",
                ),
            ],
            video_channels: vec![
                resource(
                    "National Geographic",
                    "https://www.youtube.com/user/NationalGeographic",
                    "Ocean documentaries and marine life features",
                ),
                resource(
                    "BBC Earth",
                    "https://www.youtube.com/bbcearth",
                    "High-quality ocean documentaries and marine life behavior",
                ),
                resource(
                    "Ocean Conservation Research",
                    "https://www.youtube.com/c/OceanConservationResearch",
                    "Scientific insights into marine conservation",
                ),
                resource(
                    "Coral Reef Research",
                    "https://www.youtube.com/c/CoralReefResearch",
                    "Focused content on coral reef ecosystems",
                ),
            ],
            impact_statistics: vec![
                ImpactStatistic {
                    metric: "Plastic in Oceans".to_string(),
                    value: "8M tons/year".to_string(),
                    delta: "+3.2%".to_string(),
                },
                ImpactStatistic {
                    metric: "Coral Reef Loss".to_string(),
                    value: "50% since 1950".to_string(),
                    delta: "-4.7%".to_string(),
                },
                ImpactStatistic {
                    metric: "Marine Species at Risk".to_string(),
                    value: "2,270 species".to_string(),
                    delta: "+2.8%".to_string(),
                },
            ],
            organizations: vec![
                resource(
                    "Ocean Conservancy",
                    "https://oceanconservancy.org/",
                    "Advocacy and cleanup programs",
                ),
                resource(
                    "Marine Conservation Institute",
                    "https://marine-conservation.org/",
                    "Marine protected area science",
                ),
                resource(
                    "Project AWARE",
                    "https://www.padi.com/aware",
                    "Diver-driven conservation",
                ),
                resource(
                    "Sea Shepherd Conservation Society",
                    "https://seashepherd.org/",
                    "Direct-action marine conservation",
                ),
            ],
            reporting_links: vec![
                resource(
                    "NOAA Marine Debris Program",
                    "https://marinedebris.noaa.gov/",
                    "Report and track marine debris",
                ),
                resource(
                    "Environmental Protection Agency",
                    "https://www.epa.gov/report-environment",
                    "Report environmental issues",
                ),
            ],
        }
    }
}

impl Default for PreventionGuide {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
