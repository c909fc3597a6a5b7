//! Keyword-driven query classification
//!
//! Decides which capabilities a free-text travel question asks for and pulls
//! out the phrase most likely to name a place. Purely lexical: the phrase is a
//! guess and may fail to geocode downstream.

use serde::{Deserialize, Serialize};

const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "forecast", "rain", "snow", "sunny"];

const PLACES_KEYWORDS: &[&str] = &[
    "place",
    "places",
    "sights",
    "attractions",
    "things to do",
    "tourist",
    "tourism",
    "restaurants",
    "hotels",
];

/// Tried in this order; the first one followed by a non-empty phrase wins.
const PLACE_PREPOSITIONS: &[&str] = &["in ", "at "];

/// Something a query can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Weather,
    Places,
}

/// What a query wants and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub wants_weather: bool,
    pub wants_places: bool,
    /// Lowercased place phrase, possibly the whole query
    pub place_text: String,
}

impl Intent {
    #[must_use]
    pub fn wants(&self, topic: Topic) -> bool {
        match topic {
            Topic::Weather => self.wants_weather,
            Topic::Places => self.wants_places,
        }
    }

    #[must_use]
    pub fn wants_any(&self) -> bool {
        self.wants_weather || self.wants_places
    }
}

/// Classify a raw query. Never fails; queries matching no keyword ask for everything.
#[must_use]
pub fn classify(query: &str) -> Intent {
    let text = query.trim().to_lowercase();

    let mut wants_weather = contains_any(&text, WEATHER_KEYWORDS);
    let mut wants_places = contains_any(&text, PLACES_KEYWORDS);
    if !wants_weather && !wants_places {
        wants_weather = true;
        wants_places = true;
    }

    let place_text = extract_place(&text).unwrap_or(&text).to_string();

    Intent {
        wants_weather,
        wants_places,
        place_text,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(*keyword))
}

fn extract_place(text: &str) -> Option<&str> {
    PLACE_PREPOSITIONS.iter().find_map(|preposition| {
        text.split_once(*preposition)
            .map(|(_, rest)| rest.trim())
            .filter(|candidate| !candidate.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Weather in Paris", true, false)]
    #[case("will it rain tomorrow", true, false)]
    #[case("FORECAST for Oslo", true, false)]
    #[case("tourist attractions in Rome", false, true)]
    #[case("hotels near me", false, true)]
    #[case("things to do in Lisbon", false, true)]
    #[case("weather and restaurants in Lyon", true, true)]
    #[case("Paris", true, true)]
    #[case("", true, true)]
    fn test_topic_flags(#[case] query: &str, #[case] weather: bool, #[case] places: bool) {
        let intent = classify(query);
        assert_eq!(intent.wants_weather, weather, "weather flag for {query:?}");
        assert_eq!(intent.wants_places, places, "places flag for {query:?}");
        assert!(intent.wants_any());
    }

    #[rstest]
    #[case("Weather in Paris", "paris")]
    #[case("  weather IN   New York  ", "new york")]
    #[case("restaurants at Shibuya Crossing", "shibuya crossing")]
    #[case("Attractions near Tokyo", "attractions near tokyo")]
    #[case("Paris", "paris")]
    #[case("weather in ", "weather in")]
    #[case("", "")]
    fn test_place_extraction(#[case] query: &str, #[case] place: &str) {
        assert_eq!(classify(query).place_text, place);
    }

    #[test]
    fn test_in_takes_precedence_over_at() {
        // "at " appears first in the text, but "in " is tried first
        let intent = classify("look at hotels in Berlin");
        assert_eq!(intent.place_text, "berlin");
    }

    #[test]
    fn test_weather_in_paris_scenario() {
        let intent = classify("Weather in Paris");
        assert_eq!(
            intent,
            Intent {
                wants_weather: true,
                wants_places: false,
                place_text: "paris".into(),
            }
        );
        assert!(intent.wants(Topic::Weather));
        assert!(!intent.wants(Topic::Places));
    }
}
