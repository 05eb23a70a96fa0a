//! The two demo grammars: simple sentences and weather reports.

use crate::grammar::{Grammar, Rule};
use crate::utils::Result;

/// Built-in grammars shipped with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// Short affirmations and questions about Jamy and Sabine
    Toy,
    /// A multi-sentence weather forecast
    Weather,
}

impl Sample {
    pub const ALL: [Sample; 2] = [Sample::Toy, Sample::Weather];

    pub fn name(self) -> &'static str {
        match self {
            Sample::Toy => "toy",
            Sample::Weather => "weather",
        }
    }

    pub fn axiom(self) -> &'static str {
        match self {
            Sample::Toy => "S",
            Sample::Weather => "FORECAST",
        }
    }

    pub fn rules(self) -> Vec<Rule> {
        match self {
            Sample::Toy => toy_rules(),
            Sample::Weather => weather_rules(),
        }
    }

    pub fn grammar(self) -> Result<Grammar> {
        Grammar::new(self.rules(), self.axiom())
    }
}

/// Terminals are words, non-terminals are syntactic categories and parts of speech.
pub fn toy_rules() -> Vec<Rule> {
    vec![
        Rule::new("S", ["AFFIRMATION", "."]),
        Rule::new("AFFIRMATION", ["NP", "VP"]),
        Rule::new("AFFIRMATION", ["NP", "VP", "NP"]),
        Rule::new("AFFIRMATION", ["THATP", "THATP", "NP", "VP"]),

        Rule::new("S", ["QUESTION", " ?"]),
        Rule::new("QUESTION", ["AUX", "NP", "VP", "NP"]),
        Rule::new("QUESTION", ["AUX", "THATP", "NP", "VP", "NP"]),
        Rule::new("AUX", ["Does"]),

        Rule::new("THATP", ["NP", "VP", "Ti"]),
        Rule::new("Ti", ["that"]),

        Rule::new("NP", ["Jamy"]),
        Rule::new("NP", ["Sabine"]),

        Rule::new("VP", ["Vi"]),
        Rule::new("Vi", ["reads"]),
        Rule::new("Vi", ["hears"]),
        Rule::new("Vi", ["hear"]),
        Rule::new("Vi", ["believes"]),
        Rule::new("Vi", ["think"]),
        Rule::new("Vi", ["writes"]),
    ]
}

/// Terminals are sentence fragments, non-terminals are syntactico-semantic labels.
pub fn weather_rules() -> Vec<Rule> {
    vec![
        Rule::new("FORECAST", ["INTRO", "WEATHER_S", "AIR_S", "WIND_S", "FAREWELL"]),

        Rule::new("INTRO", ["Weather forecast for", "DATE_P", "."]),

        Rule::new("DATE_P", ["DATE"]),
        Rule::new("DATE_P", ["next", "DAY_OF_WEEK"]),
        Rule::new("DATE_P", ["next", "TIME_WORD"]),

        Rule::new("DATE", ["today"]),
        Rule::new("DATE", ["tomorrow"]),

        Rule::new("DAY_OF_WEEK", ["Monday"]),
        Rule::new("DAY_OF_WEEK", ["Tuesday"]),
        Rule::new("DAY_OF_WEEK", ["Wednesday"]),
        Rule::new("DAY_OF_WEEK", ["Thursday"]),
        Rule::new("DAY_OF_WEEK", ["Friday"]),
        Rule::new("DAY_OF_WEEK", ["Saturday"]),
        Rule::new("DAY_OF_WEEK", ["Sunday"]),

        Rule::new("TIME_WORD", ["month"]),
        Rule::new("TIME_WORD", ["year"]),
        Rule::new("TIME_WORD", ["summer"]),
        Rule::new("TIME_WORD", ["winter"]),
        Rule::new("TIME_WORD", ["autumn"]),
        Rule::new("TIME_WORD", ["spring"]),
        Rule::new("TIME_WORD", ["Christmas"]),
        Rule::new("TIME_WORD", ["Easter"]),

        Rule::new("WEATHER_S", ["TIME", ",", "EXPECTED_WEATHER_1", "."]),
        Rule::new("WEATHER_S", ["TIME", ",", "in", "CITY", "and", "CITY", ",", "EXPECTED_WEATHER_2", "."]),

        Rule::new("TIME", ["In the morning"]),
        Rule::new("TIME", ["In the afternoon"]),
        Rule::new("TIME", ["During the night"]),

        // "is" and "are" variants keep the verb in agreement
        Rule::new("EXPECTED_WEATHER_1", ["WEATHER_TYPE_IS", "is expected in", "CITY"]),
        Rule::new("EXPECTED_WEATHER_1", ["WEATHER_TYPE_ARE", "are expected in", "CITY"]),

        Rule::new("EXPECTED_WEATHER_2", ["WEATHER_TYPE_IS", "is expected but the weather will be", "WEATHER_ADJ"]),
        Rule::new("EXPECTED_WEATHER_2", ["WEATHER_TYPE_ARE", "are expected but the weather will be", "WEATHER_ADJ"]),

        Rule::new("WEATHER_TYPE_IS", ["light rain"]),
        Rule::new("WEATHER_TYPE_IS", ["heavy rain"]),
        Rule::new("WEATHER_TYPE_IS", ["light snow"]),
        Rule::new("WEATHER_TYPE_IS", ["heavy snow"]),

        Rule::new("WEATHER_TYPE_ARE", ["a fair bit of clouds"]),
        Rule::new("WEATHER_TYPE_ARE", ["a lot of clouds"]),

        Rule::new("CITY", ["Toulouse"]),
        Rule::new("CITY", ["Paris"]),
        Rule::new("CITY", ["Marseille"]),
        Rule::new("CITY", ["Montpellier"]),
        Rule::new("CITY", ["Lyon"]),
        Rule::new("CITY", ["Lisbon"]),
        Rule::new("CITY", ["Mumbai"]),
        Rule::new("CITY", ["Atlanta"]),
        Rule::new("CITY", ["Carcavelos"]),
        Rule::new("CITY", ["Barcelona"]),
        Rule::new("CITY", ["Seoul"]),
        Rule::new("CITY", ["Moscow"]),
        Rule::new("CITY", ["Llanfairpwllgwyngyllgogerychwyrndrobwllllantysiliogogogoch"]),
        Rule::new("CITY", ["Maputo"]),
        Rule::new("CITY", ["Luanda"]),
        Rule::new("CITY", ["Gincho"]),
        Rule::new("CITY", ["Algarve"]),

        Rule::new("WEATHER_ADJ", ["sunny"]),
        Rule::new("WEATHER_ADJ", ["cloudy"]),
        Rule::new("WEATHER_ADJ", ["rainy"]),
        Rule::new("WEATHER_ADJ", ["nice"]),
        Rule::new("WEATHER_ADJ", ["stable"]),
        Rule::new("WEATHER_ADJ", ["cold"]),
        Rule::new("WEATHER_ADJ", ["warm"]),
        Rule::new("WEATHER_ADJ", ["good"]),
        Rule::new("WEATHER_ADJ", ["dry"]),
        Rule::new("WEATHER_ADJ", ["humid"]),

        Rule::new("AIR_S", ["AIR", "is noticeable", "AIR_SPEED", "."]),

        Rule::new("AIR", ["Light air"]),
        Rule::new("AIR", ["A gentle breeze"]),
        Rule::new("AIR", ["Polluted air"]),
        Rule::new("AIR", ["Contaminated air"]),

        Rule::new("AIR_SPEED", ["(1 to 7 km/h)"]),
        Rule::new("AIR_SPEED", ["(12 to 20 km/h)"]),
        Rule::new("AIR_SPEED", ["(20 to 30 km/h)"]),

        Rule::new("WIND_S", ["Winds blowing from", "WIND_DIRECTION", "."]),

        Rule::new("WIND_DIRECTION", ["North"]),
        Rule::new("WIND_DIRECTION", ["South"]),
        Rule::new("WIND_DIRECTION", ["East"]),
        Rule::new("WIND_DIRECTION", ["West"]),
        Rule::new("WIND_DIRECTION", ["Southwest"]),
        Rule::new("WIND_DIRECTION", ["Southeast"]),
        Rule::new("WIND_DIRECTION", ["Northeast"]),
        Rule::new("WIND_DIRECTION", ["Northwest"]),

        Rule::new("FAREWELL", ["Have a", "DAY_ADJ", "DAY", "!"]),

        Rule::new("DAY_ADJ", ["nice"]),
        Rule::new("DAY_ADJ", ["lovely"]),
        Rule::new("DAY_ADJ", ["terrific"]),
        Rule::new("DAY_ADJ", ["superb"]),
        Rule::new("DAY_ADJ", ["wonderful"]),

        Rule::new("DAY", ["day"]),
        Rule::new("DAY", ["evening"]),
        Rule::new("DAY", ["afternoon"]),
        Rule::new("DAY", ["morning"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::RandomChooser;

    #[test]
    fn test_samples_build() {
        for sample in Sample::ALL {
            let grammar = sample.grammar().unwrap();
            assert_eq!(grammar.axiom(), sample.axiom());
            assert!(grammar.is_non_terminal(sample.axiom()));
        }
    }

    #[test]
    fn test_toy_sentences_end_with_punctuation() {
        let grammar = Sample::Toy.grammar().unwrap();
        let mut chooser = RandomChooser::seeded(11);
        for _ in 0..20 {
            let tokens = grammar.generate(&mut chooser).unwrap().get_yield();
            let last = tokens.last().unwrap();
            assert!(last == "." || last == " ?", "unexpected ending {:?}", last);
        }
    }

    #[test]
    fn test_weather_report_shape() {
        let grammar = Sample::Weather.grammar().unwrap();
        let mut chooser = RandomChooser::seeded(5);
        for _ in 0..20 {
            let tokens = grammar.generate(&mut chooser).unwrap().get_yield();
            assert_eq!(tokens.first().map(String::as_str), Some("Weather forecast for"));
            assert_eq!(tokens.last().map(String::as_str), Some("!"));
            assert!(tokens.contains(&"Winds blowing from".to_string()));
        }
    }
}
