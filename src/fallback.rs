//! Rule-based planner used when no language model is configured

use crate::models::Headlines;

/// Headline keywords that trigger a rescheduling advisory
const CRITICAL_KEYWORDS: [&str; 5] = ["alert", "storm", "strike", "emergency", "flood"];

const CLOSING_LINE: &str =
    "Suggested schedule: morning focus work, afternoon errands with buffer time.";

/// Build a short plan from the weather condition group and the headlines.
///
/// Only the first critical headline is quoted.
#[must_use]
pub fn fallback_plan(main_category: &str, headlines: &Headlines) -> String {
    let mut plan: Vec<String> = Vec::new();

    let condition = main_category.to_lowercase();
    if condition.contains("rain") {
        plan.push("Carry an umbrella / waterproof jacket.".to_string());
        plan.push(
            "Avoid scheduling long outdoor meetings; consider indoor alternatives.".to_string(),
        );
    } else if condition.contains("clear") || condition.contains("sun") {
        plan.push("Good day for outdoor activities: short walk or exercise.".to_string());
    } else {
        plan.push("Check local conditions before leaving; bring a light jacket.".to_string());
    }

    if let Some(headline) = first_critical(headlines) {
        plan.push(format!(
            "Important news: {headline} — consider rescheduling sensitive plans."
        ));
    }

    plan.push(CLOSING_LINE.to_string());
    plan.join("\n")
}

fn first_critical(headlines: &Headlines) -> Option<&str> {
    headlines.iter().flatten().find(|headline| {
        let lower = headline.to_lowercase();
        CRITICAL_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    })
}
