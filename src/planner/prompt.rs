use super::TripRequest;

/// The exact output contract, enumerated key by key at every nesting level.
/// The response parser enforces precisely this shape.
const RESPONSE_CONTRACT: &str = r#"Respond with a single JSON object using EXACTLY this structure:
{
  "title": string,
  "details": string (2-3 sentence trip overview),
  "days": [
    {
      "day": number (1-based, sequential),
      "title": string,
      "activities": [
        {
          "time": string (e.g. "09:00 AM"),
          "name": string,
          "description": string,
          "rating": number between 0 and 5,
          "positive_review": string (one visitor highlight),
          "negative_review": string (one common complaint)
        }
      ],
      "foodSuggestion": string
    }
  ],
  "suggested_hotels": [
    { "name": string, "price_per_night": number, "rating": number between 0 and 5 }
  ],
  "suggested_transport": [
    { "name": string, "price_per_person": number, "rating": number between 0 and 5, "duration": string }
  ]
}"#;

/// Renders the instruction prompt for one trip. Pure function of the
/// validated request and the normalized budget, so identical input always
/// yields an identical prompt.
pub fn build_prompt(trip: &TripRequest, budget_inr: i64) -> String {
    format!(
        r#"Create a detailed, realistic day-by-day travel itinerary.

TRIP DETAILS:
- From: {source}
- To: {destination}
- Dates: {start} to {end} ({days} days)
- Travelers: {people}
- Budget: {budget} INR total
- Preferred transport: {transport}

{contract}

RULES:
1. The "days" array must contain exactly {days} entries, numbered 1 to {days}.
2. Every price is a plain JSON number in INR. Never format prices as strings and never use any currency other than INR.
3. Every "rating" is a plain JSON number.
4. Include 2-4 activities per day and at least 3 hotel and 2 transport suggestions.
5. Output ONLY the JSON object: no markdown code fences, no commentary, no text before or after it.
"#,
        source = trip.source,
        destination = trip.destination,
        start = trip.start_date,
        end = trip.end_date,
        days = trip.day_count,
        people = trip.people,
        budget = budget_inr,
        transport = trip.transport.as_str(),
        contract = RESPONSE_CONTRACT,
    )
}
