use serde_json::{Map, Value};

use crate::error::PlanError;
use crate::models::{Activity, DayPlan, HotelSuggestion, ItineraryDocument, TransportOption};

/// Parses raw model output into a validated itinerary document.
///
/// The model is an untrusted producer: its text is first parsed into a
/// generic JSON value, then walked field by field into the typed document.
/// Every failure is a `Schema` error naming the offending field, so the
/// retry controller can decide whether another attempt is worthwhile and
/// the logs say exactly what the model got wrong.
pub fn parse_itinerary(raw: &str, expected_days: u32) -> Result<ItineraryDocument, PlanError> {
    let stripped = strip_code_fences(raw);
    let value: Value = serde_json::from_str(stripped)
        .map_err(|e| PlanError::Schema(format!("output is not valid JSON: {e}")))?;
    let root = as_object(&value, "")?;

    let title = str_field(root, "", "title")?;
    let details = str_field(root, "", "details")?;

    let days_raw = array_field(root, "", "days")?;
    if days_raw.len() != expected_days as usize {
        return Err(PlanError::Schema(format!(
            "days: expected {} entries, got {}",
            expected_days,
            days_raw.len()
        )));
    }
    let mut days = Vec::with_capacity(days_raw.len());
    for (idx, day_value) in days_raw.iter().enumerate() {
        days.push(parse_day(day_value, idx)?);
    }

    let hotels_raw = array_field(root, "", "suggested_hotels")?;
    let mut suggested_hotels = Vec::with_capacity(hotels_raw.len());
    for (idx, hotel_value) in hotels_raw.iter().enumerate() {
        suggested_hotels.push(parse_hotel(hotel_value, idx)?);
    }

    let transport_raw = array_field(root, "", "suggested_transport")?;
    let mut suggested_transport = Vec::with_capacity(transport_raw.len());
    for (idx, transport_value) in transport_raw.iter().enumerate() {
        suggested_transport.push(parse_transport(transport_value, idx)?);
    }

    Ok(ItineraryDocument {
        title,
        details,
        days,
        suggested_hotels,
        suggested_transport,
    })
}

/// Drops leading/trailing Markdown code-fence markers, which models emit
/// despite being told not to.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

fn parse_day(value: &Value, idx: usize) -> Result<DayPlan, PlanError> {
    let path = format!("days[{idx}]");
    let obj = as_object(value, &path)?;

    let day = u64_field(obj, &path, "day")?;
    let expected = idx as u64 + 1;
    if day != expected {
        return Err(PlanError::Schema(format!(
            "{path}.day: expected {expected}, got {day}"
        )));
    }

    let activities_raw = array_field(obj, &path, "activities")?;
    let mut activities = Vec::with_capacity(activities_raw.len());
    for (activity_idx, activity_value) in activities_raw.iter().enumerate() {
        activities.push(parse_activity(activity_value, idx, activity_idx)?);
    }

    Ok(DayPlan {
        day: day as u32,
        title: str_field(obj, &path, "title")?,
        activities,
        food_suggestion: str_field(obj, &path, "foodSuggestion")?,
    })
}

fn parse_activity(value: &Value, day_idx: usize, idx: usize) -> Result<Activity, PlanError> {
    let path = format!("days[{day_idx}].activities[{idx}]");
    let obj = as_object(value, &path)?;
    Ok(Activity {
        time: str_field(obj, &path, "time")?,
        name: str_field(obj, &path, "name")?,
        description: str_field(obj, &path, "description")?,
        rating: num_field(obj, &path, "rating")?,
        positive_review: str_field(obj, &path, "positive_review")?,
        negative_review: str_field(obj, &path, "negative_review")?,
        image_url: None,
    })
}

fn parse_hotel(value: &Value, idx: usize) -> Result<HotelSuggestion, PlanError> {
    let path = format!("suggested_hotels[{idx}]");
    let obj = as_object(value, &path)?;
    Ok(HotelSuggestion {
        name: str_field(obj, &path, "name")?,
        price_per_night: num_field(obj, &path, "price_per_night")?,
        rating: num_field(obj, &path, "rating")?,
        image_url: None,
    })
}

fn parse_transport(value: &Value, idx: usize) -> Result<TransportOption, PlanError> {
    let path = format!("suggested_transport[{idx}]");
    let obj = as_object(value, &path)?;
    Ok(TransportOption {
        name: str_field(obj, &path, "name")?,
        price_per_person: num_field(obj, &path, "price_per_person")?,
        rating: num_field(obj, &path, "rating")?,
        duration: str_field(obj, &path, "duration")?,
    })
}

fn key_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, PlanError> {
    value.as_object().ok_or_else(|| {
        let what = if path.is_empty() { "document" } else { path };
        PlanError::Schema(format!("{what}: expected an object"))
    })
}

fn field<'a>(obj: &'a Map<String, Value>, path: &str, key: &str) -> Result<&'a Value, PlanError> {
    obj.get(key)
        .ok_or_else(|| PlanError::Schema(format!("{}: missing", key_path(path, key))))
}

fn str_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<String, PlanError> {
    field(obj, path, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PlanError::Schema(format!("{}: expected a string", key_path(path, key))))
}

/// Numbers must be JSON numbers; "1500" does not count.
fn num_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<f64, PlanError> {
    field(obj, path, key)?
        .as_f64()
        .ok_or_else(|| PlanError::Schema(format!("{}: expected a number", key_path(path, key))))
}

fn u64_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<u64, PlanError> {
    field(obj, path, key)?.as_u64().ok_or_else(|| {
        PlanError::Schema(format!(
            "{}: expected a non-negative integer",
            key_path(path, key)
        ))
    })
}

fn array_field<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<&'a Vec<Value>, PlanError> {
    field(obj, path, key)?
        .as_array()
        .ok_or_else(|| PlanError::Schema(format!("{}: expected an array", key_path(path, key))))
}
