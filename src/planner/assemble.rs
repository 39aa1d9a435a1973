use super::enrich::{EnrichedImages, placeholder_image};
use crate::models::ItineraryDocument;

/// Merges the ordered enrichment results into the validated document to
/// produce the final response. Purely positional; the enrichment stage
/// emits one URL per activity (in day order) and one per hotel. Should the
/// two ever disagree, the item falls back to its placeholder so the
/// every-item-has-an-image invariant holds regardless.
pub fn merge_images(mut document: ItineraryDocument, images: EnrichedImages) -> ItineraryDocument {
    let mut activity_urls = images.activity_urls.into_iter();
    for day in &mut document.days {
        for activity in &mut day.activities {
            let url = activity_urls
                .next()
                .unwrap_or_else(|| placeholder_image(&activity.name));
            activity.image_url = Some(url);
        }
    }

    let mut hotel_urls = images.hotel_urls.into_iter();
    for hotel in &mut document.suggested_hotels {
        let url = hotel_urls
            .next()
            .unwrap_or_else(|| placeholder_image(&hotel.name));
        hotel.image_url = Some(url);
    }

    document
}
