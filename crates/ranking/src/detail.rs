//! Facility detail aggregation.

use crate::model::{Facility, FacilityDetail, Review};

/// Mean review rating, or `fallback` when there are no reviews.
pub fn average_rating(reviews: &[Review], fallback: f64) -> f64 {
    if reviews.is_empty() {
        return fallback;
    }
    let total: f64 = reviews.iter().map(|r| r.rating).sum();
    total / reviews.len() as f64
}

impl FacilityDetail {
    /// Combine a facility with its reviews.
    pub fn new(facility: Facility, reviews: Vec<Review>) -> Self {
        let average_rating = average_rating(&reviews, facility.rating);
        Self {
            facility,
            reviews,
            average_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FacilityStatus, FacilityType};
    use serde_json::json;

    fn facility() -> Facility {
        Facility {
            id: 3,
            name: "Central Pharmacy".to_string(),
            address: "Silom Rd".to_string(),
            facility_type: FacilityType::Pharmacy,
            lat: 13.728,
            lon: 100.534,
            status: FacilityStatus::Open,
            rating: 3.5,
            phone: None,
            messaging: Some("@centralrx".to_string()),
        }
    }

    fn review(id: i64, rating: f64) -> Review {
        Review {
            id,
            facility_id: 3,
            reviewer_name: format!("Reviewer {id}"),
            rating,
            comment: None,
        }
    }

    #[test]
    fn test_average_of_reviews() {
        let reviews = vec![review(1, 5.0), review(2, 4.0), review(3, 2.0)];
        let detail = FacilityDetail::new(facility(), reviews);
        assert!((detail.average_rating - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(detail.reviews.len(), 3);
    }

    #[test]
    fn test_no_reviews_falls_back_to_static_rating() {
        let detail = FacilityDetail::new(facility(), Vec::new());
        assert_eq!(detail.average_rating, 3.5);
    }

    #[test]
    fn test_detail_json_shape() {
        let detail = FacilityDetail::new(facility(), vec![review(1, 4.0)]);
        let value = serde_json::to_value(detail).unwrap();
        assert_eq!(value["averageRating"], json!(4.0));
        assert_eq!(value["facility"]["type"], "pharmacy");
        assert_eq!(value["reviews"][0]["reviewerName"], "Reviewer 1");
        assert_eq!(value["reviews"][0]["facilityId"], 3);
    }
}
