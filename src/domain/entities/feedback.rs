use crate::domain::value_objects::{EventId, Usn};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Post-event rating and comment, tied to a prior registration. One per
/// (event, student) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    pub event_id: EventId,
    pub usn: Usn,
    pub author_email: String,
    pub author_name: String,
    pub rating: u8,
    pub comment: String,
    pub submitted_at: i64,
}

impl Feedback {
    pub fn new(
        event_id: EventId,
        usn: Usn,
        author_email: String,
        author_name: String,
        rating: u8,
        comment: String,
    ) -> Self {
        Self {
            event_id,
            usn,
            author_email,
            author_name,
            rating,
            comment,
            submitted_at: Utc::now().timestamp(),
        }
    }
}

/// Aggregate view shown on the organizer's feedback page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub count: u32,
    /// Arithmetic mean rounded to one decimal; `None` when there is no
    /// feedback (never a divide by zero).
    pub average_rating: Option<f64>,
}

impl FeedbackSummary {
    pub fn from_ratings(ratings: &[u8]) -> Self {
        if ratings.is_empty() {
            return Self {
                count: 0,
                average_rating: None,
            };
        }
        let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
        let mean = f64::from(sum) / ratings.len() as f64;
        Self {
            count: ratings.len() as u32,
            average_rating: Some((mean * 10.0).round() / 10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_has_no_average() {
        let summary = FeedbackSummary::from_ratings(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_rating, None);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let summary = FeedbackSummary::from_ratings(&[5, 4, 4]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, Some(4.3));
    }

    #[test]
    fn single_rating_average() {
        let summary = FeedbackSummary::from_ratings(&[2]);
        assert_eq!(summary.average_rating, Some(2.0));
    }
}
