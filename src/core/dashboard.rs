//! Views computed from one user-list snapshot: the total-users card, the
//! sign-ups-per-month series and the feedback carousel.

use crate::domain::model::{UserListResponse, UserRecord};
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::Serialize;
use std::ops::Range;

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserCountCard {
    pub total_count: usize,
    pub formatted_count: String,
    pub as_of: String,
}

impl UserCountCard {
    pub fn new<Tz: TimeZone>(total_count: usize, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            total_count,
            formatted_count: format_thousands(total_count),
            as_of: now.format("%B %d, %Y  %I:%M%p").to_string(),
        }
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySignups {
    pub month: String,
    pub user_count: usize,
}

fn parse_created_at(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Users grouped by the month name they joined in, in first-seen order.
///
/// Months from different years share a bucket.
pub fn monthly_signups_in<Tz: TimeZone>(users: &[UserRecord], tz: &Tz) -> Vec<MonthlySignups>
where
    Tz::Offset: std::fmt::Display,
{
    let mut series: Vec<MonthlySignups> = Vec::new();

    for user in users {
        let Some(raw) = user.created_at.as_deref() else {
            continue;
        };
        let Some(created) = parse_created_at(raw) else {
            tracing::warn!("Skipping user {} with unparseable createdAt '{}'", user.uid, raw);
            continue;
        };

        let month = created.with_timezone(tz).format("%B").to_string();
        match series.iter_mut().find(|entry| entry.month == month) {
            Some(entry) => entry.user_count += 1,
            None => series.push(MonthlySignups {
                month,
                user_count: 1,
            }),
        }
    }

    series
}

pub fn monthly_signups(users: &[UserRecord]) -> Vec<MonthlySignups> {
    monthly_signups_in(users, &Local)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub filled: u8,
}

impl StarRating {
    pub fn from_rating(rating: f64) -> Self {
        let filled = rating.round().clamp(0.0, f64::from(MAX_STARS)) as u8;
        Self { filled }
    }

    pub fn render(&self) -> String {
        (1..=MAX_STARS)
            .map(|i| if i <= self.filled { '\u{2605}' } else { '\u{2606}' })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub full_name: Option<String>,
    pub feedback: String,
    pub photo_url: Option<String>,
    pub rating: f64,
    pub stars: StarRating,
}

/// Users who left both a non-empty text and a non-zero rating.
pub fn feedback_entries(users: &[UserRecord]) -> Vec<FeedbackEntry> {
    users
        .iter()
        .filter_map(|user| {
            let feedback = user.feedback_text.as_deref().filter(|text| !text.is_empty())?;
            let rating = user.rating.filter(|rating| *rating != 0.0)?;
            Some(FeedbackEntry {
                full_name: user.full_name.clone(),
                feedback: feedback.to_string(),
                photo_url: user.photo_url.clone(),
                rating,
                stars: StarRating::from_rating(rating),
            })
        })
        .collect()
}

/// How many feedback cards fit per viewport, and how far one step scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselLayout {
    pub items: usize,
    pub slides_to_slide: usize,
}

impl CarouselLayout {
    pub const DESKTOP: Self = Self {
        items: 3,
        slides_to_slide: 2,
    };
    pub const TABLET: Self = Self {
        items: 2,
        slides_to_slide: 1,
    };
    pub const MOBILE: Self = Self {
        items: 1,
        slides_to_slide: 1,
    };

    pub fn for_width(width: u32) -> Self {
        match width {
            0..=463 => Self::MOBILE,
            464..=1023 => Self::TABLET,
            _ => Self::DESKTOP,
        }
    }

    /// Index ranges visible at each carousel step. The last frame is pulled
    /// back so it is always full.
    pub fn frames(&self, count: usize) -> Vec<Range<usize>> {
        if count == 0 {
            return Vec::new();
        }
        if count <= self.items {
            return vec![0..count];
        }

        let mut frames = Vec::new();
        let mut start = 0;
        loop {
            frames.push(start..start + self.items);
            if start + self.items >= count {
                break;
            }
            start = (start + self.slides_to_slide).min(count - self.items);
        }
        frames
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub user_count: UserCountCard,
    pub signups: Vec<MonthlySignups>,
    pub feedback: Vec<FeedbackEntry>,
}

impl DashboardSummary {
    pub fn build<Tz: TimeZone>(list: &UserListResponse, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            user_count: UserCountCard::new(list.count, now),
            signups: monthly_signups_in(&list.user_list, &now.timezone()),
            feedback: feedback_entries(&list.user_list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(uid: &str, created_at: &str) -> UserRecord {
        UserRecord {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
            full_name: Some(format!("User {uid}")),
            role: Some("user".to_string()),
            photo_url: None,
            created_at: Some(created_at.to_string()),
            feedback_text: None,
            rating: None,
            dob: None,
            gender: None,
            phone_number: None,
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_user_count_card() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 20, 5, 0).unwrap();
        let card = UserCountCard::new(1520, &now);
        assert_eq!(card.formatted_count, "1,520");
        assert_eq!(card.as_of, "October 16, 2026  08:05PM");
    }

    #[test]
    fn test_monthly_signups_keep_first_seen_order() {
        let users = vec![
            user("a", "Tue, 14 Nov 2023 08:12:45 GMT"),
            user("b", "Mon, 02 Oct 2023 10:00:00 GMT"),
            user("c", "Wed, 29 Nov 2023 23:59:59 GMT"),
            user("d", "2024-11-01T09:00:00Z"),
        ];

        let series = monthly_signups_in(&users, &Utc);
        assert_eq!(
            series,
            vec![
                MonthlySignups {
                    month: "November".to_string(),
                    user_count: 3
                },
                MonthlySignups {
                    month: "October".to_string(),
                    user_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_monthly_signups_skip_bad_timestamps() {
        let mut missing = user("b", "");
        missing.created_at = None;
        let users = vec![user("a", "not a date"), missing];
        assert!(monthly_signups_in(&users, &Utc).is_empty());
    }

    #[test]
    fn test_feedback_requires_text_and_rating() {
        let mut rated = user("a", "Tue, 14 Nov 2023 08:12:45 GMT");
        rated.feedback_text = Some("Lovely staff".to_string());
        rated.rating = Some(4.6);

        let mut text_only = user("b", "Tue, 14 Nov 2023 08:12:45 GMT");
        text_only.feedback_text = Some("ok".to_string());

        let mut empty_text = user("c", "Tue, 14 Nov 2023 08:12:45 GMT");
        empty_text.feedback_text = Some(String::new());
        empty_text.rating = Some(3.0);

        let entries = feedback_entries(&[rated, text_only, empty_text]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].feedback, "Lovely staff");
        assert_eq!(entries[0].stars.filled, 5);
    }

    #[test]
    fn test_star_rating() {
        assert_eq!(StarRating::from_rating(3.4).render(), "\u{2605}\u{2605}\u{2605}\u{2606}\u{2606}");
        assert_eq!(StarRating::from_rating(9.0).filled, 5);
        assert_eq!(StarRating::from_rating(-1.0).filled, 0);
    }

    #[test]
    fn test_carousel_layout_breakpoints() {
        assert_eq!(CarouselLayout::for_width(320), CarouselLayout::MOBILE);
        assert_eq!(CarouselLayout::for_width(464), CarouselLayout::TABLET);
        assert_eq!(CarouselLayout::for_width(1023), CarouselLayout::TABLET);
        assert_eq!(CarouselLayout::for_width(1024), CarouselLayout::DESKTOP);
        assert_eq!(CarouselLayout::for_width(4000), CarouselLayout::DESKTOP);
    }

    #[test]
    fn test_carousel_frames() {
        assert!(CarouselLayout::DESKTOP.frames(0).is_empty());
        assert_eq!(CarouselLayout::DESKTOP.frames(2), vec![0..2]);
        assert_eq!(CarouselLayout::DESKTOP.frames(6), vec![0..3, 2..5, 3..6]);
        assert_eq!(CarouselLayout::MOBILE.frames(3), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_dashboard_summary() {
        let mut rated = user("a", "Tue, 14 Nov 2023 08:12:45 GMT");
        rated.feedback_text = Some("Great".to_string());
        rated.rating = Some(5.0);
        let list = UserListResponse {
            user_list: vec![rated, user("b", "Mon, 02 Oct 2023 10:00:00 GMT")],
            count: 4,
        };
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 9, 30, 0).unwrap();

        let summary = DashboardSummary::build(&list, &now);
        assert_eq!(summary.user_count.total_count, 4);
        assert_eq!(summary.signups.len(), 2);
        assert_eq!(summary.feedback.len(), 1);
    }
}
