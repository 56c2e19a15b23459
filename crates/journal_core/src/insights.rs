//! crates/journal_core/src/insights.rs
//!
//! Derived views over a list of journal entries: mood distribution, the most
//! common mood, and entry counts bucketed by day. Pure functions only.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::domain::JournalEntry;

/// How often one mood appears in a set of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodShare {
    pub mood: String,
    /// Emoji of the first entry seen with this mood.
    pub mood_emoji: String,
    pub count: usize,
    /// `round(count / total * 100)`.
    pub percentage: u32,
}

/// Entries that fall on the same local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub label: String,
    pub count: usize,
    /// Emoji of the group's most common mood.
    pub mood_emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insights {
    pub total_entries: usize,
    pub most_common_mood: Option<MoodShare>,
    pub mood_distribution: Vec<MoodShare>,
    pub date_groups: Vec<DateGroup>,
}

/// Computes every insight for `entries` relative to `now`, whose time zone
/// decides where local midnight falls.
pub fn summarize<Tz: TimeZone>(entries: &[JournalEntry], now: &DateTime<Tz>) -> Insights {
    Insights {
        total_entries: entries.len(),
        most_common_mood: most_common_mood(entries),
        mood_distribution: mood_distribution(entries),
        date_groups: group_by_date(entries, now),
    }
}

/// Mood counts with percentages, most frequent first. Moods with equal counts
/// keep the order in which they were first seen.
pub fn mood_distribution(entries: &[JournalEntry]) -> Vec<MoodShare> {
    let total = entries.len();
    let mut shares: Vec<MoodShare> = tally(entries.iter())
        .into_iter()
        .map(|t| t.into_share(total))
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// The mood with the highest count; on a tie, the one encountered first.
pub fn most_common_mood(entries: &[JournalEntry]) -> Option<MoodShare> {
    most_common(tally(entries.iter())).map(|t| t.into_share(entries.len()))
}

/// Labels the local day of `created_at` relative to `now`.
///
/// A missing timestamp counts as `now`; a timestamp after `now` counts as today.
pub fn date_label<Tz: TimeZone>(created_at: Option<DateTime<Utc>>, now: &DateTime<Tz>) -> String {
    let tz = now.timezone();
    let today = now.date_naive();
    let day = created_at
        .map(|t| t.with_timezone(&tz).date_naive())
        .unwrap_or(today);

    match today.signed_duration_since(day).num_days() {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d @ 2..=7 => format!("{} days ago", d),
        _ if day.year() == today.year() => day.format("%b %-d").to_string(),
        _ => day.format("%b %-d, %Y").to_string(),
    }
}

/// Groups entries by `date_label`, in the order each label first appears.
pub fn group_by_date<Tz: TimeZone>(entries: &[JournalEntry], now: &DateTime<Tz>) -> Vec<DateGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<&JournalEntry>> = HashMap::new();

    for entry in entries {
        let label = date_label(Some(entry.created_at), now);
        members
            .entry(label.clone())
            .or_insert_with(|| {
                order.push(label);
                Vec::new()
            })
            .push(entry);
    }

    order
        .into_iter()
        .filter_map(|label| {
            let day = members.remove(&label)?;
            let count = day.len();
            let mood_emoji = most_common(tally(day.into_iter()))
                .map(|t| t.mood_emoji.to_string())
                .unwrap_or_default();
            Some(DateGroup {
                label,
                count,
                mood_emoji,
            })
        })
        .collect()
}

//=========================================================================================
// Counting helpers
//=========================================================================================

struct Tally<'a> {
    mood: &'a str,
    mood_emoji: &'a str,
    count: usize,
}

impl Tally<'_> {
    fn into_share(self, total: usize) -> MoodShare {
        let percentage = if total == 0 {
            0
        } else {
            (self.count as f64 / total as f64 * 100.0).round() as u32
        };
        MoodShare {
            mood: self.mood.to_string(),
            mood_emoji: self.mood_emoji.to_string(),
            count: self.count,
            percentage,
        }
    }
}

/// Counts moods in first-seen order.
fn tally<'a>(entries: impl Iterator<Item = &'a JournalEntry>) -> Vec<Tally<'a>> {
    let mut tallies: Vec<Tally<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for entry in entries {
        match index.get(entry.mood.as_str()) {
            Some(&i) => tallies[i].count += 1,
            None => {
                index.insert(entry.mood.as_str(), tallies.len());
                tallies.push(Tally {
                    mood: &entry.mood,
                    mood_emoji: &entry.mood_emoji,
                    count: 1,
                });
            }
        }
    }
    tallies
}

fn most_common(tallies: Vec<Tally<'_>>) -> Option<Tally<'_>> {
    tallies
        .into_iter()
        .fold(None, |best: Option<Tally<'_>>, t| match best {
            Some(b) if b.count >= t.count => Some(b),
            _ => Some(t),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
    }

    fn entry(id: i32, mood: &str, emoji: &str, created_at: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id,
            user_id: None,
            transcript: "t".to_string(),
            audio_url: None,
            mood: mood.to_string(),
            mood_emoji: emoji.to_string(),
            summary: "s".to_string(),
            ai_response: "r".to_string(),
            created_at,
            duration: None,
        }
    }

    #[test]
    fn distribution_rounds_percentages_and_picks_most_common() {
        let entries = vec![
            entry(1, "happy", "😊", now()),
            entry(2, "happy", "😄", now()),
            entry(3, "sad", "😔", now()),
        ];

        let distribution = mood_distribution(&entries);

        assert_eq!(distribution.len(), 2);
        assert_eq!(distribution[0].mood, "happy");
        assert_eq!(distribution[0].count, 2);
        assert_eq!(distribution[0].percentage, 67);
        assert_eq!(distribution[0].mood_emoji, "😊");
        assert_eq!(distribution[1].mood, "sad");
        assert_eq!(distribution[1].percentage, 33);

        let most_common = most_common_mood(&entries).unwrap();
        assert_eq!(most_common.mood, "happy");
        assert_eq!(most_common.percentage, 67);
    }

    #[test]
    fn ties_favor_the_first_encountered_mood() {
        let entries = vec![
            entry(1, "calm", "😌", now()),
            entry(2, "angry", "😠", now()),
            entry(3, "angry", "😠", now()),
            entry(4, "calm", "😌", now()),
        ];

        assert_eq!(most_common_mood(&entries).unwrap().mood, "calm");
        let moods: Vec<_> = mood_distribution(&entries)
            .into_iter()
            .map(|s| s.mood)
            .collect();
        assert_eq!(moods, vec!["calm", "angry"]);
    }

    #[test]
    fn moods_are_compared_as_opaque_text() {
        let entries = vec![
            entry(1, "Happy", "😊", now()),
            entry(2, "happy", "😊", now()),
        ];
        assert_eq!(mood_distribution(&entries).len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_insights() {
        let insights = summarize(&[], &now());
        assert_eq!(insights.total_entries, 0);
        assert_eq!(insights.most_common_mood, None);
        assert!(insights.mood_distribution.is_empty());
        assert!(insights.date_groups.is_empty());
    }

    #[test]
    fn date_labels_follow_day_distance() {
        let now = now();
        assert_eq!(date_label(Some(now - Duration::hours(14)), &now), "Today");
        assert_eq!(date_label(Some(now - Duration::hours(16)), &now), "Yesterday");
        assert_eq!(date_label(Some(now - Duration::days(2)), &now), "2 days ago");
        assert_eq!(date_label(Some(now - Duration::days(7)), &now), "7 days ago");
        assert_eq!(date_label(Some(now - Duration::days(8)), &now), "Oct 8");
        assert_eq!(
            date_label(Some(Utc.with_ymd_and_hms(2025, 12, 31, 9, 0, 0).unwrap()), &now),
            "Dec 31, 2025"
        );
    }

    #[test]
    fn missing_or_future_timestamps_count_as_today() {
        let now = now();
        assert_eq!(date_label(None, &now), "Today");
        assert_eq!(date_label(Some(now + Duration::days(3)), &now), "Today");
    }

    #[test]
    fn date_labels_use_the_callers_local_midnight() {
        let karachi = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = now().with_timezone(&karachi); // 20:00 local on Oct 16
        // 20:00 UTC on Oct 15 is 01:00 on Oct 16 in UTC+5.
        let late_utc = Utc.with_ymd_and_hms(2026, 10, 15, 20, 0, 0).unwrap();

        assert_eq!(date_label(Some(late_utc), &now), "Today");
        assert_eq!(date_label(Some(late_utc), &now.with_timezone(&Utc)), "Yesterday");
    }

    #[test]
    fn groups_keep_first_seen_order_with_counts_and_emoji() {
        let now = now();
        let entries = vec![
            entry(5, "sad", "😔", now - Duration::hours(1)),
            entry(4, "happy", "😊", now - Duration::hours(2)),
            entry(3, "happy", "😊", now - Duration::hours(3)),
            entry(2, "angry", "😠", now - Duration::days(1)),
            entry(1, "calm", "😌", now - Duration::days(30)),
        ];

        let groups = group_by_date(&entries, &now);

        assert_eq!(
            groups,
            vec![
                DateGroup {
                    label: "Today".to_string(),
                    count: 3,
                    mood_emoji: "😊".to_string(),
                },
                DateGroup {
                    label: "Yesterday".to_string(),
                    count: 1,
                    mood_emoji: "😠".to_string(),
                },
                DateGroup {
                    label: "Sep 16".to_string(),
                    count: 1,
                    mood_emoji: "😌".to_string(),
                },
            ]
        );
    }

    #[test]
    fn summarize_does_not_reorder_or_modify_input() {
        let now = now();
        let entries = vec![
            entry(2, "sad", "😔", now - Duration::days(1)),
            entry(1, "happy", "😊", now),
        ];
        let snapshot = entries.clone();

        let insights = summarize(&entries, &now);

        assert_eq!(entries, snapshot);
        assert_eq!(insights.total_entries, 2);
        assert_eq!(insights.date_groups[0].label, "Yesterday");
    }
}
