use serde::{Deserialize, Serialize};

/// Audio CDN serving the episode files. The deep-link format below is
/// frozen: existing players rely on the exact URL shape.
pub const CDN_BASE: &str = "https://cdn.radio-t.com";

/// One transcript segment bound to an episode and a time range.
///
/// Rows are created once by ingestion and never mutated. Within an episode
/// they are non-overlapping and ordered by `start_time`; that invariant is
/// established by the export, not re-validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub episode_number: u32,
    /// Milliseconds from the start of the episode.
    pub start_time: i64,
    pub end_time: i64,
}

/// Millisecond offset into an episode.
///
/// Formats as elapsed wall-clock time, not calendar time: seconds floor to
/// `ms / 1000` and the hour field grows past 24 with no day rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(i64);

impl Time {
    pub fn from_millis(milliseconds: i64) -> Self {
        Self(milliseconds)
    }

    pub fn milliseconds(self) -> i64 {
        self.0
    }

    pub fn seconds(self) -> i64 {
        self.0 / 1000
    }

    /// Zero-padded `HH:MM:SS`.
    pub fn humanized(self) -> String {
        let s = self.seconds();
        format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.humanized())
    }
}

/// Serializes as the humanized timecode; that string is the API shape.
impl Serialize for Time {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.humanized())
    }
}

/// Sort column and direction for search results.
///
/// Every ordering gets a `start_time ASC` tie-break appended by the query
/// builder, so identical inputs always produce the same result order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    RankAsc,
    RankDesc,
    EpisodeNumberAsc,
    EpisodeNumberDesc,
}

impl OrderBy {
    /// Exhaustive variant-to-SQL mapping. Kept explicit rather than derived
    /// from the variant name so a new variant fails to compile instead of
    /// producing an unguarded SQL fragment.
    pub(crate) fn to_sql(self) -> &'static str {
        match self {
            OrderBy::RankAsc => "rank ASC",
            OrderBy::RankDesc => "rank DESC",
            OrderBy::EpisodeNumberAsc => "episode_number ASC",
            OrderBy::EpisodeNumberDesc => "episode_number DESC",
        }
    }
}

impl std::fmt::Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RankAsc => write!(f, "rank_asc"),
            Self::RankDesc => write!(f, "rank_desc"),
            Self::EpisodeNumberAsc => write!(f, "episode_number_asc"),
            Self::EpisodeNumberDesc => write!(f, "episode_number_desc"),
        }
    }
}

impl std::str::FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rank_asc" => Ok(Self::RankAsc),
            "rank_desc" => Ok(Self::RankDesc),
            "episode_number_asc" => Ok(Self::EpisodeNumberAsc),
            "episode_number_desc" => Ok(Self::EpisodeNumberDesc),
            _ => Err(format!("unknown ordering: {s}")),
        }
    }
}

/// Presentation-ready search hit. Built per query, owned by the response,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub episode_number: u32,
    pub start_time: Time,
    pub end_time: Time,
    pub text: String,
    pub link: String,
}

impl SearchResult {
    pub(crate) fn from_row(text: String, episode_number: u32, start_ms: i64, end_ms: i64) -> Self {
        let start_time = Time::from_millis(start_ms);
        Self {
            episode_number,
            start_time,
            end_time: Time::from_millis(end_ms),
            text,
            link: link_to_fragment_start(episode_number, start_time.seconds()),
        }
    }
}

/// Deep link into the source audio, anchored at the fragment's start
/// second. Integer-second precision matches the humanized timecodes.
pub fn link_to_fragment_start(episode_number: u32, seconds: i64) -> String {
    format!("{CDN_BASE}/rt_podcast{episode_number}.mp3#t={seconds}")
}

/// Corpus-level aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    /// Highest episode number in the index, `None` when the index is empty.
    pub last_episode: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_seconds_floor() {
        assert_eq!(Time::from_millis(0).seconds(), 0);
        assert_eq!(Time::from_millis(999).seconds(), 0);
        assert_eq!(Time::from_millis(1999).seconds(), 1);
        assert_eq!(Time::from_millis(82000).seconds(), 82);
    }

    #[test]
    fn time_humanized() {
        assert_eq!(Time::from_millis(0).humanized(), "00:00:00");
        assert_eq!(Time::from_millis(82000).humanized(), "00:01:22");
        assert_eq!(Time::from_millis(3_661_000).humanized(), "01:01:01");
    }

    #[test]
    fn time_humanized_past_24_hours() {
        // Elapsed time, not calendar time: hours keep counting.
        assert_eq!(Time::from_millis(90_000_000).humanized(), "25:00:00");
    }

    #[test]
    fn time_serializes_as_timecode() {
        let json = serde_json::to_string(&Time::from_millis(82000)).unwrap();
        assert_eq!(json, "\"00:01:22\"");
    }

    #[test]
    fn order_by_sql_mapping() {
        assert_eq!(OrderBy::RankAsc.to_sql(), "rank ASC");
        assert_eq!(OrderBy::RankDesc.to_sql(), "rank DESC");
        assert_eq!(OrderBy::EpisodeNumberAsc.to_sql(), "episode_number ASC");
        assert_eq!(OrderBy::EpisodeNumberDesc.to_sql(), "episode_number DESC");
    }

    #[test]
    fn order_by_round_trips_through_str() {
        for order in [
            OrderBy::RankAsc,
            OrderBy::RankDesc,
            OrderBy::EpisodeNumberAsc,
            OrderBy::EpisodeNumberDesc,
        ] {
            assert_eq!(order.to_string().parse::<OrderBy>().unwrap(), order);
        }
        assert!("rank".parse::<OrderBy>().is_err());
    }

    #[test]
    fn order_by_serde_names() {
        assert_eq!(
            serde_json::to_string(&OrderBy::EpisodeNumberDesc).unwrap(),
            "\"episode_number_desc\""
        );
        let parsed: OrderBy = serde_json::from_str("\"rank_desc\"").unwrap();
        assert_eq!(parsed, OrderBy::RankDesc);
    }

    #[test]
    fn deep_link_format() {
        assert_eq!(
            link_to_fragment_start(649, 0),
            "https://cdn.radio-t.com/rt_podcast649.mp3#t=0"
        );
        assert_eq!(
            link_to_fragment_start(850, 3725),
            "https://cdn.radio-t.com/rt_podcast850.mp3#t=3725"
        );
    }
}
