//! Typed view of upstream match records.
//!
//! The server never parses matches; it slices and serves the upstream
//! JSON untouched. Clients read each served record into a [`Match`].
//! The feed is loosely typed: any field may be missing, `null`, or carry
//! an unexpected JSON type. [`Match`] models every field as optional and
//! treats a field of the wrong type as absent instead of rejecting the
//! record. Fields this crate does not know about are kept in `extra`.

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A single upcoming or recent match as returned by the upstream feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Upstream identifier. Not provided by every feed; see [`Match::key`].
    #[serde(default)]
    pub id: Option<Value>,

    /// Fixture title, e.g. `"Arsenal - Chelsea"`.
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// Competition name, e.g. `"ENGLAND: Premier League"`.
    #[serde(default, deserialize_with = "lenient")]
    pub competition: Option<String>,

    /// Raw kickoff timestamp as sent upstream.
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,

    /// Thumbnail image URL.
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<String>,

    /// Link to the match page.
    #[serde(default, deserialize_with = "lenient")]
    pub matchview_url: Option<String>,

    /// Link to the competition page.
    #[serde(default, deserialize_with = "lenient")]
    pub competition_url: Option<String>,

    /// Highlight videos, in upstream order. Entries that are not video
    /// objects are skipped; the rest are kept.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub videos: Vec<Video>,

    /// Any other upstream fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A highlight video attached to a [`Match`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Video {
    /// Video title, e.g. `"Highlights"`.
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// HTML snippet containing an `<iframe>` player.
    #[serde(default, deserialize_with = "lenient")]
    pub embed: Option<String>,

    /// Any other upstream fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Match {
    /// Reads one served record.
    ///
    /// Never fails: a record that is not a JSON object reads as an empty
    /// match, so the accumulated list keeps one entry per served item.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Returns a display key for this match.
    ///
    /// Uses the upstream `id` when present, otherwise the match's
    /// position in the accumulated list.
    #[must_use]
    pub fn key(&self, position: usize) -> String {
        match &self.id {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => position.to_string(),
        }
    }

    /// Parses the kickoff timestamp.
    ///
    /// Accepts RFC 3339 as well as the compact `+0000` offset form the
    /// upstream feed uses. Returns `None` when the date is missing or
    /// unparseable.
    #[must_use]
    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The video opened by "watch highlights": the first one, if any.
    #[must_use]
    pub fn highlight(&self) -> Option<&Video> {
        self.videos.first()
    }
}

impl Video {
    /// Extracts the `src` attribute of the first `<iframe>` in the embed
    /// snippet.
    #[must_use]
    pub fn embed_src(&self) -> Option<String> {
        let embed = self.embed.as_deref()?;
        let selector = Selector::parse("iframe").ok()?;
        let fragment = Html::parse_fragment(embed);
        let iframe = fragment.select(&selector).next()?;
        iframe
            .value()
            .attr("src")
            .filter(|src| !src.is_empty())
            .map(str::to_owned)
    }
}

/// Deserializes an optional field, mapping a value of the wrong type to
/// `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Lenient sequence: `null` or a non-array becomes empty, and elements
/// that do not deserialize are skipped individually.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: Value) -> Match {
        let Ok(m) = serde_json::from_value::<Match>(json) else {
            panic!("match should deserialize");
        };
        m
    }

    #[test]
    fn deserializes_scorebat_record() {
        let m = parse(serde_json::json!({
            "title": "Arsenal - Chelsea",
            "competition": "ENGLAND: Premier League",
            "matchviewUrl": "https://example.test/match",
            "competitionUrl": "https://example.test/comp",
            "thumbnail": "https://example.test/thumb.jpg",
            "date": "2024-05-01T19:00:00+0000",
            "videos": [{"title": "Highlights", "embed": "<div></div>"}]
        }));
        assert_eq!(m.title.as_deref(), Some("Arsenal - Chelsea"));
        assert_eq!(m.matchview_url.as_deref(), Some("https://example.test/match"));
        assert_eq!(m.videos.len(), 1);
        assert!(m.extra.is_empty());
    }

    #[test]
    fn wrong_types_and_nulls_become_absent() {
        let m = parse(serde_json::json!({
            "title": 42,
            "competition": null,
            "videos": "nope"
        }));
        assert!(m.title.is_none());
        assert!(m.competition.is_none());
        assert!(m.videos.is_empty());
    }

    #[test]
    fn unknown_fields_are_kept() {
        let m = parse(serde_json::json!({"title": "A - B", "side1": {"name": "A"}}));
        let side = m.extra.get("side1").and_then(|v| v.get("name"));
        assert_eq!(side, Some(&serde_json::json!("A")));
        assert_eq!(m.title.as_deref(), Some("A - B"));
    }

    #[test]
    fn bad_video_entries_do_not_drop_good_ones() {
        let m = parse(serde_json::json!({
            "title": 42,
            "date": null,
            "videos": [
                {"title": "ok", "embed": "<iframe src='https://example.test/e'></iframe>"},
                7,
                "junk",
                {"title": 3, "embed": "<p></p>"}
            ]
        }));
        assert!(m.title.is_none());
        assert!(m.date.is_none());
        assert_eq!(m.videos.len(), 2);
        let Some(first) = m.highlight() else {
            panic!("expected a highlight");
        };
        assert_eq!(first.title.as_deref(), Some("ok"));
        assert_eq!(first.embed_src().as_deref(), Some("https://example.test/e"));
    }

    #[test]
    fn non_object_record_reads_as_empty_match() {
        assert_eq!(Match::from_value(serde_json::json!(7)), Match::default());
        let m = Match::from_value(serde_json::json!({"title": "A - B"}));
        assert_eq!(m.title.as_deref(), Some("A - B"));
    }

    #[test]
    fn key_falls_back_to_position() {
        let mut m = Match::default();
        assert_eq!(m.key(7), "7");

        m.id = Some(serde_json::json!(""));
        assert_eq!(m.key(7), "7");

        m.id = Some(serde_json::json!("abc"));
        assert_eq!(m.key(7), "abc");

        m.id = Some(serde_json::json!(99));
        assert_eq!(m.key(7), "99");
    }

    #[test]
    fn kickoff_accepts_both_offset_forms() {
        let mut m = Match {
            date: Some("2024-05-01T19:00:00+0000".to_string()),
            ..Match::default()
        };
        let Some(compact) = m.kickoff() else {
            panic!("compact offset should parse");
        };

        m.date = Some("2024-05-01T21:00:00+02:00".to_string());
        let Some(rfc) = m.kickoff() else {
            panic!("rfc3339 should parse");
        };
        assert_eq!(compact, rfc);

        m.date = Some("tomorrow".to_string());
        assert!(m.kickoff().is_none());
    }

    #[test]
    fn embed_src_reads_first_iframe() {
        let video = Video {
            embed: Some(
                "<div style='width:100%'><iframe src='https://example.test/embed/1' \
                 frameborder='0'></iframe></div><iframe src='https://example.test/embed/2'></iframe>"
                    .to_string(),
            ),
            ..Video::default()
        };
        assert_eq!(
            video.embed_src().as_deref(),
            Some("https://example.test/embed/1")
        );
    }

    #[test]
    fn embed_src_none_without_iframe() {
        let video = Video {
            embed: Some("<p>no player</p>".to_string()),
            ..Video::default()
        };
        assert!(video.embed_src().is_none());
        assert!(Video::default().embed_src().is_none());
    }

    #[test]
    fn highlight_is_first_video() {
        let m = parse(serde_json::json!({
            "videos": [{"title": "first"}, {"title": "second"}]
        }));
        let Some(video) = m.highlight() else {
            panic!("expected highlight");
        };
        assert_eq!(video.title.as_deref(), Some("first"));
    }
}
