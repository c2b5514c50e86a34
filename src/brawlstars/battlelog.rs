//! Brawl Stars battle log endpoint
//!
//! Only the parts of the payload needed for the usage summary are modelled,
//! everything else in the response is ignored.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::brawlstars::{BrawlStarsResult, PlayerTag};
use crate::settings::Settings;

/// Endpoint url, relative to the base URL
const ENDPOINT: &str = "players";

/// Battle times are reported in UTC and displayed in UTC+8
pub const DISPLAY_OFFSET_SECS: i32 = 8 * 3600;

/// Tried in order, with and without fractional seconds
const BATTLE_TIME_FORMATS: [&str; 2] = ["%Y%m%dT%H%M%S%.fZ", "%Y%m%dT%H%M%SZ"];

/// Fractional seconds carry at most microsecond precision
const MAX_FRACTION_DIGITS: usize = 6;

const UNKNOWN_BRAWLER: &str = "Unknown";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BattleLog {
    #[serde(default)]
    pub items: Vec<BattleRecord>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BattleRecord {
    pub battle_time: Option<String>,
    #[serde(default)]
    pub battle: BattlePayload,
}

/// Team modes fill `teams`, free for all modes fill `players`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BattlePayload {
    pub teams: Option<Vec<Vec<Participant>>>,
    pub players: Option<Vec<Participant>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Participant {
    /// Left untyped, a malformed tag only means the participant doesn't match
    pub tag: Option<Value>,
    pub brawler: Option<Brawler>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Brawler {
    pub name: Option<String>,
}

impl Participant {
    fn tag(&self) -> Option<&str> {
        self.tag.as_ref().and_then(Value::as_str)
    }

    fn brawler_name(&self) -> &str {
        self.brawler
            .as_ref()
            .and_then(|b| b.name.as_deref())
            .unwrap_or(UNKNOWN_BRAWLER)
    }
}

/// Brawler counts, kept in the order the brawlers were first seen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrawlerUsage {
    counts: Vec<(String, u32)>,
}

impl BrawlerUsage {
    pub fn record(&mut self, brawler: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == brawler) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((brawler.to_owned(), 1)),
        }
    }

    pub fn count(&self, brawler: &str) -> u32 {
        self.counts
            .iter()
            .find(|(name, _)| name == brawler)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Most used first. The sort is stable, so ties stay in encounter order.
    pub fn ranked(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> = self
            .counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleSummary {
    pub total_battles: usize,
    pub earliest: Option<DateTime<FixedOffset>>,
    pub latest: Option<DateTime<FixedOffset>>,
    pub brawlers: BrawlerUsage,
}

/// A fraction, if present, has to be 1 to 6 digits right before the `Z`
fn has_valid_fraction(battle_time: &str) -> bool {
    match battle_time.split_once('.') {
        Some((_, fraction)) => {
            let digits = fraction.strip_suffix('Z').unwrap_or(fraction);
            (1..=MAX_FRACTION_DIGITS).contains(&digits.len())
                && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => true,
    }
}

/// Parses a battle time like `20250919T151317.000Z` and shifts it to the display offset.
/// Anything that matches neither format is `None`.
pub fn parse_battle_time(battle_time: &str) -> Option<DateTime<FixedOffset>> {
    if !has_valid_fraction(battle_time) {
        return None;
    }

    let naive = BATTLE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(battle_time, format).ok())?;
    let offset = FixedOffset::east_opt(DISPLAY_OFFSET_SECS)?;
    Some(Utc.from_utc_datetime(&naive).with_timezone(&offset))
}

impl BattleLog {
    pub fn from_json(body: &str) -> BrawlStarsResult<BattleLog> {
        crate::brawlstars::parse_body(body)
    }

    pub fn summarize(&self, tag: &PlayerTag) -> BattleSummary {
        let times: Vec<DateTime<FixedOffset>> = self
            .items
            .iter()
            .filter_map(|item| item.battle_time.as_deref())
            .filter(|time| !time.is_empty())
            .filter_map(parse_battle_time)
            .collect();

        let full_tag = tag.full();
        let mut brawlers = BrawlerUsage::default();
        for item in &self.items {
            let battle = &item.battle;

            // both keys are checked, a battle could in theory carry both
            let team_players = battle.teams.iter().flatten().flatten();
            let solo_players = battle.players.iter().flatten();

            team_players
                .chain(solo_players)
                .filter(|p| p.tag() == Some(full_tag.as_str()))
                .for_each(|p| brawlers.record(p.brawler_name()));
        }

        let summary = BattleSummary {
            total_battles: self.items.len(),
            earliest: times.iter().min().cloned(),
            latest: times.iter().max().cloned(),
            brawlers,
        };

        debug!(
            "{} battles, {} parsed times, {} distinct brawlers for {}",
            summary.total_battles,
            times.len(),
            summary.brawlers.len(),
            tag
        );

        summary
    }
}

/// Requests the battle log of a player and parses it into the appropriate struct
pub fn request(settings: &Settings, tag: &PlayerTag) -> BrawlStarsResult<BattleLog> {
    crate::brawlstars::request::<BattleLog>(
        settings,
        &format!("{}/{}/battlelog", ENDPOINT, tag.encoded()),
    )
}

/// Fetches the battle log and tallies the player's brawler usage in one go
pub fn fetch_summary(settings: &Settings, tag: &PlayerTag) -> BrawlStarsResult<BattleSummary> {
    Ok(request(settings, tag)?.summarize(tag))
}
