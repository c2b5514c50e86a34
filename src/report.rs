use crate::brawlstars::battlelog::BattleSummary;
use crate::brawlstars::{BrawlStarsError, PlayerTag};

pub const TITLE: &str = "Brawl Stars recent battle stats";
pub const PROMPT: &str = "Enter player tag (e.g. 1ABCD0ABC): ";
pub const ERROR_BANNER: &str = "❌ Brawl Stars API error:";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn rule(width: usize) -> String {
    "=".repeat(width)
}

pub fn header() -> String {
    format!("{}\n{}", TITLE, rule(40))
}

pub fn querying(tag: &PlayerTag) -> String {
    format!("Querying battle log for {}...", tag)
}

pub fn summary(tag: &PlayerTag, summary: &BattleSummary) -> String {
    let mut lines = vec![
        rule(40),
        format!(" Player: {}", tag),
        format!(" Recent battles: {}", summary.total_battles),
    ];

    lines.push(match (&summary.earliest, &summary.latest) {
        (Some(earliest), Some(latest)) => format!(
            " Period: {} to {} (UTC+8)",
            earliest.format(TIME_FORMAT),
            latest.format(TIME_FORMAT)
        ),
        _ => " Period: unable to parse battle times".to_string(),
    });

    lines.push(rule(40));

    if summary.brawlers.is_empty() {
        lines.push(" No battles found for this player".to_string());
    } else {
        lines.push(" Most used brawlers:".to_string());
        for (i, (brawler, count)) in summary.brawlers.ranked().iter().enumerate() {
            lines.push(format!("  {:2}. {}: {} times", i + 1, brawler, count));
        }
    }

    lines.push(rule(40));
    lines.join("\n")
}

pub fn error(error: &BrawlStarsError) -> String {
    format!("{}\n{}\n{}", rule(60), ERROR_BANNER, error.display_line())
}
