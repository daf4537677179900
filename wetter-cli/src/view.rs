//! Terminal rendering of the search state: status lines and a grid of day cards.

use chrono::{Locale, NaiveDate, NaiveTime, TimeZone, Utc};
use console::style;
use wetter_core::{DayForecast, SearchState};

pub const LOADING_MESSAGE: &str = "Lade Wetterdaten …";

/// Placeholder for a metric the service had no value for.
pub const MISSING_VALUE: &str = "–";

/// Outer width of one card, borders included.
const CARD_WIDTH: usize = 22;
const CARD_GAP: usize = 2;

/// Weekday, day and month in German, e.g. "Mo, 15. Jan".
pub fn format_day(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized("%a, %-d. %b", Locale::de_DE)
        .to_string()
}

/// How many cards fit next to each other in `width` columns. At least one.
pub fn cards_per_row(width: usize) -> usize {
    ((width + CARD_GAP) / (CARD_WIDTH + CARD_GAP)).max(1)
}

/// One decimal, right-aligned in `width` columns.
fn metric(value: Option<f64>, width: usize) -> String {
    match value {
        Some(v) => format!("{v:>width$.1}"),
        None => format!("{MISSING_VALUE:>width$}"),
    }
}

fn card(day: &DayForecast) -> Vec<String> {
    let inner = CARD_WIDTH - 4;
    let row = |text: String| format!("│ {text:<inner$} │");

    vec![
        format!("┌{}┐", "─".repeat(CARD_WIDTH - 2)),
        row(format_day(day.date)),
        row(format!("Max {} °C", metric(day.temp_max, 6))),
        row(format!("Min {} °C", metric(day.temp_min, 6))),
        row(format!("Regen {} mm", metric(day.precipitation_mm, 5))),
        row(format!("Wind {} km/h", metric(day.wind_speed_kmh, 6))),
        format!("└{}┘", "─".repeat(CARD_WIDTH - 2)),
    ]
}

/// Lay the forecast out as rows of cards.
pub fn render_grid(forecast: &[DayForecast], width: usize) -> String {
    let gap = " ".repeat(CARD_GAP);
    let mut out = String::new();

    for chunk in forecast.chunks(cards_per_row(width)) {
        let cards: Vec<Vec<String>> = chunk.iter().map(card).collect();
        let height = cards.first().map_or(0, Vec::len);

        for line in 0..height {
            let joined: Vec<&str> = cards.iter().map(|c| c[line].as_str()).collect();
            out.push_str(&joined.join(&gap));
            out.push('\n');
        }
    }

    out
}

/// Full view: loading line, error line, city heading, card grid.
pub fn render(state: &SearchState, width: usize) -> String {
    let mut out = String::new();

    if state.is_loading {
        out.push_str(LOADING_MESSAGE);
        out.push('\n');
    }

    if let Some(msg) = &state.error_message {
        out.push_str(&style(msg).red().to_string());
        out.push('\n');
    }

    if state.has_forecast() {
        out.push_str(&style(format!("Wetter für {}", state.city_text)).bold().to_string());
        out.push('\n');
    }

    out.push_str(&render_grid(&state.forecast, width));
    out
}
