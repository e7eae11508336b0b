//! Invitation content types
//!
//! These mirror the JSON shape of an invitation file (camelCase keys) and are
//! immutable once loaded.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use ratatui::style::{Color, Modifier};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct InvitationData {
    pub hero: HeroSection,
    pub events: Vec<EventSection>,
    pub gallery: GallerySection,
    pub theme: ThemeConfig,
    /// Shared so the music player can tell a new config from the one it already holds
    #[serde(default)]
    pub music: Option<Arc<MusicConfig>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub title: String,
    pub bride_name: String,
    pub groom_name: String,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub bg_image: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl HeroSection {
    pub fn couple(&self) -> String {
        format!("{} & {}", self.bride_name, self.groom_name)
    }

    /// The wedding date written out the Indonesian way, e.g. `Minggu, 15 Desember 2024`.
    ///
    /// Falls back to the raw string when the date does not parse.
    pub fn formatted_date(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => format_date_id(date),
            Err(e) => {
                tracing::warn!(date = %self.date, error = %e, "Unparseable hero date");
                self.date.clone()
            }
        }
    }
}

const WEEKDAYS_ID: [&str; 7] = ["Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"];
const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

fn format_date_id(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_ID[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS_ID[date.month0() as usize];
    format!("{}, {} {} {}", weekday, date.day(), month, date.year())
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSection {
    pub id: String,
    pub title: String,
    pub time: String,
    pub location: String,
    pub address: String,
    pub map_link: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GallerySection {
    pub images: Vec<GalleryImage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Elegant,
    Modern,
    Romantic,
    Pinyon,
}

impl FontStyle {
    /// Terminal stand-in for the web font family of each style
    pub fn text_modifier(self) -> Modifier {
        match self {
            FontStyle::Elegant => Modifier::BOLD,
            FontStyle::Modern => Modifier::empty(),
            FontStyle::Romantic => Modifier::ITALIC,
            FontStyle::Pinyon => Modifier::ITALIC | Modifier::BOLD,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_style: FontStyle,
}

impl ThemeConfig {
    pub fn primary(&self) -> Color {
        parse_hex_color(&self.primary_color).unwrap_or(Color::Yellow)
    }

    pub fn secondary(&self) -> Color {
        parse_hex_color(&self.secondary_color).unwrap_or(Color::Gray)
    }

    pub fn accent(&self) -> Color {
        parse_hex_color(&self.accent_color).unwrap_or(Color::White)
    }
}

/// Parse `#RRGGBB` or `#RGB` into an RGB terminal colour.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // Also keeps the byte slicing below on char boundaries
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MusicConfig {
    pub url: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub autoplay: Option<bool>,
}

impl MusicConfig {
    pub fn wants_autoplay(&self) -> bool {
        self.autoplay.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero(date: &str) -> HeroSection {
        HeroSection {
            title: "The Wedding of".into(),
            bride_name: "Sarah".into(),
            groom_name: "Michael".into(),
            date: date.into(),
            bg_image: String::new(),
            subtitle: None,
        }
    }

    #[test]
    fn date_is_written_in_indonesian() {
        assert_eq!(hero("2024-12-15").formatted_date(), "Minggu, 15 Desember 2024");
        assert_eq!(hero("2025-01-03").formatted_date(), "Jumat, 3 Januari 2025");
        assert_eq!(hero("someday").formatted_date(), "someday");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#D4AF37"), Some(Color::Rgb(0xD4, 0xAF, 0x37)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn non_ascii_and_signed_colors_are_rejected() {
        assert_eq!(parse_hex_color("#aéabc"), None);
        assert_eq!(parse_hex_color("#é1"), None);
        assert_eq!(parse_hex_color("#+f+f+f"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn font_style_lookup_is_total() {
        let styles: [FontStyle; 4] = serde_json::from_str(r#"["elegant","modern","romantic","pinyon"]"#).unwrap();
        assert_eq!(styles[0].text_modifier(), Modifier::BOLD);
        assert_eq!(styles[1].text_modifier(), Modifier::empty());
        assert!(styles[3].text_modifier().contains(Modifier::ITALIC));
    }

    #[test]
    fn autoplay_defaults_off() {
        let music: MusicConfig = serde_json::from_str(r#"{"url":"/a.mp3","title":"T","artist":"A"}"#).unwrap();
        assert!(!music.wants_autoplay());
    }
}
