//! Background theme selection
//!
//! Maps the current condition text to a background. Only a handful of
//! conditions have a background; anything else leaves the current one alone.

use ratatui::style::Color;

/// Backgrounds available to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Sunny,
    CloudsFromAbove,
    Rainy,
    RainyCreative,
    FoggyForest,
}

impl Background {
    /// Image asset reference for the background
    pub fn image_ref(&self) -> &'static str {
        match self {
            Background::Sunny => {
                "https://wallpapers.com/images/hd/sunny-weather-with-cherry-blossom-fr2tn0f21evp0viw.jpg"
            }
            Background::CloudsFromAbove => {
                "https://s7d2.scene7.com/is/image/TWCNews/clouds_from_above"
            }
            Background::Rainy => {
                "https://rare-gallery.com/uploads/posts/541375-rain-hd-widescreen.jpg"
            }
            Background::RainyCreative => {
                "https://i.pinimg.com/736x/c4/cb/5a/c4cb5a4b31bae636381bdc24c7990531--rainy-days-creative-inspiration.jpg"
            }
            Background::FoggyForest => {
                "https://c1.wallpaperflare.com/preview/263/621/319/trees-fog-forest-forrest.jpg"
            }
        }
    }

    /// Terminal tint used for the dashboard frame
    pub fn color(&self) -> Color {
        match self {
            Background::Sunny => Color::Yellow,
            Background::CloudsFromAbove => Color::Gray,
            Background::Rainy => Color::Blue,
            Background::RainyCreative => Color::LightBlue,
            Background::FoggyForest => Color::Green,
        }
    }

    /// Short label shown in the dashboard header
    pub fn label(&self) -> &'static str {
        match self {
            Background::Sunny => "sunny",
            Background::CloudsFromAbove => "clouds from above",
            Background::Rainy => "rainy",
            Background::RainyCreative => "rainy days",
            Background::FoggyForest => "foggy forest",
        }
    }
}

/// Background for a condition, or `None` when the condition has no theme
///
/// Matching is exact on the upstream condition text.
pub fn background_for(condition: &str) -> Option<Background> {
    match condition {
        "Sunny" => Some(Background::Sunny),
        "Partly cloudy" => Some(Background::CloudsFromAbove),
        "Rainy" => Some(Background::Rainy),
        "Patchy rain possible" => Some(Background::RainyCreative),
        "Mist" => Some(Background::FoggyForest),
        _ => None,
    }
}
