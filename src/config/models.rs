//! Data model for the add-on configuration file.
//!
//! Every field carries a serde default so a file written by an older
//! version of the add-on deserializes with the missing keys filled in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Smallest allowed scheduling frequency, in minutes.
pub const MIN_FREQUENCY_MINUTES: u32 = 1;
/// Largest allowed scheduling frequency, in minutes (one day).
pub const MAX_FREQUENCY_MINUTES: u32 = 1440;

/// Settings for the periodic card scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Whether the recurring timer should run at all.
    #[serde(default)]
    pub enabled: bool,
    /// Minutes between scheduled cards.
    #[serde(default = "default_frequency")]
    pub frequency: u32,
    /// Name of the deck to pull due cards from.
    #[serde(default = "default_deck")]
    pub deck: String,
    /// Close the popup automatically once the card has been answered.
    #[serde(default)]
    pub auto_close_on_answer: bool,
}

fn default_frequency() -> u32 {
    1
}

fn default_deck() -> String {
    "Default".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: default_frequency(),
            deck: default_deck(),
            auto_close_on_answer: false,
        }
    }
}

impl ScheduleConfig {
    /// Clamp the frequency into the supported range.
    pub fn sanitized(mut self) -> Self {
        self.frequency = self
            .frequency
            .clamp(MIN_FREQUENCY_MINUTES, MAX_FREQUENCY_MINUTES);
        self
    }
}

/// Which answer buttons the popup shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonConfig {
    #[serde(default = "default_true")]
    pub show_again: bool,
    #[serde(default)]
    pub show_hard: bool,
    #[serde(default = "default_true")]
    pub show_good: bool,
    #[serde(default)]
    pub show_easy: bool,
    #[serde(default)]
    pub styles: ButtonStyle,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            show_again: true,
            show_hard: false,
            show_good: true,
            show_easy: false,
            styles: ButtonStyle::default(),
        }
    }
}

/// Shared styling for the popup's answer buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonStyle {
    #[serde(default = "default_button_style_height")]
    pub height: u32,
    #[serde(default = "default_button_min_width")]
    pub min_width: u32,
    #[serde(default = "default_border_radius")]
    pub border_radius: u32,
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    /// Per-button color sets, keyed by button name
    /// (`again`, `hard`, `good`, `easy`, `show_answer`).
    #[serde(default = "default_button_colors")]
    pub colors: BTreeMap<String, ButtonColors>,
}

fn default_button_style_height() -> u32 {
    30
}

fn default_button_min_width() -> u32 {
    50
}

fn default_border_radius() -> u32 {
    3
}

fn default_font_weight() -> String {
    "bold".to_string()
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            height: default_button_style_height(),
            min_width: default_button_min_width(),
            border_radius: default_border_radius(),
            font_weight: default_font_weight(),
            colors: default_button_colors(),
        }
    }
}

/// Color set for a single answer button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonColors {
    pub background: String,
    /// On-disk key is spelled with a space: "background hover".
    #[serde(rename = "background hover")]
    pub background_hover: String,
    pub text: String,
    #[serde(rename = "text hover")]
    pub text_hover: String,
    pub border: String,
}

impl ButtonColors {
    fn accent(accent: &str) -> Self {
        Self {
            background: "#2F2F31".to_string(),
            background_hover: accent.to_string(),
            text: accent.to_string(),
            text_hover: "#2F2F31".to_string(),
            border: accent.to_string(),
        }
    }
}

fn default_button_colors() -> BTreeMap<String, ButtonColors> {
    let mut colors = BTreeMap::new();
    colors.insert("again".to_string(), ButtonColors::accent("#FF1211"));
    colors.insert("hard".to_string(), ButtonColors::accent("#FF9814"));
    colors.insert("good".to_string(), ButtonColors::accent("#33FF2D"));
    colors.insert("easy".to_string(), ButtonColors::accent("#21C0FF"));
    colors.insert("show_answer".to_string(), ButtonColors::accent("#F0F0F0"));
    colors
}

/// Keyboard shortcuts active while the popup has focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotkeys {
    #[serde(default = "default_show_answer_key")]
    pub show_answer: String,
    #[serde(default = "default_again_key")]
    pub again: String,
    #[serde(default = "default_hard_key")]
    pub hard: String,
    #[serde(default = "default_good_key")]
    pub good: String,
    #[serde(default = "default_easy_key")]
    pub easy: String,
    #[serde(default = "default_toggle_stay_on_top_key")]
    pub toggle_stay_on_top: String,
    #[serde(default = "default_replay_sound_key")]
    pub replay_sound: String,
    #[serde(default = "default_replay_second_sound_key")]
    pub replay_second_sound: String,
    #[serde(default = "default_toggle_scheduling_key")]
    pub toggle_scheduling: String,
    #[serde(default = "default_toggle_auto_close_key")]
    pub toggle_auto_close: String,
}

fn default_show_answer_key() -> String {
    "Space".to_string()
}

fn default_again_key() -> String {
    "1".to_string()
}

fn default_hard_key() -> String {
    "2".to_string()
}

fn default_good_key() -> String {
    "3".to_string()
}

fn default_easy_key() -> String {
    "4".to_string()
}

fn default_toggle_stay_on_top_key() -> String {
    "Ctrl+T".to_string()
}

fn default_replay_sound_key() -> String {
    "R".to_string()
}

fn default_replay_second_sound_key() -> String {
    "Ctrl+R".to_string()
}

fn default_toggle_scheduling_key() -> String {
    "Ctrl+Alt+S".to_string()
}

fn default_toggle_auto_close_key() -> String {
    "Ctrl+Alt+A".to_string()
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            show_answer: default_show_answer_key(),
            again: default_again_key(),
            hard: default_hard_key(),
            good: default_good_key(),
            easy: default_easy_key(),
            toggle_stay_on_top: default_toggle_stay_on_top_key(),
            replay_sound: default_replay_sound_key(),
            replay_second_sound: default_replay_second_sound_key(),
            toggle_scheduling: default_toggle_scheduling_key(),
            toggle_auto_close: default_toggle_auto_close_key(),
        }
    }
}

/// Popup colors for one host theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: String,
    pub text: String,
    pub button_bg: String,
    pub button_text: String,
    pub button_border: String,
}

/// Light and dark variants; the host's night-mode setting picks one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_light_theme")]
    pub light: ThemeColors,
    #[serde(default = "default_dark_theme")]
    pub dark: ThemeColors,
}

fn default_light_theme() -> ThemeColors {
    ThemeColors {
        background: "#ffffff".to_string(),
        text: "#000000".to_string(),
        button_bg: "#e0e0e0".to_string(),
        button_text: "#000000".to_string(),
        button_border: "#cccccc".to_string(),
    }
}

fn default_dark_theme() -> ThemeColors {
    ThemeColors {
        background: "#2f2f31".to_string(),
        text: "#ffffff".to_string(),
        button_bg: "#444444".to_string(),
        button_text: "#ffffff".to_string(),
        button_border: "#666666".to_string(),
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light: default_light_theme(),
            dark: default_dark_theme(),
        }
    }
}

/// Optional background image behind the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub image_path: String,
    /// Opacity in percent (0-100).
    #[serde(default = "default_opacity")]
    pub opacity: u32,
}

fn default_opacity() -> u32 {
    100
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            image_path: String::new(),
            opacity: default_opacity(),
        }
    }
}

/// The whole persisted configuration of the add-on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonConfig {
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_button_height")]
    pub button_height: u32,
    #[serde(default = "default_shortcut")]
    pub shortcut: String,
    #[serde(default = "default_position")]
    pub position_x: i32,
    #[serde(default = "default_position")]
    pub position_y: i32,
    #[serde(default = "default_true")]
    pub stay_on_top: bool,
    #[serde(default)]
    pub buttons: ButtonConfig,
    #[serde(default)]
    pub hotkeys: Hotkeys,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub scheduling: ScheduleConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
}

fn default_window_width() -> u32 {
    400
}

fn default_window_height() -> u32 {
    200
}

fn default_button_height() -> u32 {
    40
}

fn default_shortcut() -> String {
    "Ctrl+Shift+M".to_string()
}

fn default_position() -> i32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            button_height: default_button_height(),
            shortcut: default_shortcut(),
            position_x: default_position(),
            position_y: default_position(),
            stay_on_top: true,
            buttons: ButtonConfig::default(),
            hotkeys: Hotkeys::default(),
            theme: ThemeConfig::default(),
            scheduling: ScheduleConfig::default(),
            background: BackgroundConfig::default(),
        }
    }
}

impl AddonConfig {
    /// Clamp all numeric settings into their supported ranges.
    pub fn sanitized(mut self) -> Self {
        self.window_width = self.window_width.clamp(100, 2000);
        self.window_height = self.window_height.clamp(100, 2000);
        self.button_height = self.button_height.clamp(10, 100);
        self.background.opacity = self.background.opacity.min(100);
        self.scheduling = self.scheduling.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: AddonConfig =
            serde_json::from_str(r#"{"scheduling": {"enabled": true}}"#).unwrap();

        assert!(config.scheduling.enabled);
        assert_eq!(config.scheduling.frequency, 1);
        assert_eq!(config.scheduling.deck, "Default");
        assert!(!config.scheduling.auto_close_on_answer);
        assert_eq!(config.window_width, 400);
        assert!(config.stay_on_top);
        assert_eq!(config.hotkeys.toggle_scheduling, "Ctrl+Alt+S");
    }

    #[test]
    fn sanitized_clamps_frequency() {
        let config = ScheduleConfig {
            frequency: 0,
            ..ScheduleConfig::default()
        };
        assert_eq!(config.sanitized().frequency, MIN_FREQUENCY_MINUTES);

        let config = ScheduleConfig {
            frequency: 100_000,
            ..ScheduleConfig::default()
        };
        assert_eq!(config.sanitized().frequency, MAX_FREQUENCY_MINUTES);
    }

    #[test]
    fn sanitized_clamps_window_and_opacity() {
        let mut config = AddonConfig {
            window_width: 10,
            window_height: 9000,
            ..AddonConfig::default()
        };
        config.background.opacity = 250;

        let config = config.sanitized();
        assert_eq!(config.window_width, 100);
        assert_eq!(config.window_height, 2000);
        assert_eq!(config.background.opacity, 100);
    }

    #[test]
    fn button_colors_serialize_with_spaced_keys() {
        let json = serde_json::to_value(ButtonColors::accent("#FF1211")).unwrap();
        assert!(json.get("background hover").is_some());
        assert!(json.get("text hover").is_some());
    }
}
