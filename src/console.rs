use colored::{Color, Colorize};

const BANNER: &str = r"
                    _      __ _
 __      _____  _ __| | __ / _| | _____      __
 \ \ /\ / / _ \| '__| |/ /| |_| |/ _ \ \ /\ / /
  \ V  V / (_) | |  |   < |  _| | (_) \ V  V /
   \_/\_/ \___/|_|  |_|\_\|_| |_|\___/ \_/\_/
";

pub fn log(msg: &str) {
    println!("{msg}");
}

pub fn info(msg: &str) {
    println!("\n{}\n", format!(">> {msg}").green());
}

pub fn warning(msg: &str) {
    println!("\n{}\n", format!("Warning: {msg}").yellow());
}

pub fn error(msg: &str) {
    println!("\n{}\n", format!("Error: {msg}").red());
}

/// `label (current)`, or just `label` when there is no current value.
pub fn value(label: &str, current: Option<&str>) -> String {
    match current {
        Some(current) if !current.is_empty() => format!("{label} ({current})"),
        _ => label.to_string(),
    }
}

/// A yellow heading followed by a plain value.
pub fn field(label: &str, value: &str) {
    println!("{} {}", format!("{label}:").yellow(), value.white());
}

pub fn banner() {
    println!("{}", BANNER.yellow());
}

/// Highest is red down to Lowest in blue; Normal and unknown values stay neutral.
pub fn priority_color(priority: i64) -> Option<Color> {
    match priority {
        1 => Some(Color::Red),
        2 => Some(Color::Yellow),
        4 => Some(Color::Cyan),
        5 => Some(Color::Blue),
        _ => None,
    }
}

pub fn paint_priority(text: &str, priority: i64) -> String {
    match priority_color(priority) {
        Some(color) => text.color(color).to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_priorities_to_colors() {
        assert_eq!(priority_color(1), Some(Color::Red));
        assert_eq!(priority_color(2), Some(Color::Yellow));
        assert_eq!(priority_color(3), None);
        assert_eq!(priority_color(4), Some(Color::Cyan));
        assert_eq!(priority_color(5), Some(Color::Blue));
        assert_eq!(priority_color(9), None);
    }

    #[test]
    fn neutral_priority_is_left_unpainted() {
        assert_eq!(paint_priority("New: 1 | a", 3), "New: 1 | a");
        assert_eq!(paint_priority("New: 1 | a", 0), "New: 1 | a");
    }

    #[test]
    fn formats_current_values() {
        assert_eq!(value("Set initials", Some("jv")), "Set initials (jv)");
        assert_eq!(value("Set initials", None), "Set initials");
        assert_eq!(value("Set initials", Some("")), "Set initials");
    }
}
