/// Which display bucket a raw classifier label falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelVerdict {
    Abnormal,
    Normal,
    Unrecognized,
}

/// Case-insensitive substring match. "abnormal" contains "normal", so the abnormal check
/// has to run first.
pub fn verdict(label: &str) -> LabelVerdict {
    let label = label.to_lowercase();

    // "abn" also covers "abnormal".
    if label.contains("abn") {
        LabelVerdict::Abnormal
    } else if label.contains("normal") {
        LabelVerdict::Normal
    } else {
        LabelVerdict::Unrecognized
    }
}

/// Formats a [0, 1] score as a percentage with one decimal, e.g. `0.873` → `"87.3%"`.
pub fn pct(score: f32) -> String {
    format!("{:.1}%", f64::from(score) * 100.0)
}

pub fn display_text(label: &str, score: f32) -> String {
    let name = match verdict(label) {
        LabelVerdict::Abnormal => "Abnormal",
        LabelVerdict::Normal => "Normal",
        LabelVerdict::Unrecognized => label,
    };

    format!("{} ({})", name, pct(score))
}
