use super::i18n::Locale;

const METRES_PER_KILOMETRE: f64 = 1_000.;
const SQUARE_METRES_PER_HECTARE: f64 = 10_000.;
const SQUARE_METRES_PER_SQUARE_KILOMETRE: f64 = 1_000_000.;

fn separators(locale: Locale) -> (char, char) {
    match locale {
        Locale::EnUs => (',', '.'),
        Locale::DaDk => ('.', ','),
    }
}

/// Render `value` with a fixed number of decimals and the locale's grouping
/// and decimal separators.
///
/// ```
/// use vidi_shp_import::format::format_number;
/// use vidi_shp_import::i18n::Locale;
///
/// assert_eq!(format_number(1234567.891, 2, Locale::EnUs), "1,234,567.89");
/// assert_eq!(format_number(1234567.891, 2, Locale::DaDk), "1.234.567,89");
/// ```
pub fn format_number(value: f64, decimals: usize, locale: Locale) -> String {
    if !value.is_finite() {
        return "-".into();
    }
    let (group, decimal) = separators(locale);
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(group);
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push(decimal);
        grouped.push_str(frac_part);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0. && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn readable_distance(metres: f64, locale: Locale) -> String {
    if metres > METRES_PER_KILOMETRE {
        format!(
            "{} km",
            format_number(metres / METRES_PER_KILOMETRE, 2, locale)
        )
    } else {
        format!("{} m", format_number(metres, 0, locale))
    }
}

pub fn format_area(square_metres: f64, locale: Locale) -> String {
    if square_metres >= SQUARE_METRES_PER_SQUARE_KILOMETRE {
        let value = square_metres / SQUARE_METRES_PER_SQUARE_KILOMETRE;
        format!("{} km²", format_number(value, 2, locale))
    } else if square_metres >= SQUARE_METRES_PER_HECTARE {
        let value = square_metres / SQUARE_METRES_PER_HECTARE;
        format!("{} ha", format_number(value, 2, locale))
    } else {
        format!("{} m²", format_number(square_metres, 0, locale))
    }
}
