use serde::Serialize;

/// Inputs the pricing formula actually depends on. Font and color drive the
/// visual preview only and never affect price.
#[derive(Debug, Clone, Copy)]
pub struct PricingOptions<'a> {
    pub text: &'a str,
    pub size: &'a str,
    pub material: &'a str,
    pub backing: Option<&'a str>,
    pub mounting: Option<&'a str>,
    pub power_option: Option<&'a str>,
}

/// Itemized cost components. Every line item is carried even when zero so
/// callers can render a full breakdown; only the grand total is rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub size_multiplier: f64,
    pub material_cost: f64,
    pub text_length_cost: f64,
    pub backing_cost: f64,
    pub mounting_cost: f64,
    pub power_cost: f64,
    pub total: f64,
}

const BASE_PRICE: f64 = 150.0;
const TEXT_COST_PER_CHAR: f64 = 5.0;

// Unknown tags intentionally fall through to a neutral cost instead of
// failing; the storefront treats unrecognized options as "no extra charge".
fn size_multiplier(size: &str) -> f64 {
    match size {
        "small" => 0.7,
        "medium" => 1.0,
        "large" => 1.5,
        "extra-large" => 2.0,
        _ => 1.0,
    }
}

fn material_cost(material: &str) -> f64 {
    match material {
        "standard" => 0.0,
        "premium" => 50.0,
        "luxury" => 100.0,
        _ => 0.0,
    }
}

fn backing_cost(backing: &str) -> f64 {
    match backing {
        "acrylic" => 30.0,
        "metal" => 50.0,
        "wood" => 40.0,
        _ => 0.0, // includes "none"
    }
}

fn mounting_cost(mounting: &str) -> f64 {
    match mounting {
        "wall" => 25.0,
        "ceiling" => 35.0,
        "stand" => 50.0,
        _ => 0.0,
    }
}

fn power_cost(power: &str) -> f64 {
    match power {
        "battery" => 20.0,
        "solar" => 40.0,
        _ => 0.0, // includes "plug"
    }
}

/// Pure pricing formula:
/// `round((base + material + text + backing + mounting + power) * size_mult)`
pub fn calculate_price(options: PricingOptions<'_>) -> PriceBreakdown {
    let size_multiplier = size_multiplier(options.size);
    let material_cost = material_cost(options.material);
    let text_length_cost = options.text.chars().count() as f64 * TEXT_COST_PER_CHAR;
    let backing_cost = options.backing.map(backing_cost).unwrap_or(0.0);
    let mounting_cost = options.mounting.map(mounting_cost).unwrap_or(0.0);
    let power_cost = options.power_option.map(power_cost).unwrap_or(0.0);

    let subtotal = (BASE_PRICE
        + material_cost
        + text_length_cost
        + backing_cost
        + mounting_cost
        + power_cost)
        * size_multiplier;

    PriceBreakdown {
        base_price: BASE_PRICE,
        size_multiplier,
        material_cost,
        text_length_cost,
        backing_cost,
        mounting_cost,
        power_cost,
        total: subtotal.round(),
    }
}

/// Fixed en-US/USD presentation, e.g. `$1,234.50`. No business logic.
pub fn format_price(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    let cents = (price.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let fraction = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options<'a>(
        text: &'a str,
        size: &'a str,
        material: &'a str,
        backing: Option<&'a str>,
        mounting: Option<&'a str>,
        power: Option<&'a str>,
    ) -> PricingOptions<'a> {
        PricingOptions {
            text,
            size,
            material,
            backing,
            mounting,
            power_option: power,
        }
    }

    #[test]
    fn test_medium_premium_hello() {
        // round((150 + 50 + 25) * 1.0) = 225
        let breakdown = calculate_price(options("HELLO", "medium", "premium", None, None, None));
        assert_eq!(breakdown.material_cost, 50.0);
        assert_eq!(breakdown.text_length_cost, 25.0);
        assert_eq!(breakdown.size_multiplier, 1.0);
        assert_eq!(breakdown.total, 225.0);
    }

    #[test]
    fn test_small_standard_empty_text() {
        // round((150 + 0 + 0) * 0.7) = 105
        let breakdown = calculate_price(options("", "small", "standard", None, None, None));
        assert_eq!(breakdown.text_length_cost, 0.0);
        assert_eq!(breakdown.total, 105.0);
    }

    #[test]
    fn test_all_options_applied() {
        // round((150 + 100 + 20 + 50 + 35 + 40) * 2.0) = 790
        let breakdown = calculate_price(options(
            "OPEN",
            "extra-large",
            "luxury",
            Some("metal"),
            Some("ceiling"),
            Some("solar"),
        ));
        assert_eq!(breakdown.backing_cost, 50.0);
        assert_eq!(breakdown.mounting_cost, 35.0);
        assert_eq!(breakdown.power_cost, 40.0);
        assert_eq!(breakdown.total, 790.0);
    }

    #[test]
    fn test_total_matches_formula_for_all_combinations() {
        let sizes: [(&str, f64); 4] =
            [("small", 0.7), ("medium", 1.0), ("large", 1.5), ("extra-large", 2.0)];
        let materials = [("standard", 0.0), ("premium", 50.0), ("luxury", 100.0)];
        let backings = [None, Some(("acrylic", 30.0)), Some(("metal", 50.0)), Some(("wood", 40.0))];
        let mountings = [None, Some(("wall", 25.0)), Some(("ceiling", 35.0)), Some(("stand", 50.0))];
        let powers = [None, Some(("plug", 0.0)), Some(("battery", 20.0)), Some(("solar", 40.0))];

        for (size, mult) in sizes {
            for (material, mat_cost) in materials {
                for backing in backings {
                    for mounting in mountings {
                        for power in powers {
                            let breakdown = calculate_price(options(
                                "NEON",
                                size,
                                material,
                                backing.map(|(tag, _)| tag),
                                mounting.map(|(tag, _)| tag),
                                power.map(|(tag, _)| tag),
                            ));
                            let expected = ((150.0
                                + mat_cost
                                + 20.0
                                + backing.map(|(_, c)| c).unwrap_or(0.0)
                                + mounting.map(|(_, c)| c).unwrap_or(0.0)
                                + power.map(|(_, c)| c).unwrap_or(0.0))
                                * mult)
                                .round();
                            assert_eq!(breakdown.total, expected, "size={} material={}", size, material);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_unknown_tags_are_neutral() {
        let breakdown = calculate_price(options(
            "HI",
            "gigantic",
            "unobtanium",
            Some("velvet"),
            Some("magnet"),
            Some("nuclear"),
        ));
        assert_eq!(breakdown.size_multiplier, 1.0);
        assert_eq!(breakdown.material_cost, 0.0);
        assert_eq!(breakdown.backing_cost, 0.0);
        assert_eq!(breakdown.mounting_cost, 0.0);
        assert_eq!(breakdown.power_cost, 0.0);
        assert_eq!(breakdown.total, 160.0);
    }

    #[test]
    fn test_pricing_is_pure() {
        let a = calculate_price(options("GLOW", "large", "premium", Some("wood"), None, Some("battery")));
        let b = calculate_price(options("GLOW", "large", "premium", Some("wood"), None, Some("battery")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_none_tags_cost_nothing() {
        let breakdown = calculate_price(options("A", "medium", "standard", Some("none"), Some("none"), Some("plug")));
        assert_eq!(breakdown.backing_cost, 0.0);
        assert_eq!(breakdown.mounting_cost, 0.0);
        assert_eq!(breakdown.power_cost, 0.0);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(225.0), "$225.00");
        assert_eq!(format_price(1234.5), "$1,234.50");
        assert_eq!(format_price(1000000.0), "$1,000,000.00");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(-5.0), "-$5.00");
    }
}
