use crate::models::trip::RideOption;

/// Discount applied to trips recorded before discount_percent existed.
/// Those trips must not be treated as 0% off.
pub const DISCOUNT_FALLBACK: f64 = 0.20;

/// Displayed prices for one trip, derived per request from its ride
/// options. Recomputing from the same inputs always gives the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct TripValuation {
    /// Minimum extracted price among the options ("valor no app").
    /// 0.0 when no option yields a price, so the table always has a
    /// currency value to format.
    pub base: f64,
    pub discounted: f64,
    /// Recorded percent rounded to a whole number. None when the trip
    /// predates discount_percent and the fallback was used.
    pub discount_percent_display: Option<i32>,
}

pub struct ValuationService;

impl ValuationService {
    /// Parse a Brazilian-locale currency string ("R$ 1.234,56", "12.34").
    ///
    /// The last occurrence of ',' or '.' is the decimal separator; every
    /// earlier one is a thousands separator. A single '.' with no decimal
    /// part still goes through the last-separator rule, so "1.234" yields
    /// 1.234 rather than 1234.
    pub fn parse_price(raw: &str) -> Option<f64> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = strip_currency_token(&compact);

        let combined = match cleaned.rfind([',', '.']) {
            None => cleaned,
            Some(sep) => {
                let int_part: String = cleaned[..sep]
                    .chars()
                    .filter(|c| *c != '.' && *c != ',')
                    .collect();
                let dec_part: String = cleaned[sep + 1..]
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect();
                if dec_part.is_empty() {
                    int_part
                } else {
                    format!("{}.{}", int_part, dec_part)
                }
            }
        };

        match combined.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => None,
        }
    }

    /// Price of one ride option: the structured numeric field wins when it
    /// is finite, otherwise the raw price string is parsed. Options with
    /// neither contribute no candidate.
    pub fn extract_price(option: &RideOption) -> Option<f64> {
        if let Some(value) = option.value {
            if value.is_finite() {
                return Some(value);
            }
        }
        option.price.as_deref().and_then(Self::parse_price)
    }

    /// Base and discounted price for one trip. Pure and total: any input,
    /// including an empty option list, produces a fully-populated result.
    pub fn aggregate(discount_percent: Option<f64>, options: &[RideOption]) -> TripValuation {
        let candidates: Vec<f64> = options.iter().filter_map(Self::extract_price).collect();

        let base = if candidates.is_empty() {
            0.0
        } else {
            candidates.iter().copied().fold(f64::INFINITY, f64::min)
        };

        let recorded = discount_percent.filter(|pct| pct.is_finite());
        let fraction = recorded.unwrap_or(DISCOUNT_FALLBACK);

        TripValuation {
            base,
            // No clamp: a fraction >= 1 gives a negative price.
            discounted: base * (1.0 - fraction),
            discount_percent_display: recorded.map(|pct| (pct * 100.0).round() as i32),
        }
    }
}

/// Remove the first case-insensitive "R$" token. The symbol can appear
/// anywhere after whitespace removal ("R$12,34", "12,34R$").
fn strip_currency_token(s: &str) -> String {
    let bytes = s.as_bytes();
    match bytes
        .windows(2)
        .position(|pair| pair[0].eq_ignore_ascii_case(&b'r') && pair[1] == b'$')
    {
        Some(idx) => format!("{}{}", &s[..idx], &s[idx + 2..]),
        None => s.to_string(),
    }
}
