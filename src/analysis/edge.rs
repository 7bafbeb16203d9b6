//! Edge computation and the recommendation rule table.

use crate::types::{Confidence, Estimate, Recommendation};

const STRONG_EDGE: f64 = 0.10;
const CONFIDENT_EDGE: f64 = 0.05;
const UNCONFIDENT_EDGE: f64 = 0.15;

/// Signed edge of the model estimate over the market-implied probability.
pub fn edge(market_price: f64, estimate: &Estimate) -> f64 {
    estimate.estimated_probability - market_price
}

/// Returns the edge and the first recommendation rule that matches it.
///
/// Rules are evaluated in priority order. There is no HIGH confidence
/// counterpart to the `Buy` rule on the sell side: an edge in [-0.10, -0.05)
/// falls through to `Hold`.
pub fn classify(market_price: f64, estimate: &Estimate) -> (f64, Recommendation) {
    let edge = edge(market_price, estimate);
    let high = estimate.confidence == Confidence::High;

    let recommendation = if high && edge > STRONG_EDGE {
        Recommendation::StrongBuy
    } else if high && edge > CONFIDENT_EDGE {
        Recommendation::Buy
    } else if high && edge < -STRONG_EDGE {
        Recommendation::StrongSell
    } else if edge > UNCONFIDENT_EDGE {
        Recommendation::Buy
    } else if edge < -UNCONFIDENT_EDGE {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    };

    (edge, recommendation)
}

pub fn format_edge_percent(edge: f64) -> String {
    format!("{:+.1}%", edge * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(probability: f64, confidence: Confidence) -> Estimate {
        Estimate {
            estimated_probability: probability,
            confidence,
            reasoning: String::new(),
        }
    }

    fn recommend(edge: f64, confidence: Confidence) -> Recommendation {
        // Price fixed at 0.5 so the estimate carries the edge.
        classify(0.5, &estimate(0.5 + edge, confidence)).1
    }

    #[test]
    fn high_confidence_rules() {
        assert_eq!(recommend(0.12, Confidence::High), Recommendation::StrongBuy);
        assert_eq!(recommend(0.07, Confidence::High), Recommendation::Buy);
        assert_eq!(recommend(-0.12, Confidence::High), Recommendation::StrongSell);
        assert_eq!(recommend(0.02, Confidence::High), Recommendation::Hold);
    }

    #[test]
    fn low_confidence_rules() {
        assert_eq!(recommend(0.20, Confidence::Low), Recommendation::Buy);
        assert_eq!(recommend(-0.20, Confidence::Low), Recommendation::Sell);
        assert_eq!(recommend(0.0, Confidence::Low), Recommendation::Hold);
        assert_eq!(recommend(0.12, Confidence::Low), Recommendation::Hold);
    }

    #[test]
    fn medium_confidence_uses_wide_thresholds() {
        assert_eq!(recommend(0.12, Confidence::Medium), Recommendation::Hold);
        assert_eq!(recommend(0.16, Confidence::Medium), Recommendation::Buy);
        assert_eq!(recommend(-0.16, Confidence::Medium), Recommendation::Sell);
    }

    #[test]
    fn high_confidence_small_negative_edge_holds() {
        assert_eq!(recommend(-0.07, Confidence::High), Recommendation::Hold);
    }

    #[test]
    fn high_confidence_large_negative_edge_is_strong_sell() {
        assert_eq!(recommend(-0.30, Confidence::High), Recommendation::StrongSell);
    }

    #[test]
    fn high_confidence_large_positive_edge_is_strong_buy_not_buy() {
        assert_eq!(recommend(0.40, Confidence::High), Recommendation::StrongBuy);
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(classify(0.0, &estimate(0.10, Confidence::High)).1, Recommendation::Buy);
        assert_eq!(classify(0.0, &estimate(0.05, Confidence::High)).1, Recommendation::Hold);
        assert_eq!(classify(0.5, &estimate(0.5, Confidence::Low)).1, Recommendation::Hold);
    }

    #[test]
    fn edge_is_estimate_minus_price() {
        for (price, probability) in [(0.4, 0.6), (0.73, 0.1), (0.0, 1.0), (0.99, 0.99)] {
            let (edge, _) = classify(price, &estimate(probability, Confidence::Medium));
            assert!((edge - (probability - price)).abs() < 1e-9);
        }
    }

    #[test]
    fn edge_percent_is_signed_with_one_decimal() {
        assert_eq!(format_edge_percent(0.2), "+20.0%");
        assert_eq!(format_edge_percent(-0.123), "-12.3%");
        assert_eq!(format_edge_percent(0.0), "+0.0%");
    }
}
