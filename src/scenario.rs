//! Scenario axes and combination enumeration
//!
//! Each product code maps to a fixed set of interest-rate levels and
//! premium-term modes; risk type is always the same two-element axis. The
//! sweep evaluates the cartesian product of the three axes, one engine round
//! trip per combination.

use serde::Serialize;

/// Risk type axis, fixed for every product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskType {
    Standard,
    Subrisk,
}

impl RiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Standard => "Standard",
            RiskType::Subrisk => "Subrisk",
        }
    }
}

pub const RISK_TYPES: [RiskType; 2] = [RiskType::Standard, RiskType::Subrisk];

/// One concrete assignment across all three scenario axes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub int_rate: &'static str,
    pub prem_term: &'static str,
    pub risk_type: RiskType,
}

/// Axis table: product code -> (interest-rate levels, premium-term modes)
fn axes(product: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    match product {
        "UVL01" | "UVL02" | "UVL03" => {
            Some((&["High", "Low", "Guaranteed"], &["Opted term"]))
        }
        "ILP01" => Some((
            &["High", "Low"],
            &["Must-pay term", "Policy term", "Opted term"],
        )),
        _ => None,
    }
}

/// Enumerate the scenario combinations for a product
///
/// Loop nesting is a contract, not a convenience: interest rate outer,
/// premium term middle, risk type inner. Result rows land in this order, and
/// downstream consumers index them positionally. An unrecognized product
/// yields no combinations, which callers treat as "no sweep to run".
pub fn combinations(product: &str) -> Vec<Scenario> {
    let Some((int_rates, prem_terms)) = axes(product) else {
        return Vec::new();
    };

    let mut scenarios = Vec::with_capacity(int_rates.len() * prem_terms.len() * RISK_TYPES.len());
    for &int_rate in int_rates {
        for &prem_term in prem_terms {
            for risk_type in RISK_TYPES {
                scenarios.push(Scenario {
                    int_rate,
                    prem_term,
                    risk_type,
                });
            }
        }
    }

    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uvl_combination_count() {
        // 3 rate levels x 1 premium mode x 2 risk types
        assert_eq!(combinations("UVL01").len(), 6);
        assert_eq!(combinations("UVL02").len(), 6);
        assert_eq!(combinations("UVL03").len(), 6);
    }

    #[test]
    fn test_ilp_combination_count() {
        // 2 rate levels x 3 premium modes x 2 risk types
        assert_eq!(combinations("ILP01").len(), 12);
    }

    #[test]
    fn test_unknown_product_yields_no_scenarios() {
        assert!(combinations("TRM99").is_empty());
        assert!(combinations("").is_empty());
    }

    #[test]
    fn test_enumeration_order() {
        let scenarios = combinations("UVL01");

        // Risk type is the innermost axis
        assert_eq!(scenarios[0].int_rate, "High");
        assert_eq!(scenarios[0].risk_type, RiskType::Standard);
        assert_eq!(scenarios[1].int_rate, "High");
        assert_eq!(scenarios[1].risk_type, RiskType::Subrisk);

        // Interest rate is the outermost axis
        assert_eq!(scenarios[2].int_rate, "Low");
        assert_eq!(scenarios[4].int_rate, "Guaranteed");
    }

    #[test]
    fn test_ilp_premium_term_is_middle_axis() {
        let scenarios = combinations("ILP01");

        assert_eq!(scenarios[0].prem_term, "Must-pay term");
        assert_eq!(scenarios[2].prem_term, "Policy term");
        assert_eq!(scenarios[4].prem_term, "Opted term");
        assert_eq!(scenarios[6].prem_term, "Must-pay term");
        assert_eq!(scenarios[6].int_rate, "Low");
    }
}
