use crate::contract::CONTRACT_MULTIPLIER;
use crate::errors::EngineResult;
use crate::heatmap::grid::PricingGrid;
use crate::models::{PricingModel, PricingParams};
use rayon::prelude::*;

/// Profit matrix: `z[i][j]` is the profit of one contract when the
/// underlying is at `grid.prices[i]` with `grid.days[j]` left.
///
/// profit = (model value - premium) * 100
///
/// Rows are independent, so they are evaluated on the rayon pool. The
/// first failing cell aborts the whole surface.
pub fn evaluate(
    model: &dyn PricingModel,
    base: &PricingParams,
    grid: &PricingGrid,
    premium: f64,
) -> EngineResult<Vec<Vec<f64>>> {
    let years: Vec<f64> = grid.years().collect();

    grid.prices
        .par_iter()
        .map(|&spot| {
            years
                .iter()
                .map(|&t| {
                    let value = model.price(&base.at(spot, t))?;
                    Ok(cell_profit(value, premium))
                })
                .collect::<EngineResult<Vec<f64>>>()
        })
        .collect()
}

#[inline]
pub fn cell_profit(option_value: f64, premium: f64) -> f64 {
    (option_value - premium) * CONTRACT_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{days_to_years, OptionType};
    use crate::errors::EngineError;
    use crate::models::black_scholes::BlackScholes;

    fn base(option_type: OptionType) -> PricingParams {
        PricingParams::new(100.0, 100.0, 0.1, 0.045, 0.25, option_type)
    }

    #[test]
    fn test_dimensions_and_cell_values() {
        let grid = PricingGrid::build(100.0, 10).unwrap();
        let premium = 3.0;
        let z = evaluate(&BlackScholes, &base(OptionType::Call), &grid, premium).unwrap();
        assert_eq!(z.len(), grid.prices.len());
        assert!(z.iter().all(|row| row.len() == grid.days.len()));

        let (i, j) = (4, 2);
        let params = base(OptionType::Call).at(grid.prices[i], days_to_years(grid.days[j]));
        let expected = (BlackScholes.price(&params).unwrap() - premium) * 100.0;
        assert!((z[i][j] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_expiry_column_is_intrinsic_profit() {
        let grid = PricingGrid::build(100.0, 5).unwrap();
        let premium = 2.5;
        let z = evaluate(&BlackScholes, &base(OptionType::Put), &grid, premium).unwrap();
        let last = grid.days.len() - 1;
        for (i, &s) in grid.prices.iter().enumerate() {
            let expected = ((100.0 - s).max(0.0) - premium) * 100.0;
            assert!(
                (z[i][last] - expected).abs() < 1.0,
                "S={s}: expiry profit {} vs intrinsic {expected}",
                z[i][last]
            );
        }
    }

    #[test]
    fn test_call_profit_increases_with_price() {
        let grid = PricingGrid::build(100.0, 20).unwrap();
        let z = evaluate(&BlackScholes, &base(OptionType::Call), &grid, 2.0).unwrap();
        for j in 0..grid.days.len() {
            for i in 1..grid.prices.len() {
                assert!(z[i - 1][j] >= z[i][j], "call profit must fall as price falls");
            }
        }
    }

    #[test]
    fn test_error_propagates() {
        let grid = PricingGrid::build(100.0, 5).unwrap();
        let bad = PricingParams { sigma: 0.0, ..base(OptionType::Call) };
        let err = evaluate(&BlackScholes, &bad, &grid, 1.0).unwrap_err();
        assert!(matches!(err, EngineError::NumericalDomain(_)));
    }
}
