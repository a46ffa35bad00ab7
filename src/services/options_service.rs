//! Options Service
//!
//! Single-leg option illustration: simplified Greeks, payoff at expiration,
//! breakeven and profit/loss bounds. These are teaching approximations, not
//! a pricing model.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Price multipliers used for the payoff table
const PAYOFF_STEPS: [f64; 5] = [0.8, 0.9, 1.0, 1.1, 1.2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Buy,
    Sell,
}

/// Calculator inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    pub stock_price: f64,
    pub strike_price: f64,
    pub premium: f64,
    pub days_to_expiration: u32,
    pub option_type: OptionType,
    pub position: PositionSide,
    /// Implied volatility in percent
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Risk-free rate in percent
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,
}

fn default_volatility() -> f64 {
    20.0
}

fn default_interest_rate() -> f64 {
    5.0
}

/// Option Greeks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffPoint {
    pub stock_price: f64,
    pub profit_loss: f64,
}

/// Calculator output; `None` bounds are unlimited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionAnalysis {
    pub greeks: OptionGreeks,
    pub breakeven: f64,
    pub max_profit: Option<f64>,
    pub max_loss: Option<f64>,
    pub payoff: Vec<PayoffPoint>,
}

/// Options service for business logic
pub struct OptionsService;

impl OptionsService {
    pub fn analyze(input: &OptionInput) -> Result<OptionAnalysis> {
        Self::validate(input)?;
        debug!(
            "OptionsService::analyze - {:?} {:?} K={} S={}",
            input.position, input.option_type, input.strike_price, input.stock_price
        );

        let payoff = PAYOFF_STEPS
            .iter()
            .map(|step| {
                let price = input.stock_price * step;
                PayoffPoint {
                    stock_price: price,
                    profit_loss: Self::profit_loss(input, price),
                }
            })
            .collect();

        Ok(OptionAnalysis {
            greeks: Self::greeks(input),
            breakeven: Self::breakeven(input),
            max_profit: Self::max_profit(input),
            max_loss: Self::max_loss(input),
            payoff,
        })
    }

    /// Profit or loss per share if held to expiration
    pub fn profit_loss(input: &OptionInput, price_at_expiration: f64) -> f64 {
        let intrinsic = match input.option_type {
            OptionType::Call => (price_at_expiration - input.strike_price).max(0.0),
            OptionType::Put => (input.strike_price - price_at_expiration).max(0.0),
        };

        match input.position {
            PositionSide::Buy => intrinsic - input.premium,
            PositionSide::Sell => input.premium - intrinsic,
        }
    }

    pub fn greeks(input: &OptionInput) -> OptionGreeks {
        let s = input.stock_price;
        let k = input.strike_price;
        let t = f64::from(input.days_to_expiration) / 365.0;
        let r = input.interest_rate / 100.0;
        let sigma = input.volatility / 100.0;
        let sign = match input.position {
            PositionSide::Buy => 1.0,
            PositionSide::Sell => -1.0,
        };

        let sqrt_t = t.sqrt();
        let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);

        // tanh stands in for the normal CDF
        let delta = match input.option_type {
            OptionType::Call => sign * (0.5 + 0.5 * (d1 * 0.5).tanh()),
            OptionType::Put => -sign * (0.5 - 0.5 * (d1 * 0.5).tanh()),
        };

        OptionGreeks {
            delta,
            gamma: (0.01 * (-d1 * d1 / 2.0).exp() / (s * sigma * sqrt_t)).abs(),
            theta: -sign * (input.premium * 0.01) / f64::from(input.days_to_expiration),
            vega: sign * (s * 0.01 * sqrt_t * 0.4),
            rho: sign * (k * t * (-r * t).exp() * 0.01),
        }
    }

    pub fn breakeven(input: &OptionInput) -> f64 {
        let premium = match input.position {
            PositionSide::Buy => input.premium,
            PositionSide::Sell => -input.premium,
        };
        match input.option_type {
            OptionType::Call => input.strike_price + premium,
            OptionType::Put => input.strike_price - premium,
        }
    }

    pub fn max_profit(input: &OptionInput) -> Option<f64> {
        match (input.option_type, input.position) {
            (OptionType::Call, PositionSide::Buy) => None,
            (OptionType::Put, PositionSide::Buy) => Some(input.strike_price - input.premium),
            (_, PositionSide::Sell) => Some(input.premium),
        }
    }

    pub fn max_loss(input: &OptionInput) -> Option<f64> {
        match input.position {
            PositionSide::Buy => Some(input.premium),
            PositionSide::Sell => None,
        }
    }

    fn validate(input: &OptionInput) -> Result<()> {
        if input.stock_price <= 0.0 || input.strike_price <= 0.0 {
            return Err(AppError::Validation(
                "Stock and strike price must be positive".to_string(),
            ));
        }
        if input.days_to_expiration == 0 {
            return Err(AppError::Validation(
                "Days to expiration must be at least 1".to_string(),
            ));
        }
        if input.volatility <= 0.0 {
            return Err(AppError::Validation("Volatility must be positive".to_string()));
        }
        if input.premium < 0.0 {
            return Err(AppError::Validation("Premium cannot be negative".to_string()));
        }
        Ok(())
    }
}
