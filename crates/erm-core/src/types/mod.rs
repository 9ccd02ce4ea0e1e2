//! Domain types for portfolio risk analysis.

mod analysis;
mod history;
mod holding;
mod scale;

pub use analysis::{
    AnalysisConfig, ConfidenceLevel, DataFrequency, ReturnMethod, TimeHorizon,
    TRADING_DAYS_PER_YEAR,
};
pub use history::{PriceHistory, PriceSeries};
pub use holding::{AssetType, Holding, Portfolio};
pub use scale::{check_thresholds, score_against, ImpactBasis, MatrixSize, ScaleConfig};
