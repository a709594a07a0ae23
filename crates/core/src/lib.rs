pub mod allocation;
pub mod config;
pub mod config_loader;
pub mod holdings;
pub mod provider;
pub mod rates;
pub mod token;
pub mod traits;

pub use allocation::{Allocation, AssetType};
pub use config::{CacheConfig, ReserveConfig, StableConfig, TimeoutConfig};
pub use config_loader::ConfigLoader;
pub use holdings::{AssetHolding, CeloHoldings, CustodyBalances, FloatPosition, Holdings};
pub use provider::{Measurement, ProviderFailure, ProviderResult, ProviderSource};
pub use rates::FiatRates;
pub use token::TokenModel;
pub use traits::{ChainReader, HoldingsProvider, RateProvider};
