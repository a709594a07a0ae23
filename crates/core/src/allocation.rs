use serde::{Deserialize, Serialize};

/// Asset class a target instrument belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetType {
    CeloNativeAsset,
    OtherCryptoAssets,
    StableValue,
    NaturalCapital,
}

/// Target portfolio weight for one instrument, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub token: String,
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_tag() {
        let allocation = Allocation {
            asset_type: AssetType::NaturalCapital,
            token: "cMC02".to_string(),
            percent: 0.2,
        };
        let json = serde_json::to_value(&allocation).unwrap();
        assert_eq!(json["type"], "natural-capital");
        assert_eq!(json["token"], "cMC02");
    }
}
