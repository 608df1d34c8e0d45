use serde::{Deserialize, Serialize};

/// License agreement and the hosts it covers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub id: String,
    #[serde(default)]
    pub agreement_id: String,
    /// Customer support identifier; may be empty for partially entered contracts
    #[serde(default)]
    pub csi: String,
    #[serde(default)]
    pub hosts: Vec<AgreementHost>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgreementHost {
    pub hostname: String,
}
