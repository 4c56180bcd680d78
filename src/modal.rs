//! Payloads of "show modal" requests raised by console actions.
//!
//! A request names one of a closed set of modal kinds and optionally carries
//! a detail payload whose shape is fixed by the kind:
//!
//! | kind                    | detail                    |
//! |-------------------------|---------------------------|
//! | `create_satellite`      | [`CreateSatelliteDetail`] |
//! | `topup_satellite`       | [`SatelliteDetail`]       |
//! | `add_custom_domain`     | [`SatelliteDetail`]       |
//! | `topup_mission_control` | none                      |
//!
//! The wire form is `{"type": kind, "detail"?: {...}}`. A mismatched detail
//! is rejected both by [`ModalRequest::new`] and when deserializing.

use crate::i18n::I18nBundle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Satellite record as exposed by mission control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Satellite {
    /// Principal of the satellite canister, in text form
    pub satellite_id: String,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Nanoseconds since the Unix epoch
    pub created_at: u64,

    /// Nanoseconds since the Unix epoch
    pub updated_at: u64,
}

impl Satellite {
    /// The user-given name, stored under the `name` metadata key.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").map(String::as_str)
    }
}

/// Detail for modals scoped to an existing satellite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SatelliteDetail {
    pub satellite: Satellite,
}

/// Mission control funds available to pay for a creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionControlBalance {
    /// ICP balance in e8s
    pub balance: u64,
    pub credits: u64,
}

/// Detail for the satellite creation modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSatelliteDetail {
    /// Creation fee in e8s
    pub fee: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_control_balance: Option<MissionControlBalance>,
}

/// The closed set of modal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    CreateSatellite,
    TopupSatellite,
    TopupMissionControl,
    AddCustomDomain,
}

/// Shape of a detail payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailShape {
    CreateSatellite,
    Satellite,
}

impl ModalKind {
    pub const ALL: [ModalKind; 4] = [
        ModalKind::CreateSatellite,
        ModalKind::TopupSatellite,
        ModalKind::TopupMissionControl,
        ModalKind::AddCustomDomain,
    ];

    /// Wire name of the kind (e.g., "create_satellite").
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalKind::CreateSatellite => "create_satellite",
            ModalKind::TopupSatellite => "topup_satellite",
            ModalKind::TopupMissionControl => "topup_mission_control",
            ModalKind::AddCustomDomain => "add_custom_domain",
        }
    }

    /// The detail shape this kind accepts, if it accepts one at all.
    pub fn detail_shape(&self) -> Option<DetailShape> {
        match self {
            ModalKind::CreateSatellite => Some(DetailShape::CreateSatellite),
            ModalKind::TopupSatellite | ModalKind::AddCustomDomain => Some(DetailShape::Satellite),
            ModalKind::TopupMissionControl => None,
        }
    }

    /// Bundle key of the modal's title.
    pub fn title_key(&self) -> &'static str {
        match self {
            ModalKind::CreateSatellite => "modals.create_satellite",
            ModalKind::TopupSatellite => "modals.topup_satellite",
            ModalKind::TopupMissionControl => "modals.topup_mission_control",
            ModalKind::AddCustomDomain => "modals.add_custom_domain",
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detail payload of either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModalDetail {
    Satellite(SatelliteDetail),
    CreateSatellite(CreateSatelliteDetail),
}

impl ModalDetail {
    pub fn shape(&self) -> DetailShape {
        match self {
            ModalDetail::Satellite(_) => DetailShape::Satellite,
            ModalDetail::CreateSatellite(_) => DetailShape::CreateSatellite,
        }
    }
}

#[derive(Error, Debug)]
pub enum ModalError {
    #[error("`{kind}` modal expects a {expected:?} detail, got {found:?}")]
    DetailMismatch {
        kind: ModalKind,
        expected: DetailShape,
        found: DetailShape,
    },
    #[error("`{0}` modal does not take a detail")]
    UnexpectedDetail(ModalKind),
    #[error("invalid detail for `{kind}` modal: {source}")]
    InvalidDetail {
        kind: ModalKind,
        #[source]
        source: serde_json::Error,
    },
}

/// A request to show a modal, with its optional detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawModalRequest")]
pub struct ModalRequest {
    #[serde(rename = "type")]
    kind: ModalKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<ModalDetail>,
}

impl ModalRequest {
    /// Build a request, checking the detail against the kind.
    pub fn new(kind: ModalKind, detail: Option<ModalDetail>) -> Result<Self, ModalError> {
        if let Some(detail) = &detail {
            match kind.detail_shape() {
                None => return Err(ModalError::UnexpectedDetail(kind)),
                Some(expected) if expected != detail.shape() => {
                    return Err(ModalError::DetailMismatch {
                        kind,
                        expected,
                        found: detail.shape(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(Self { kind, detail })
    }

    pub fn create_satellite(detail: Option<CreateSatelliteDetail>) -> Self {
        Self {
            kind: ModalKind::CreateSatellite,
            detail: detail.map(ModalDetail::CreateSatellite),
        }
    }

    pub fn topup_satellite(satellite: Option<Satellite>) -> Self {
        Self {
            kind: ModalKind::TopupSatellite,
            detail: satellite.map(|satellite| ModalDetail::Satellite(SatelliteDetail { satellite })),
        }
    }

    pub fn topup_mission_control() -> Self {
        Self {
            kind: ModalKind::TopupMissionControl,
            detail: None,
        }
    }

    pub fn add_custom_domain(satellite: Option<Satellite>) -> Self {
        Self {
            kind: ModalKind::AddCustomDomain,
            detail: satellite.map(|satellite| ModalDetail::Satellite(SatelliteDetail { satellite })),
        }
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn detail(&self) -> Option<&ModalDetail> {
        self.detail.as_ref()
    }

    /// The satellite this modal is scoped to, if any.
    pub fn satellite(&self) -> Option<&Satellite> {
        match &self.detail {
            Some(ModalDetail::Satellite(detail)) => Some(&detail.satellite),
            _ => None,
        }
    }

    pub fn create_detail(&self) -> Option<&CreateSatelliteDetail> {
        match &self.detail {
            Some(ModalDetail::CreateSatellite(detail)) => Some(detail),
            _ => None,
        }
    }

    /// Localized title of the modal.
    pub fn title<'a>(&self, bundle: &'a I18nBundle) -> &'a str {
        bundle.t(self.kind.title_key())
    }
}

/// Wire form before the detail is checked against the kind.
#[derive(Deserialize)]
struct RawModalRequest {
    #[serde(rename = "type")]
    kind: ModalKind,

    #[serde(default)]
    detail: Option<Value>,
}

impl TryFrom<RawModalRequest> for ModalRequest {
    type Error = ModalError;

    fn try_from(raw: RawModalRequest) -> Result<Self, Self::Error> {
        let kind = raw.kind;
        let Some(value) = raw.detail else {
            return Ok(Self { kind, detail: None });
        };

        let invalid = |source: serde_json::Error| ModalError::InvalidDetail { kind, source };
        let detail = match kind.detail_shape() {
            None => return Err(ModalError::UnexpectedDetail(kind)),
            Some(DetailShape::CreateSatellite) => {
                ModalDetail::CreateSatellite(serde_json::from_value(value).map_err(invalid)?)
            }
            Some(DetailShape::Satellite) => {
                ModalDetail::Satellite(serde_json::from_value(value).map_err(invalid)?)
            }
        };

        Ok(Self {
            kind,
            detail: Some(detail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LanguageCode, I18nBundle};
    use serde_json::json;

    fn sample_satellite() -> Satellite {
        Satellite {
            satellite_id: "ck4tp-3iaaa-aaaal-ab7da-cai".to_string(),
            metadata: BTreeMap::from([("name".to_string(), "My dapp".to_string())]),
            created_at: 1_700_000_000_000_000_000,
            updated_at: 1_700_000_100_000_000_000,
        }
    }

    // ==================== Kind Tests ====================

    #[test]
    fn test_kind_wire_names() {
        for kind in ModalKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, json!(kind.as_str()));
        }
    }

    #[test]
    fn test_kind_detail_shapes() {
        assert_eq!(
            ModalKind::CreateSatellite.detail_shape(),
            Some(DetailShape::CreateSatellite)
        );
        assert_eq!(ModalKind::TopupSatellite.detail_shape(), Some(DetailShape::Satellite));
        assert_eq!(ModalKind::AddCustomDomain.detail_shape(), Some(DetailShape::Satellite));
        assert_eq!(ModalKind::TopupMissionControl.detail_shape(), None);
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_accepts_matching_detail() {
        let detail = ModalDetail::Satellite(SatelliteDetail {
            satellite: sample_satellite(),
        });
        let modal = ModalRequest::new(ModalKind::AddCustomDomain, Some(detail)).unwrap();
        assert_eq!(modal.satellite().and_then(Satellite::name), Some("My dapp"));
    }

    #[test]
    fn test_new_accepts_missing_detail_for_every_kind() {
        for kind in ModalKind::ALL {
            assert!(ModalRequest::new(kind, None).is_ok());
        }
    }

    #[test]
    fn test_new_rejects_mismatched_detail() {
        let detail = ModalDetail::CreateSatellite(CreateSatelliteDetail {
            fee: 1,
            mission_control_balance: None,
        });
        let result = ModalRequest::new(ModalKind::TopupSatellite, Some(detail));
        assert!(matches!(
            result,
            Err(ModalError::DetailMismatch {
                expected: DetailShape::Satellite,
                found: DetailShape::CreateSatellite,
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_detail_for_mission_control_topup() {
        let detail = ModalDetail::Satellite(SatelliteDetail {
            satellite: sample_satellite(),
        });
        let result = ModalRequest::new(ModalKind::TopupMissionControl, Some(detail));
        assert!(matches!(result, Err(ModalError::UnexpectedDetail(_))));
    }

    // ==================== Wire Format Tests ====================

    #[test]
    fn test_create_satellite_serialization() {
        let modal = ModalRequest::create_satellite(Some(CreateSatelliteDetail {
            fee: 50_000_000,
            mission_control_balance: Some(MissionControlBalance {
                balance: 120_000_000,
                credits: 0,
            }),
        }));

        let json = serde_json::to_value(&modal).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "create_satellite",
                "detail": {
                    "fee": 50_000_000,
                    "missionControlBalance": { "balance": 120_000_000, "credits": 0 }
                }
            })
        );
    }

    #[test]
    fn test_serialization_omits_missing_detail() {
        let json = serde_json::to_value(ModalRequest::topup_mission_control()).unwrap();
        assert_eq!(json, json!({ "type": "topup_mission_control" }));
    }

    #[test]
    fn test_deserialize_satellite_detail() {
        let modal: ModalRequest = serde_json::from_value(json!({
            "type": "topup_satellite",
            "detail": {
                "satellite": {
                    "satellite_id": "ck4tp-3iaaa-aaaal-ab7da-cai",
                    "metadata": { "name": "My dapp" },
                    "created_at": 1,
                    "updated_at": 2
                }
            }
        }))
        .unwrap();

        assert_eq!(modal.kind(), ModalKind::TopupSatellite);
        assert_eq!(
            modal.satellite().map(|s| s.satellite_id.as_str()),
            Some("ck4tp-3iaaa-aaaal-ab7da-cai")
        );
    }

    #[test]
    fn test_deserialize_create_detail_without_balance() {
        let modal: ModalRequest =
            serde_json::from_value(json!({ "type": "create_satellite", "detail": { "fee": 10 } }))
                .unwrap();

        let detail = modal.create_detail().unwrap();
        assert_eq!(detail.fee, 10);
        assert_eq!(detail.mission_control_balance, None);
    }

    #[test]
    fn test_deserialize_null_detail_is_absent() {
        let modal: ModalRequest =
            serde_json::from_value(json!({ "type": "add_custom_domain", "detail": null })).unwrap();
        assert_eq!(modal.detail(), None);
    }

    #[test]
    fn test_deserialize_rejects_mismatched_detail() {
        let result = serde_json::from_value::<ModalRequest>(json!({
            "type": "create_satellite",
            "detail": { "satellite": { "satellite_id": "x", "created_at": 1, "updated_at": 2 } }
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("create_satellite"));
    }

    #[test]
    fn test_deserialize_rejects_create_detail_with_satellite() {
        let result = serde_json::from_value::<ModalRequest>(json!({
            "type": "create_satellite",
            "detail": {
                "fee": 1,
                "satellite": { "satellite_id": "x", "created_at": 1, "updated_at": 2 }
            }
        }));
        assert!(result.unwrap_err().to_string().contains("unknown field `satellite`"));

        let err = serde_json::from_value::<CreateSatelliteDetail>(json!({
            "fee": 1,
            "satellite": { "satellite_id": "x", "created_at": 1, "updated_at": 2 }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `satellite`"));
    }

    #[test]
    fn test_deserialize_rejects_satellite_detail_with_fee() {
        let result = serde_json::from_value::<ModalRequest>(json!({
            "type": "topup_satellite",
            "detail": {
                "satellite": { "satellite_id": "x", "created_at": 1, "updated_at": 2 },
                "fee": 1
            }
        }));
        assert!(result.unwrap_err().to_string().contains("topup_satellite"));
    }

    #[test]
    fn test_deserialize_rejects_detail_for_mission_control_topup() {
        let result = serde_json::from_value::<ModalRequest>(json!({
            "type": "topup_mission_control",
            "detail": { "fee": 1 }
        }));
        assert!(result.unwrap_err().to_string().contains("does not take a detail"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_kind() {
        let result = serde_json::from_value::<ModalRequest>(json!({ "type": "delete_satellite" }));
        assert!(result.is_err());
    }

    // ==================== Title Tests ====================

    #[test]
    fn test_title_from_default_bundle() {
        let bundle = I18nBundle::embedded_default();
        let modal = ModalRequest::add_custom_domain(None);
        assert_eq!(modal.title(&bundle), "Connect a domain");
    }

    #[test]
    fn test_title_falls_back_to_key() {
        let bundle = I18nBundle::from_json(LanguageCode::French, "{}").unwrap();
        let modal = ModalRequest::topup_mission_control();
        assert_eq!(modal.title(&bundle), "modals.topup_mission_control");
    }
}
