//! JSON boundary model for SfMData-style scene files.
//!
//! Only the fields needed for compositing are read; unknown fields are ignored. Numbers may be
//! written either as JSON numbers or as strings, since SfMData writers emit strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::camera::intrinsic::IntrinsicKind;

/// Index value that marks an unset pose or intrinsic reference.
pub(crate) const UNDEFINED_INDEX: u32 = u32::MAX;

/// A number that may be encoded as a JSON number or a numeric string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Num(pub(crate) f64);

impl Num {
    pub(crate) fn as_f64(self) -> f64 {
        self.0
    }

    /// Interpret as a non-negative integer index or dimension.
    pub(crate) fn as_u32(self, what: &str) -> Result<u32, String> {
        let v = self.0;
        if v.fract() != 0.0 || v < 0.0 || v > f64::from(u32::MAX) {
            return Err(format!("{what} must be an integer in [0, {}], got {v}", u32::MAX));
        }
        Ok(v as u32)
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Self(v)),
            Repr::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid number \"{s}\""))),
        }
    }
}

/// Focal length: a single value for square pixels or an `[fx, fy]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum FocalDef {
    Single(Num),
    Pair([Num; 2]),
}

impl FocalDef {
    pub(crate) fn fx_fy(self) -> (f64, f64) {
        match self {
            Self::Single(f) => (f.as_f64(), f.as_f64()),
            Self::Pair([fx, fy]) => (fx.as_f64(), fy.as_f64()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SceneDef {
    #[serde(default)]
    pub(crate) views: Vec<ViewDef>,
    #[serde(default)]
    pub(crate) intrinsics: Vec<IntrinsicDef>,
    #[serde(default)]
    pub(crate) poses: Vec<PoseDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewDef {
    pub(crate) view_id: Num,
    #[serde(default = "undefined_index")]
    pub(crate) pose_id: Num,
    #[serde(default = "undefined_index")]
    pub(crate) intrinsic_id: Num,
    pub(crate) path: String,
    pub(crate) width: Num,
    pub(crate) height: Num,
    #[serde(default)]
    pub(crate) metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IntrinsicDef {
    pub(crate) intrinsic_id: Num,
    #[serde(rename = "type")]
    pub(crate) kind: IntrinsicKind,
    pub(crate) width: Num,
    pub(crate) height: Num,
    pub(crate) px_focal_length: FocalDef,
    pub(crate) principal_point: [Num; 2],
    #[serde(default)]
    pub(crate) distortion_params: Vec<Num>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoseDef {
    pub(crate) pose_id: Num,
    pub(crate) pose: PoseBodyDef,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct PoseBodyDef {
    pub(crate) transform: TransformDef,
}

/// `rotation` holds 9 values in column-major order; `center` holds 3.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct TransformDef {
    pub(crate) rotation: Vec<Num>,
    pub(crate) center: Vec<Num>,
}

fn undefined_index() -> Num {
    Num(f64::from(UNDEFINED_INDEX))
}
