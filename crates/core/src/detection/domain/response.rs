use serde::Deserialize;

/// Raw detection-service payload, structurally untrusted.
///
/// Every level is optional because the service may return well-formed,
/// empty, or malformed bodies. Only the normalizer interprets the
/// contents; everything else treats the value as opaque.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawDetectionResponse {
    #[serde(default)]
    pub(crate) outputs: Option<Vec<RawOutput>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RawOutput {
    #[serde(default)]
    pub(crate) data: Option<RawOutputData>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RawOutputData {
    #[serde(default)]
    pub(crate) regions: Option<Vec<RawRegion>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RawRegion {
    #[serde(default)]
    pub(crate) region_info: Option<RawRegionInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RawRegionInfo {
    #[serde(default)]
    pub(crate) bounding_box: Option<RawBoundingBox>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub(crate) struct RawBoundingBox {
    #[serde(default)]
    pub(crate) top_row: f64,
    #[serde(default)]
    pub(crate) left_col: f64,
    #[serde(default)]
    pub(crate) bottom_row: f64,
    #[serde(default)]
    pub(crate) right_col: f64,
}
