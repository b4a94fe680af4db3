use crate::detection::domain::response::RawDetectionResponse;
use crate::shared::geometry::{FaceRegion, NormalizedBox};

/// Usable outcome of one detection call: at least one face region, in
/// the service's return order.
///
/// The region list is private so a result can only be built through
/// [`normalize`], which never produces an empty one. "Zero faces" is
/// represented by absence, not by an empty result.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedResult {
    regions: Vec<FaceRegion>,
}

impl NormalizedResult {
    pub fn regions(&self) -> &[FaceRegion] {
        &self.regions
    }

    pub fn face_count(&self) -> usize {
        self.regions.len()
    }
}

/// Extracts face regions from an untrusted service payload.
///
/// The payload is checked step by step: an outputs collection, at least
/// one output, a data payload on the first output, a non-empty regions
/// collection, and a bounding box on every region. Any missing step
/// yields `None` — the caller cannot tell "the service found no faces"
/// apart from "the response shape was not recognized", and that merge is
/// deliberate: both surface as the same user-visible outcome.
pub fn normalize(raw: &RawDetectionResponse) -> Option<NormalizedResult> {
    let outputs = raw.outputs.as_ref()?;
    let first = outputs.first()?;
    let data = first.data.as_ref()?;
    let regions = data.regions.as_ref()?;
    if regions.is_empty() {
        return None;
    }

    let mut mapped = Vec::with_capacity(regions.len());
    for region in regions {
        let b = region.region_info.as_ref()?.bounding_box?;
        mapped.push(FaceRegion {
            bounding_box: NormalizedBox {
                left_col: b.left_col,
                top_row: b.top_row,
                right_col: b.right_col,
                bottom_row: b.bottom_row,
            },
        });
    }
    Some(NormalizedResult { regions: mapped })
}
