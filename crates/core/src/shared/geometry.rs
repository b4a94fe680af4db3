/// Bounding box expressed as fractions of image width/height, independent
/// of rendered size. This is the form the detection service returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub left_col: f64,
    pub top_row: f64,
    pub right_col: f64,
    pub bottom_row: f64,
}

/// One detected face, in the service's return order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceRegion {
    pub bounding_box: NormalizedBox,
}

/// Pixel size of the displayed image. Exists only once the image has
/// actually been fetched and decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// On-screen pixel box for one face.
///
/// `right_col` and `bottom_row` are distances measured in from the right
/// and bottom image edges (CSS-style offsets), not absolute coordinates.
/// The drawing layer positions boxes with all four insets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    /// Index of the region this box was computed from. Stable across
    /// repeated calls for the same input, so boxes can be keyed by it.
    pub id: usize,
    pub left_col: f64,
    pub top_row: f64,
    pub right_col: f64,
    pub bottom_row: f64,
}

/// Scales normalized face regions to pixel boxes for an image of the
/// given size.
///
/// Output order matches input order and `id` is the region's index.
/// Normalized values outside `[0, 1]` are passed through unclamped.
///
/// Panics if either dimension is zero: boxes must never be computed
/// before the image size is known.
pub fn map_to_pixels(regions: &[FaceRegion], dimensions: ImageDimensions) -> Vec<FaceBox> {
    assert!(
        dimensions.width > 0 && dimensions.height > 0,
        "box mapping requires positive image dimensions, got {}x{}",
        dimensions.width,
        dimensions.height
    );

    let width = f64::from(dimensions.width);
    let height = f64::from(dimensions.height);

    regions
        .iter()
        .enumerate()
        .map(|(id, region)| {
            let b = region.bounding_box;
            FaceBox {
                id,
                left_col: b.left_col * width,
                top_row: b.top_row * height,
                right_col: width - b.right_col * width,
                bottom_row: height - b.bottom_row * height,
            }
        })
        .collect()
}
