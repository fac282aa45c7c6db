use crate::shared::annotation::Annotation;

/// Eye-relative padding of the face box, in multiples of the eye distance.
const EYE_PADDING_TOP: f64 = -0.7;
const EYE_PADDING_BOTTOM: f64 = 1.7;
const EYE_PADDING_LEFT: f64 = -1.0;
const EYE_PADDING_RIGHT: f64 = 1.0;

/// Axis-aligned face box in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

impl BoundingBox {
    pub fn new(top: f64, left: f64, height: f64, width: f64) -> Self {
        Self {
            top,
            left,
            height,
            width,
        }
    }

    /// Derives the face box from an annotation.
    ///
    /// `topleft`/`bottomright` are used directly. Otherwise the box is
    /// built around `leye`/`reye`. Returns `None` when neither pair exists.
    pub fn from_annotation(annotation: &Annotation) -> Option<Self> {
        if let (Some(tl), Some(br)) = (annotation.get("topleft"), annotation.get("bottomright")) {
            return Some(Self::new(tl.0, tl.1, br.0 - tl.0, br.1 - tl.1));
        }

        let (leye, reye) = (annotation.get("leye")?, annotation.get("reye")?);
        let center = ((leye.0 + reye.0) / 2.0, (leye.1 + reye.1) / 2.0);
        let distance = ((leye.0 - reye.0).powi(2) + (leye.1 - reye.1).powi(2)).sqrt();

        let top = center.0 + EYE_PADDING_TOP * distance;
        let bottom = center.0 + EYE_PADDING_BOTTOM * distance;
        let left = center.1 + EYE_PADDING_LEFT * distance;
        let right = center.1 + EYE_PADDING_RIGHT * distance;
        Some(Self::new(top, left, bottom - top, right - left))
    }

    /// The shorter side; a face is as small as its smallest extent.
    pub fn size(&self) -> f64 {
        self.height.min(self.width)
    }
}
