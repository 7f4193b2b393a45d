mod bbox;
mod frame;
mod object;

pub use bbox::{BBox, GeometryError, iou_batch};
pub use frame::FrameResult;
pub use object::{Detection, DetectionKind, DetectionPayload};
