use serde::{Deserialize, Serialize};

/// Corner-format box as emitted by the detection bridge. Fields the model
/// leaves out deserialize to 0.0 so a partial box still yields finite
/// coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RawBox {
    #[serde(default)]
    pub xmin: f64,
    #[serde(default)]
    pub ymin: f64,
    #[serde(default)]
    pub xmax: f64,
    #[serde(default)]
    pub ymax: f64,
}

/// Axis-aligned region in page-pixel coordinates at the rasterization
/// resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn from_raw(raw: &RawBox) -> Self {
        Self {
            x: raw.xmin.round() as i32,
            y: raw.ymin.round() as i32,
            width: (raw.xmax - raw.xmin).round() as i32,
            height: (raw.ymax - raw.ymin).round() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rounds_corner_coordinates() {
        let raw = RawBox {
            xmin: 10.4,
            ymin: 19.6,
            xmax: 110.9,
            ymax: 59.4,
        };
        let bbox = BoundingBox::from_raw(&raw);
        assert_eq!(bbox.x, 10);
        assert_eq!(bbox.y, 20);
        assert_eq!(bbox.width, 101);
        assert_eq!(bbox.height, 40);
    }

    #[test]
    fn absent_fields_default_to_zero() {
        let raw: RawBox = serde_json::from_str(r#"{"xmax": 30.0}"#).unwrap();
        let bbox = BoundingBox::from_raw(&raw);
        assert_eq!(bbox.x, 0);
        assert_eq!(bbox.y, 0);
        assert_eq!(bbox.width, 30);
        assert_eq!(bbox.height, 0);
    }
}
