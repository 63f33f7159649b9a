//! Unpacking of stored granule values.
//!
//! Granule variables may be packed: stored values are compared against
//! `_FillValue` and `missing_value` first, then mapped through
//! `value * scale_factor + add_offset`.

/// Packing attributes of one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariablePacking {
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
    pub scale_factor: f64,
    pub add_offset: f64,
}

impl Default for VariablePacking {
    fn default() -> Self {
        Self {
            fill_value: None,
            missing_value: None,
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }
}

impl VariablePacking {
    /// Whether decoding changes anything at all.
    pub fn is_identity(&self) -> bool {
        self.fill_value.is_none()
            && self.missing_value.is_none()
            && self.scale_factor == 1.0
            && self.add_offset == 0.0
    }

    /// Unpack one stored value. Fill and missing markers become NaN.
    pub fn decode_value(&self, stored: f64) -> f64 {
        if self.fill_value == Some(stored) || self.missing_value == Some(stored) {
            return f64::NAN;
        }
        stored * self.scale_factor + self.add_offset
    }

    /// Unpack a whole variable in place.
    pub fn decode(&self, mut stored: Vec<f64>) -> Vec<f64> {
        if !self.is_identity() {
            for v in &mut stored {
                *v = self.decode_value(*v);
            }
        }
        stored
    }
}
