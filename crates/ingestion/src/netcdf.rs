//! TEMPO Level-2 NetCDF-4 granule reading.

use std::path::PathBuf;

use tracing::debug;

use crate::decode::VariablePacking;
use crate::error::{IngestionError, Result};
use crate::source::{ObservationArrays, ObservationSource};

/// Tropospheric NO2 column variable of the TEMPO NO2 L2 product.
pub const DEFAULT_VALUE_VARIABLE: &str = "product/vertical_column_troposphere";
pub const DEFAULT_LATITUDE_VARIABLE: &str = "geolocation/latitude";
pub const DEFAULT_LONGITUDE_VARIABLE: &str = "geolocation/longitude";

/// One granule on disk.
///
/// Variables are addressed by `group/name` paths and read in full, then
/// flattened and unpacked with [`VariablePacking`].
#[derive(Debug, Clone)]
pub struct TempoNetCdfSource {
    path: PathBuf,
    name: String,
    value_variable: String,
    latitude_variable: String,
    longitude_variable: String,
}

impl TempoNetCdfSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            value_variable: DEFAULT_VALUE_VARIABLE.to_string(),
            latitude_variable: DEFAULT_LATITUDE_VARIABLE.to_string(),
            longitude_variable: DEFAULT_LONGITUDE_VARIABLE.to_string(),
        }
    }
}

impl ObservationSource for TempoNetCdfSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<ObservationArrays> {
        let file = netcdf::open(&self.path).map_err(|e| {
            IngestionError::NetcdfParse(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let values = self.read_variable(&file, &self.value_variable)?;
        let latitudes = self.read_variable(&file, &self.latitude_variable)?;
        let longitudes = self.read_variable(&file, &self.longitude_variable)?;

        debug!(
            granule = %self.name,
            observations = values.len(),
            "Read TEMPO granule"
        );

        Ok(ObservationArrays::new(
            self.name.clone(),
            values,
            latitudes,
            longitudes,
        ))
    }
}

impl TempoNetCdfSource {
    fn read_variable(&self, file: &netcdf::File, variable: &str) -> Result<Vec<f64>> {
        let var = file
            .variable(variable)
            .ok_or_else(|| IngestionError::MissingVariable {
                path: self.path.clone(),
                variable: variable.to_string(),
            })?;

        let raw: Vec<f64> = var.get_values(..).map_err(|e| {
            IngestionError::NetcdfParse(format!("Failed to read {}: {}", variable, e))
        })?;

        let packing = VariablePacking {
            fill_value: get_f64_attr(&var, "_FillValue"),
            missing_value: get_f64_attr(&var, "missing_value"),
            scale_factor: get_f64_attr(&var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(&var, "add_offset").unwrap_or(0.0),
        };
        Ok(packing.decode(raw))
    }
}

/// Check if a variable has an attribute with the given name.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}
