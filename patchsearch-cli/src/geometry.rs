//! Loading GeoJSON geometries from disk.

use std::io::{self, BufReader};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use patchsearch_core::Geometry;
use serde_json::Value;

use crate::CliError;

fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Loads a GeoJSON geometry object from `path`.
///
/// Feature and FeatureCollection wrappers are not unwrapped; the file must
/// hold the geometry itself.
pub(crate) fn load_geometry(path: &Utf8Path) -> Result<Geometry, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::ReadGeometry {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        CliError::ParseGeometry {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Geometry::from_value(value).map_err(|source| CliError::InvalidGeometry {
        path: path.to_path_buf(),
        source,
    })
}
