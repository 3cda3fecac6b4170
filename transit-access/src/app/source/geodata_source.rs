use crate::model::AccessCliError;
use geo::{Geometry, LineString, MultiLineString, Point};
use serde::{Deserialize, Serialize};
use shapefile::dbase::{self, encoding::EncodingRs};
use std::{collections::HashMap, path::Path};
use wkt::TryFromWkt;

/// a feature read from a geodata source: its geometry plus the requested
/// attribute values, with blank values represented as None.
#[derive(Clone, Debug)]
pub struct FeatureRow {
    pub geometry: Geometry<f64>,
    pub attributes: HashMap<String, Option<String>>,
}

impl FeatureRow {
    /// the value of a requested attribute, or None when blank.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.attributes
            .get(field)
            .and_then(|v| v.as_deref())
    }
}

/// where a table of features is read from
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GeodataSource {
    /// an ESRI shapefile, attributes read from its .dbf. `encoding` is a
    /// WHATWG label such as "shift_jis"; when unset, text is read as UTF-8.
    Shapefile {
        file: String,
        encoding: Option<String>,
    },
    /// a CSV file with one WKT geometry column
    Csv {
        file: String,
        #[serde(default = "default_geometry_column")]
        geometry_column: String,
    },
}

fn default_geometry_column() -> String {
    String::from("geometry")
}

impl GeodataSource {
    pub fn file(&self) -> &str {
        match self {
            GeodataSource::Shapefile { file, .. } => file,
            GeodataSource::Csv { file, .. } => file,
        }
    }

    /// reads every feature along with the named attribute fields. a field
    /// missing from the source schema is an error.
    pub fn read(&self, fields: &[&str]) -> Result<Vec<FeatureRow>, AccessCliError> {
        let rows = match self {
            GeodataSource::Shapefile { file, encoding } => {
                read_shapefile(file, encoding.as_deref(), fields)
            }
            GeodataSource::Csv {
                file,
                geometry_column,
            } => read_csv(file, geometry_column, fields),
        }
        .map_err(AccessCliError::SourceError)?;
        log::info!("read {} features from {}", rows.len(), self.file());
        Ok(rows)
    }
}

/// reads geometries and attributes from a shapefile source, decoding .dbf
/// text with the given encoding label
fn read_shapefile(
    filepath: &str,
    encoding: Option<&str>,
    fields: &[&str],
) -> Result<Vec<FeatureRow>, String> {
    let shape_reader = shapefile::ShapeReader::from_path(filepath)
        .map_err(|e| format!("failed reading '{filepath}': {e}"))?;
    let dbf_path = Path::new(filepath).with_extension("dbf");
    let dbase_reader = match encoding {
        Some(label) => dbase::Reader::from_path_with_encoding(&dbf_path, dbase_encoding(label)?),
        None => dbase::Reader::from_path(&dbf_path),
    }
    .map_err(|e| format!("failed reading '{}': {e}", dbf_path.to_string_lossy()))?;
    let rows = shapefile::Reader::new(shape_reader, dbase_reader)
        .read()
        .map_err(|e| format!("failed reading '{filepath}': {e}"))?;

    let mut processed = vec![];
    for (idx, (shape, record)) in rows.into_iter().enumerate() {
        let geometry = match shape {
            shapefile::Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
            shapefile::Shape::PointM(p) => Geometry::Point(Point::new(p.x, p.y)),
            shapefile::Shape::PointZ(p) => Geometry::Point(Point::new(p.x, p.y)),
            shapefile::Shape::Polyline(polyline) => {
                let lines = polyline
                    .parts()
                    .iter()
                    .map(|part| LineString::from(part.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()))
                    .collect::<Vec<_>>();
                Geometry::MultiLineString(MultiLineString::new(lines))
            }
            shapefile::Shape::Polygon(generic_polygon) => {
                let mp: geo::MultiPolygon<f64> = generic_polygon.try_into().map_err(|e| {
                    format!("failed to convert shapefile polygon at row {idx}: {e}")
                })?;
                Geometry::MultiPolygon(mp)
            }
            shapefile::Shape::PolygonM(generic_polygon) => {
                let mp: geo::MultiPolygon<f64> = generic_polygon.try_into().map_err(|e| {
                    format!("failed to convert shapefile polygon at row {idx}: {e}")
                })?;
                Geometry::MultiPolygon(mp)
            }
            _ => {
                return Err(format!(
                    "unexpected shape type {} found at row {}, must be a point, polyline or polygon",
                    shape.shapetype(),
                    idx
                ))
            }
        };
        let mut attributes = HashMap::new();
        for field in fields {
            let value = record
                .get(field)
                .ok_or_else(|| format!("field {field} missing from shapefile record"))?;
            attributes.insert(field.to_string(), field_value_string(value));
        }
        processed.push(FeatureRow {
            geometry,
            attributes,
        });
    }
    Ok(processed)
}

/// resolves an encoding label such as "shift_jis" or "cp932" for .dbf text
fn dbase_encoding(label: &str) -> Result<EncodingRs, String> {
    dbase::encoding_rs::Encoding::for_label(label.as_bytes())
        .map(EncodingRs::from)
        .ok_or_else(|| format!("unknown text encoding '{label}'"))
}

fn field_value_string(value: &shapefile::dbase::FieldValue) -> Option<String> {
    use shapefile::dbase::FieldValue as F;
    let s = match value {
        F::Character(Some(s)) => s.trim().to_string(),
        F::Numeric(Some(n)) => n.to_string(),
        F::Float(Some(f)) => f.to_string(),
        F::Integer(i) => i.to_string(),
        F::Double(d) => d.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// reads WKT geometries and attributes from a CSV source
fn read_csv(
    filepath: &str,
    geometry_column: &str,
    fields: &[&str],
) -> Result<Vec<FeatureRow>, String> {
    let path = Path::new(filepath);
    let mut reader = csv::Reader::from_path(path).map_err(|e| e.to_string())?;
    let header_record = reader.headers().map_err(|e| e.to_string())?.clone();
    let headers = header_record
        .into_iter()
        .enumerate()
        .map(|(i, s)| (s, i))
        .collect::<HashMap<_, _>>();
    let geometry_idx = *headers
        .get(geometry_column)
        .ok_or_else(|| format!("{filepath} missing {geometry_column} column"))?;
    let field_idxs = fields
        .iter()
        .map(|f| {
            headers
                .get(f)
                .map(|i| (f.to_string(), *i))
                .ok_or_else(|| format!("{filepath} missing {f} column"))
        })
        .collect::<Result<Vec<_>, String>>()?;

    reader
        .records()
        .enumerate()
        .map(|(idx, r)| {
            let row = r.map_err(|e| e.to_string())?;
            let geometry_str = row
                .get(geometry_idx)
                .ok_or_else(|| format!("row {idx} missing geometry index"))?;
            let geometry: Geometry<f64> = Geometry::try_from_wkt_str(geometry_str)
                .map_err(|e| format!("row {idx} has invalid WKT: {e}"))?;
            let attributes = field_idxs
                .iter()
                .map(|(name, i)| {
                    let value = row
                        .get(*i)
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty())
                        .map(String::from);
                    (name.clone(), value)
                })
                .collect();
            Ok(FeatureRow {
                geometry,
                attributes,
            })
        })
        .collect::<Result<Vec<_>, String>>()
}

#[cfg(test)]
mod test {
    use super::GeodataSource;
    use geo::Geometry;

    #[test]
    fn test_read_csv_with_blank_values() {
        let path = std::env::temp_dir().join("transit_access_test_geodata.csv");
        std::fs::write(
            &path,
            "name,hindo,geometry\nstop-a,12,POINT (1 2)\nstop-b,,POINT (3 4)\n",
        )
        .expect("should write");
        let source = GeodataSource::Csv {
            file: path.to_string_lossy().to_string(),
            geometry_column: String::from("geometry"),
        };
        let rows = source.read(&["name", "hindo"]).expect("should read");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("stop-a"));
        assert_eq!(rows[0].get("hindo"), Some("12"));
        assert_eq!(rows[1].get("hindo"), None);
        assert!(matches!(rows[1].geometry, Geometry::Point(_)));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_read_csv_missing_column() {
        let path = std::env::temp_dir().join("transit_access_test_missing_column.csv");
        std::fs::write(&path, "name,geometry\nstop-a,POINT (1 2)\n").expect("should write");
        let source = GeodataSource::Csv {
            file: path.to_string_lossy().to_string(),
            geometry_column: String::from("geometry"),
        };
        assert!(source.read(&["name", "hindo"]).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_read_shift_jis_shapefile() {
        use shapefile::dbase::{
            encoding::EncodingRs, encoding_rs::SHIFT_JIS, FieldName, FieldValue, Record,
            TableWriterBuilder,
        };
        let path = std::env::temp_dir().join("transit_access_test_shift_jis.shp");
        let name_field = FieldName::try_from("NAME").expect("valid field name");
        let table = TableWriterBuilder::with_encoding(EncodingRs::from(SHIFT_JIS))
            .add_character_field(name_field, 40);
        {
            let mut writer = shapefile::Writer::from_path(&path, table).expect("should create");
            let mut record = Record::default();
            record.insert(
                String::from("NAME"),
                FieldValue::Character(Some(String::from("大内町1丁目"))),
            );
            writer
                .write_shape_and_record(&shapefile::Point::new(131.47, 34.17), &record)
                .expect("should write");
        }

        let source = GeodataSource::Shapefile {
            file: path.to_string_lossy().to_string(),
            encoding: Some(String::from("shift_jis")),
        };
        let rows = source.read(&["NAME"]).expect("should read");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("NAME"), Some("大内町1丁目"));
        assert!(matches!(rows[0].geometry, Geometry::Point(_)));

        let unknown = GeodataSource::Shapefile {
            file: path.to_string_lossy().to_string(),
            encoding: Some(String::from("not-an-encoding")),
        };
        assert!(unknown.read(&["NAME"]).is_err());
        for ext in ["shp", "shx", "dbf"] {
            let _ = std::fs::remove_file(path.with_extension(ext));
        }
    }

    #[test]
    fn test_source_config_decoding() {
        let source: GeodataSource =
            serde_json::from_str(r#"{"type": "csv", "file": "stops.csv"}"#).expect("decode");
        assert_eq!(
            source,
            GeodataSource::Csv {
                file: String::from("stops.csv"),
                geometry_column: String::from("geometry"),
            }
        );
        let source: GeodataSource = toml::from_str(
            "type = \"shapefile\"\nfile = \"bus_stops.shp\"\nencoding = \"shift_jis\"\n",
        )
        .expect("decode");
        assert_eq!(
            source,
            GeodataSource::Shapefile {
                file: String::from("bus_stops.shp"),
                encoding: Some(String::from("shift_jis")),
            }
        );
    }
}
