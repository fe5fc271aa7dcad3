use serde::Deserialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn to_json(&self) -> Value {
        json!([self.lng, self.lat])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LngLat),
    MultiPoint(Vec<LngLat>),
    LineString(Vec<LngLat>),
    MultiLineString(Vec<Vec<LngLat>>),
    Polygon(Vec<Vec<LngLat>>),
    MultiPolygon(Vec<Vec<Vec<LngLat>>>),
}

impl Geometry {
    pub fn point(lng: f64, lat: f64) -> Self {
        Geometry::Point(LngLat::new(lng, lat))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Geometry::Point(p) => json!({"type": "Point", "coordinates": p.to_json()}),
            Geometry::MultiPoint(ps) => {
                json!({"type": "MultiPoint", "coordinates": positions_json(ps)})
            }
            Geometry::LineString(ps) => {
                json!({"type": "LineString", "coordinates": positions_json(ps)})
            }
            Geometry::MultiLineString(lines) => {
                json!({"type": "MultiLineString", "coordinates": rings_json(lines)})
            }
            Geometry::Polygon(rings) => {
                json!({"type": "Polygon", "coordinates": rings_json(rings)})
            }
            Geometry::MultiPolygon(polys) => {
                let coords: Vec<Value> = polys.iter().map(|poly| rings_json(poly)).collect();
                json!({"type": "MultiPolygon", "coordinates": coords})
            }
        }
    }
}

/// Marker properties carried by every feature. `name`, `description`, `type`
/// and `zona` are required; `image` may be null; any other key survives in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub zona: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureProperties {
    pub fn new(name: &str, description: &str, kind: &str, zona: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            image: None,
            kind: kind.to_string(),
            zona: zona.to_string(),
            extra: Map::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_string(), Value::String(self.name.clone()));
        obj.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        let image = match &self.image {
            Some(url) => Value::String(url.clone()),
            None => Value::Null,
        };
        obj.insert("image".to_string(), image);
        obj.insert("type".to_string(), Value::String(self.kind.clone()));
        obj.insert("zona".to_string(), Value::String(self.zona.clone()));
        for (key, value) in &self.extra {
            obj.insert(key.clone(), value.clone());
        }
        Value::Object(obj)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// The marker position for `Point` features; everything else renders no
    /// marker and yields `None`.
    pub fn point_coordinates(&self) -> Option<LngLat> {
        match &self.geometry {
            Geometry::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": self.geometry.to_value(),
            "properties": self.properties.to_value(),
        })
    }
}

#[derive(Debug)]
pub enum GeoJsonError {
    NotAFeatureCollection,
    InvalidJson(String),
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected a GeoJSON FeatureCollection document")
            }
            GeoJsonError::InvalidJson(reason) => write!(f, "invalid JSON payload: {reason}"),
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

/// One Point Document: a stored GeoJSON FeatureCollection plus the document
/// id it carries in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCollection {
    pub id: Option<String>,
    pub features: Vec<Feature>,
}

impl PointCollection {
    pub fn new(id: Option<String>, features: Vec<Feature>) -> Self {
        Self { id, features }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| GeoJsonError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validated construction from a raw document. The value must carry
    /// `type == "FeatureCollection"` and a well-formed `features` array;
    /// anything else is rejected rather than passed through.
    pub fn from_value(value: Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::NotAFeatureCollection);
        }

        let id = match obj.get("_id") {
            Some(Value::String(s)) => Some(s.clone()),
            // BSON extended JSON leaves ObjectIds as {"$oid": "..."}.
            Some(Value::Object(ext)) => ext
                .get("$oid")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        };

        let raw_features = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        let features = raw_features
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_feature(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { id, features })
    }

    /// Semantic round-trip exporter: emits `{_id, type, features}` exactly as
    /// the wire carries it, reflecting any filtering applied since
    /// construction. Key ordering may differ from the original input.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        if let Some(id) = &self.id {
            root.insert("_id".to_string(), Value::String(id.clone()));
        }
        root.insert(
            "type".to_string(),
            Value::String("FeatureCollection".to_string()),
        );
        root.insert(
            "features".to_string(),
            Value::Array(self.features.iter().map(Feature::to_value).collect()),
        );
        Value::Object(root)
    }

    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

fn parse_feature(index: usize, value: &Value) -> Result<Feature, GeoJsonError> {
    let invalid = |reason: String| GeoJsonError::InvalidFeature { index, reason };

    let obj = value
        .as_object()
        .ok_or_else(|| invalid("feature must be an object".to_string()))?;

    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("feature missing type".to_string()))?;
    if ty != "Feature" {
        return Err(invalid(format!("unexpected feature type: {ty}")));
    }

    let geometry_val = obj
        .get("geometry")
        .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
    let geometry = parse_geometry(geometry_val).map_err(&invalid)?;

    let properties_val = obj
        .get("properties")
        .cloned()
        .ok_or_else(|| invalid("feature missing properties".to_string()))?;
    let properties: FeatureProperties = serde_json::from_value(properties_val)
        .map_err(|e| invalid(format!("invalid properties: {e}")))?;

    Ok(Feature {
        geometry,
        properties,
    })
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or_else(|| "geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_position(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_position_list(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_position_list(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_ring_list(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_ring_list(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_polygon_list(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_position(value: &Value) -> Result<LngLat, String> {
    let pair = value
        .as_array()
        .ok_or_else(|| "position must be an array".to_string())?;
    if pair.len() < 2 {
        return Err("position must hold [longitude, latitude]".to_string());
    }
    let lng = pair[0]
        .as_f64()
        .ok_or_else(|| "longitude must be a number".to_string())?;
    let lat = pair[1]
        .as_f64()
        .ok_or_else(|| "latitude must be a number".to_string())?;
    Ok(LngLat::new(lng, lat))
}

fn parse_position_list(value: &Value) -> Result<Vec<LngLat>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| "coordinates must be an array".to_string())?;
    items.iter().map(parse_position).collect()
}

fn parse_ring_list(value: &Value) -> Result<Vec<Vec<LngLat>>, String> {
    let rings = value
        .as_array()
        .ok_or_else(|| "coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_position_list).collect()
}

fn parse_polygon_list(value: &Value) -> Result<Vec<Vec<Vec<LngLat>>>, String> {
    let polys = value
        .as_array()
        .ok_or_else(|| "coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_ring_list).collect()
}

fn positions_json(positions: &[LngLat]) -> Value {
    Value::Array(positions.iter().map(LngLat::to_json).collect())
}

fn rings_json(rings: &[Vec<LngLat>]) -> Value {
    Value::Array(rings.iter().map(|ring| positions_json(ring)).collect())
}
