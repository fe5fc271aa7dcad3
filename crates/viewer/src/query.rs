use serde::Deserialize;

/// Page query parameters, exactly as they arrive in the URL.
///
/// Parsing is lenient: a value that does not parse as a finite number acts
/// as absent, and an empty `zona` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerQuery {
    pub zona: Option<String>,
    pub longitud: Option<String>,
    pub latitud: Option<String>,
    pub zoom: Option<String>,
}

impl ViewerQuery {
    pub fn zona(&self) -> Option<&str> {
        self.zona.as_deref().filter(|z| !z.is_empty())
    }

    pub fn longitude(&self) -> Option<f64> {
        parse_number(self.longitud.as_deref())
    }

    pub fn latitude(&self) -> Option<f64> {
        parse_number(self.latitud.as_deref())
    }

    pub fn zoom(&self) -> Option<f64> {
        parse_number(self.zoom.as_deref())
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::ViewerQuery;

    fn query(zona: Option<&str>, longitud: Option<&str>, latitud: Option<&str>) -> ViewerQuery {
        ViewerQuery {
            zona: zona.map(str::to_string),
            longitud: longitud.map(str::to_string),
            latitud: latitud.map(str::to_string),
            zoom: None,
        }
    }

    #[test]
    fn numbers_parse_leniently() {
        let q = query(None, Some("-72.5"), Some("abc"));
        assert_eq!(q.longitude(), Some(-72.5));
        assert_eq!(q.latitude(), None);
    }

    #[test]
    fn nan_counts_as_absent() {
        let q = query(None, Some("NaN"), Some("inf"));
        assert_eq!(q.longitude(), None);
        assert_eq!(q.latitude(), None);
    }

    #[test]
    fn empty_zone_counts_as_absent() {
        assert_eq!(query(Some(""), None, None).zona(), None);
        assert_eq!(query(Some("Norte"), None, None).zona(), Some("Norte"));
    }

    #[test]
    fn zero_is_a_valid_coordinate() {
        let q = query(None, Some("0"), Some("0"));
        assert_eq!(q.longitude(), Some(0.0));
        assert_eq!(q.latitude(), Some(0.0));
    }
}
