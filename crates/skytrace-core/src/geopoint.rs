use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// The three kinds of named points the upstream provider publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fix,
    Navaid,
    Airport,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Fix, Category::Navaid, Category::Airport];

    /// Singular label used in resolved waypoint output.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fix => "fix",
            Category::Navaid => "navaid",
            Category::Airport => "airport",
        }
    }

    /// Plural form used by the provider's list endpoints.
    pub fn plural(&self) -> &'static str {
        match self {
            Category::Fix => "fixes",
            Category::Navaid => "navaids",
            Category::Airport => "airports",
        }
    }

    /// Classify a route designator by naming convention: codes shorter than
    /// four characters are navaid idents, longer ones are fix names. Known to
    /// be a heuristic only; the provider does not document its exceptions.
    pub fn classify(code: &str) -> Category {
        if code.len() < 4 {
            Category::Navaid
        } else {
            Category::Fix
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One named geographic point as listed by the provider. Candidates sharing a
/// code are kept separately; disambiguation happens at resolution time.
#[derive(Debug, Clone, PartialEq)]
pub struct Geopoint {
    pub code: String,
    pub category: Category,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Geopoint {
    pub fn coord(&self) -> Option<Coord> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coord { lat, lon }),
            _ => None,
        }
    }
}

/// A plain lat/lon pair, used as the reference when disambiguating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// Parses one raw provider line of the form `"<CODE> (<lat>,<lon>)"`.
/// Anything that does not match the grammar yields `None` and is skipped.
pub fn parse_line(line: &str, category: Category) -> Option<Geopoint> {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    let re = LINE_RE
        .get_or_init(|| Regex::new(r"^(\S+)\s+\(([-\d.]+),\s*([-\d.]+)\)$").unwrap());

    let caps = re.captures(line.trim())?;
    let code = caps[1].to_string();
    let lat = caps[2].parse::<f64>().ok();
    let lon = caps[3].parse::<f64>().ok();

    Some(Geopoint {
        code,
        category,
        lat,
        lon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_line() {
        let p = parse_line("ANITO (14.5231,120.9822)", Category::Fix).unwrap();
        assert_eq!(p.code, "ANITO");
        assert_eq!(p.category, Category::Fix);
        assert_eq!(p.lat, Some(14.5231));
        assert_eq!(p.lon, Some(120.9822));
    }

    #[test]
    fn test_parse_negative_coords_and_spacing() {
        let p = parse_line("WSSS (-1.35, -103.99)", Category::Airport).unwrap();
        assert_eq!(p.lat, Some(-1.35));
        assert_eq!(p.lon, Some(-103.99));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(parse_line("", Category::Fix).is_none());
        assert!(parse_line("ANITO", Category::Fix).is_none());
        assert!(parse_line("ANITO 14.5 120.9", Category::Fix).is_none());
        assert!(parse_line("ANITO (north,east)", Category::Fix).is_none());
    }

    #[test]
    fn test_classify_by_code_length() {
        assert_eq!(Category::classify("VTK"), Category::Navaid);
        assert_eq!(Category::classify("FE"), Category::Navaid);
        assert_eq!(Category::classify("ANITO"), Category::Fix);
        // Boundary: exactly four characters counts as a fix
        assert_eq!(Category::classify("OTLK"), Category::Fix);
    }
}
