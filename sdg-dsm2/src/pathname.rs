//! Six-part series pathnames and catalog filters.
//!
//! Every series in a DSM2 export is addressed by a slash-delimited
//! pathname `/A/B/C/D/E/F/`. By convention part B names the sensor or
//! node the series belongs to and part C names the measured parameter;
//! the remaining parts carry run metadata. Filters constrain individual
//! parts: an empty part matches anything and `(X|Y)` matches any of the
//! listed literals. Matching is ASCII case-insensitive because exports
//! differ in case while referring to the same catalog.

use std::fmt;
use std::str::FromStr;

use crate::error::{Dsm2Error, Result};

// ───────────────────── Pathname ─────────────────────

/// A parsed six-part pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pathname {
    pub parts: [String; 6],
}

impl Pathname {
    /// Part B, conventionally the sensor or node identifier.
    pub fn identifier(&self) -> &str {
        &self.parts[1]
    }

    /// Part C, conventionally the measured parameter.
    pub fn parameter(&self) -> &str {
        &self.parts[2]
    }
}

impl FromStr for Pathname {
    type Err = Dsm2Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = split_six_parts(s)?;
        let mut owned: [String; 6] = Default::default();
        for (slot, part) in owned.iter_mut().zip(parts) {
            *slot = part.to_string();
        }
        Ok(Self { parts: owned })
    }
}

impl fmt::Display for Pathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.parts.join("/"))
    }
}

/// Split `/A/B/C/D/E/F/` into its six inner parts.
fn split_six_parts(s: &str) -> Result<[&str; 6]> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
        .ok_or_else(|| Dsm2Error::InvalidPathname {
            text: s.to_string(),
            reason: "must start and end with '/'".to_string(),
        })?;
    let parts: Vec<&str> = inner.split('/').collect();
    let n = parts.len();
    parts.try_into().map_err(|_| Dsm2Error::InvalidPathname {
        text: s.to_string(),
        reason: format!("expected 6 parts, found {}", n),
    })
}

// ───────────────────── Filters ─────────────────────

/// Constraint on a single pathname part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartFilter {
    /// Matches any value; rendered as an empty part.
    #[default]
    Any,
    /// Matches one exact value.
    Literal(String),
    /// Matches any of the listed values; rendered as `(X|Y)`.
    OneOf(Vec<String>),
}

impl PartFilter {
    pub fn matches(&self, part: &str) -> bool {
        match self {
            PartFilter::Any => true,
            PartFilter::Literal(want) => want.eq_ignore_ascii_case(part),
            PartFilter::OneOf(wants) => wants.iter().any(|w| w.eq_ignore_ascii_case(part)),
        }
    }

    fn parse(text: &str) -> Self {
        let t = text.trim();
        if t.is_empty() {
            return PartFilter::Any;
        }
        if let Some(inner) = t.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
            return PartFilter::OneOf(inner.split('|').map(|s| s.trim().to_string()).collect());
        }
        PartFilter::Literal(t.to_string())
    }
}

impl fmt::Display for PartFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartFilter::Any => Ok(()),
            PartFilter::Literal(v) => write!(f, "{}", v),
            // A one-element union renders without parentheses, same as a literal.
            PartFilter::OneOf(vs) if vs.len() == 1 => write!(f, "{}", vs[0]),
            PartFilter::OneOf(vs) => write!(f, "({})", vs.join("|")),
        }
    }
}

/// Filter over all six pathname parts. Parts combine with AND; within a
/// part, `OneOf` alternatives combine with OR.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathFilter {
    pub parts: [PartFilter; 6],
}

impl PathFilter {
    /// Filter that matches every pathname.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter selecting series by identifier set (part B) and parameter
    /// (part C), the shape every scenario read uses.
    pub fn for_series(identifiers: &[&str], parameter: &str) -> Self {
        let mut filter = Self::any();
        filter.parts[1] = PartFilter::OneOf(identifiers.iter().map(|s| s.to_string()).collect());
        filter.parts[2] = PartFilter::Literal(parameter.to_string());
        filter
    }

    pub fn matches(&self, path: &Pathname) -> bool {
        self.parts
            .iter()
            .zip(path.parts.iter())
            .all(|(filter, part)| filter.matches(part))
    }
}

impl FromStr for PathFilter {
    type Err = Dsm2Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = split_six_parts(s)?;
        let mut filters: [PartFilter; 6] = Default::default();
        for (slot, part) in filters.iter_mut().zip(parts) {
            *slot = PartFilter::parse(part);
        }
        Ok(Self { parts: filters })
    }
}

impl fmt::Display for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for part in &self.parts {
            write!(f, "{}/", part)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> Pathname {
        text.parse().unwrap()
    }

    #[test]
    fn test_pathname_parse_and_accessors() {
        let p = path("/HIST/GLC_FLOW_FISH/DEVICE-FLOW/01JAN2016/15MIN/SDG/");
        assert_eq!(p.identifier(), "GLC_FLOW_FISH");
        assert_eq!(p.parameter(), "DEVICE-FLOW");
        assert_eq!(
            p.to_string(),
            "/HIST/GLC_FLOW_FISH/DEVICE-FLOW/01JAN2016/15MIN/SDG/"
        );
    }

    #[test]
    fn test_pathname_allows_empty_parts() {
        let p = path("//MHO/STAGE//15MIN/HYDRO/");
        assert_eq!(p.parts[0], "");
        assert_eq!(p.identifier(), "MHO");
        assert_eq!(p.parts[3], "");
    }

    #[test]
    fn test_pathname_rejects_wrong_shape() {
        assert!("/A/B/C/D/E/".parse::<Pathname>().is_err(), "five parts");
        assert!("/A/B/C/D/E/F/G/".parse::<Pathname>().is_err(), "seven parts");
        assert!("A/B/C/D/E/F/".parse::<Pathname>().is_err(), "missing lead slash");
        assert!("/A/B/C/D/E/F".parse::<Pathname>().is_err(), "missing tail slash");
    }

    #[test]
    fn test_filter_for_series() {
        let filter = PathFilter::for_series(&["MHO", "DGL", "OLD"], "STAGE");
        assert!(filter.matches(&path("//MHO/STAGE//15MIN/HYDRO/")));
        assert!(filter.matches(&path("//DGL/STAGE//15MIN/HYDRO/")));
        assert!(!filter.matches(&path("//MHO/FLOW//15MIN/HYDRO/")));
        assert!(!filter.matches(&path("//GLC_GATEOP/STAGE//15MIN/HYDRO/")));
    }

    #[test]
    fn test_filter_matching_is_case_insensitive() {
        let filter = PathFilter::for_series(&["glc_flow_fish"], "device-flow");
        assert!(filter.matches(&path("/HIST/GLC_FLOW_FISH/DEVICE-FLOW//15MIN/SDG/")));
    }

    #[test]
    fn test_filter_parts_combine_with_and() {
        let filter: PathFilter = "/HIST/(MHO|DGL)/STAGE///".parse().unwrap();
        assert!(filter.matches(&path("/HIST/MHO/STAGE/01JAN2016/15MIN/HYDRO/")));
        assert!(!filter.matches(&path("/CALC/MHO/STAGE/01JAN2016/15MIN/HYDRO/")));
        assert!(!filter.matches(&path("/HIST/MHO/FLOW/01JAN2016/15MIN/HYDRO/")));
    }

    #[test]
    fn test_filter_parse_and_render() {
        let filter: PathFilter = "//(GLC_GATEOP|MID_GATEOP)/ELEV///".parse().unwrap();
        assert_eq!(filter.parts[0], PartFilter::Any);
        assert_eq!(
            filter.parts[1],
            PartFilter::OneOf(vec!["GLC_GATEOP".to_string(), "MID_GATEOP".to_string()])
        );
        assert_eq!(filter.parts[2], PartFilter::Literal("ELEV".to_string()));
        assert_eq!(filter.to_string(), "//(GLC_GATEOP|MID_GATEOP)/ELEV///");
    }

    #[test]
    fn test_single_element_union_renders_bare() {
        let filter = PathFilter::for_series(&["MHO"], "STAGE");
        assert_eq!(filter.to_string(), "//MHO/STAGE///");
    }

    #[test]
    fn test_any_filter_matches_everything() {
        let filter = PathFilter::any();
        assert_eq!(filter.to_string(), "//////");
        assert!(filter.matches(&path("/A/B/C/D/E/F/")));
        assert!(filter.matches(&path("//////")));
    }
}
